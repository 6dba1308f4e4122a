//! Boxed diagnostics for build output

use zeroboot_core::{BootTrigger, ClockPlan, LinkConfig, Resolution};

use crate::error::BoardError;

const RULE: &str = "══════════════════════════════════════════════════════════════════";
const WIDTH: usize = 63;

fn fit(line: &str, width: usize) -> String {
    if line.chars().count() > width {
        let mut out: String = line.chars().take(width - 3).collect();
        out.push_str("...");
        out
    } else {
        line.to_string()
    }
}

/// Render a titled box with one bullet per line
pub fn boxed(title: &str, lines: &[String]) -> String {
    let mut out = String::from("\n");
    out.push_str(&format!("╔{}╗\n", RULE));
    out.push_str(&format!("║  {:<w$} ║\n", fit(title, WIDTH), w = WIDTH));
    if !lines.is_empty() {
        out.push_str(&format!("╠{}╣\n", RULE));
        for line in lines {
            out.push_str(&format!("║  • {:<w$} ║\n", fit(line, WIDTH - 2), w = WIDTH - 2));
        }
    }
    out.push_str(&format!("╚{}╝\n", RULE));
    out
}

/// Box for a board that failed to load or resolve
pub fn error_box(board: &str, err: &BoardError) -> String {
    boxed(
        &format!("ERROR: {} ({})", err.heading(), board),
        &err.details(),
    )
}

/// Box listing the warnings raised while resolving
pub fn warning_box(board: &str, resolution: &Resolution) -> Option<String> {
    if resolution.warnings.is_empty() {
        return None;
    }
    let lines: Vec<String> = resolution.warnings.iter().map(|w| w.to_string()).collect();
    Some(boxed(&format!("WARNING: {}", board), &lines))
}

/// One-line-per-item summary of a resolved configuration
pub fn summary(resolution: &Resolution) -> Vec<String> {
    let config = &resolution.config;
    let mut lines = vec![format!(
        "{}: MCK {} Hz via {}",
        config.chip.name(),
        config.master_clock_hz(),
        clock_text(&config.clock)
    )];

    match &config.link {
        LinkConfig::Usb => lines.push(usb_text(config)),
        LinkConfig::Uart(uart) | LinkConfig::Both(uart) => {
            if config.link.usb_enabled() {
                lines.push(usb_text(config));
            }
            lines.push(format!(
                "SERCOM{} UART {} baud (BAUD={}, RXPO={}, TXPO={})",
                uart.pads.instance,
                uart.baud_rate,
                uart.baud_register,
                uart.settings.rxpo,
                uart.settings.txpo
            ));
        }
    }

    lines.push(match config.boot_trigger {
        BootTrigger::DoubleTap => "boot trigger: double tap".to_string(),
        BootTrigger::PinLevel(pin) => format!("boot trigger: pin P{:?}{:02}", pin.port(), pin.pin()),
        BootTrigger::None => "boot trigger: none".to_string(),
    });
    lines
}

fn usb_text(config: &zeroboot_core::ResolvedConfig) -> String {
    let identity = &config.identity;
    let mut text = format!(
        "USB CDC {:04X}:{:04X}",
        identity.vendor_id, identity.product_id
    );
    if let (Some(manufacturer), Some(product)) = (&identity.manufacturer, &identity.product) {
        text.push_str(&format!(" \"{}\" / \"{}\"", manufacturer, product));
    }
    text
}

fn clock_text(plan: &ClockPlan) -> String {
    match plan {
        ClockPlan::OpenLoopDfll {
            usb_clock_recovery: true,
            ..
        } => "DFLL48M (USB clock recovery)".to_string(),
        ClockPlan::OpenLoopDfll { .. } => "DFLL48M (open loop)".to_string(),
        ClockPlan::InternalOsc48m => "OSC48M".to_string(),
        ClockPlan::Pll(derivation) => match derivation.fraction {
            Some(fraction) if derivation.fractional_enabled => format!(
                "DPLL {} Hz / {} x {}+{}/16",
                derivation.source_hz, derivation.divider, fraction.integer, fraction.sixteenths
            ),
            _ => format!(
                "DPLL {} Hz / {} x {}",
                derivation.source_hz, derivation.divider, derivation.multiplier
            ),
        },
    }
}
