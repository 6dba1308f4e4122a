//! Board definition to selector conversion
//!
//! Schema-level problems (bad pin names, duplicate pads, strings that do
//! not fit a descriptor) are collected and reported together. Cross-field
//! rules are left to [`zeroboot_core::resolve`].

use std::fs;
use std::path::Path;

use heapless::String as HString;
use zeroboot_core::{
    resolve, BootTriggerSelectors, ChipFamily, ClockSelectors, ClockSource,
    CommunicationInterface, IdentitySelectors, ImageBudget, InexactMultiplierPolicy, LedMode,
    LedPolarity, LedPolicy, PadSelector, PinId, PinMux, Resolution, ResolutionPolicy,
    SelectorSet, SercomPad, TriggerPolicy, UartSelectors, MAX_STRING_LEN,
};

use crate::error::BoardError;
use crate::schema::{
    BoardFile, ChipName, ClockSourceName, ImageName, InexactName, InterfaceName, LedEntry,
    MuxName, PadRoleName, PolarityName, TriggerConflictName, UartSection,
};

/// A parsed board definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub name: String,
    pub selectors: SelectorSet,
    pub policy: ResolutionPolicy,
}

impl Board {
    /// Read and parse a `board.toml`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BoardError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BoardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse board definition text
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let file: BoardFile = toml::from_str(text)?;
        Self::from_file(&file)
    }

    pub fn from_file(file: &BoardFile) -> Result<Self, BoardError> {
        let mut errors = Vec::new();

        let chip = chip_family(file.board.chip);
        let mut selectors = SelectorSet::for_chip(chip);

        if let Some(interface) = file.board.interface {
            selectors.interface = interface_kind(interface);
        }
        selectors.image = match file.board.image {
            ImageName::Kb4 => ImageBudget::Kb4,
            ImageName::Kb8 => ImageBudget::Kb8,
        };

        let source = file
            .clock
            .source
            .map_or(selectors.clock.source, clock_source);
        selectors.clock = ClockSelectors {
            crystal_hz: file.clock.crystal_hz,
            ..ClockSelectors::new(source)
        }
        .with_fast_startup(file.clock.fast_startup)
            .with_fractional(file.clock.fractional);

        selectors.uart = file
            .uart
            .as_ref()
            .map(|uart| uart_selectors(uart, &mut errors));

        selectors.boot = BootTriggerSelectors {
            double_tap: file.boot.double_tap.unwrap_or(selectors.boot.double_tap),
            load_pin: file
                .boot
                .load_pin
                .as_deref()
                .and_then(|name| parse_pin("[boot] load_pin", name, &mut errors)),
        };

        selectors.leds = LedPolicy {
            main: led_mode("main", file.led.main.as_ref(), &mut errors),
            rx: led_mode("rx", file.led.rx.as_ref(), &mut errors),
            tx: led_mode("tx", file.led.tx.as_ref(), &mut errors),
        };

        let defaults = IdentitySelectors::default();
        selectors.identity = IdentitySelectors {
            vendor_id: file.usb.vid.unwrap_or(defaults.vendor_id),
            product_id: file.usb.pid.unwrap_or(defaults.product_id),
            manufacturer: descriptor_string(
                "manufacturer",
                file.usb.manufacturer.as_deref(),
                &mut errors,
            ),
            product: descriptor_string("product", file.usb.product.as_deref(), &mut errors),
            strings_enabled: file.usb.strings,
            extended_capabilities: file.board.extended_capabilities,
        };

        let policy = ResolutionPolicy::new()
            .with_inexact_multiplier(match file.policy.inexact_multiplier {
                InexactName::Reject => InexactMultiplierPolicy::Reject,
                InexactName::Warn => InexactMultiplierPolicy::Warn,
                InexactName::AutoFractional => InexactMultiplierPolicy::AutoFractional,
            })
            .with_trigger_conflict(match file.policy.trigger_conflict {
                TriggerConflictName::Reject => TriggerPolicy::Reject,
                TriggerConflictName::PreferDoubleTap => TriggerPolicy::PreferDoubleTap,
                TriggerConflictName::PreferPinLevel => TriggerPolicy::PreferPinLevel,
            })
            .with_deny_warnings(file.policy.deny_warnings);

        if !errors.is_empty() {
            return Err(BoardError::Invalid(errors));
        }

        Ok(Board {
            name: file.board.name.clone(),
            selectors,
            policy,
        })
    }

    /// Resolve the board with its own policy
    pub fn resolve(&self) -> Result<Resolution, BoardError> {
        Ok(resolve(&self.selectors, &self.policy)?)
    }
}

fn chip_family(name: ChipName) -> ChipFamily {
    match name {
        ChipName::Samd21 => ChipFamily::SamD21,
        ChipName::Samd11 => ChipFamily::SamD11,
        ChipName::Saml21 => ChipFamily::SamL21,
        ChipName::Samc21 => ChipFamily::SamC21,
    }
}

fn interface_kind(name: InterfaceName) -> CommunicationInterface {
    match name {
        InterfaceName::Usb => CommunicationInterface::UsbOnly,
        InterfaceName::Uart => CommunicationInterface::UartOnly,
        InterfaceName::Both => CommunicationInterface::Both,
    }
}

fn clock_source(name: ClockSourceName) -> ClockSource {
    match name {
        ClockSourceName::Internal => ClockSource::InternalRc,
        ClockSourceName::InternalUsb => ClockSource::InternalUsbSynced,
        ClockSourceName::Crystal32k => ClockSource::Crystal32k,
        ClockSourceName::CrystalHs => ClockSource::CrystalHs,
    }
}

fn parse_pin(field: &str, name: &str, errors: &mut Vec<String>) -> Option<PinId> {
    let pin = PinId::parse(name);
    if pin.is_none() {
        errors.push(format!("{} '{}' is not a pin (expected PA00-PB31)", field, name));
    }
    pin
}

fn uart_selectors(section: &UartSection, errors: &mut Vec<String>) -> UartSelectors {
    let mut uart = UartSelectors::new(section.sercom);
    if let Some(baud) = section.baud {
        uart = uart.with_baud_rate(baud);
    }

    let mut seen = [false; 4];
    for entry in &section.pad {
        let Some(sercom_pad) = SercomPad::from_index(entry.index) else {
            errors.push(format!("[uart] pad index {} out of range 0-3", entry.index));
            continue;
        };
        let index = sercom_pad.index();
        if seen[index] {
            errors.push(format!("[uart] PAD{} listed more than once", entry.index));
            continue;
        }
        seen[index] = true;

        let mux = match entry.mux {
            MuxName::C => PinMux::C,
            MuxName::D => PinMux::D,
        };
        let field = format!("[uart] PAD{} pin", entry.index);
        let pad = match (entry.role, entry.pin.as_deref()) {
            (PadRoleName::Unused, None) => PadSelector::Unused,
            (PadRoleName::Unused, Some(_)) => {
                errors.push(format!("[uart] PAD{} is unused but names a pin", entry.index));
                continue;
            }
            (_, None) => {
                errors.push(format!("[uart] PAD{} needs a pin", entry.index));
                continue;
            }
            (PadRoleName::Rx, Some(name)) => match parse_pin(&field, name, errors) {
                Some(pin) => PadSelector::Rx { pin, mux },
                None => continue,
            },
            (PadRoleName::Tx, Some(name)) => match parse_pin(&field, name, errors) {
                Some(pin) => PadSelector::Tx { pin, mux },
                None => continue,
            },
        };
        uart = uart.with_pad(sercom_pad, pad);
    }
    uart
}

fn led_mode(role: &str, entry: Option<&LedEntry>, errors: &mut Vec<String>) -> LedMode {
    let Some(entry) = entry else {
        return LedMode::Disabled;
    };
    let field = format!("[led.{}] pin", role);
    let Some(pin) = parse_pin(&field, &entry.pin, errors) else {
        return LedMode::Disabled;
    };
    let polarity = match entry.polarity {
        PolarityName::HighOn => LedPolarity::HighOn,
        PolarityName::LowOn => LedPolarity::LowOn,
    };
    if entry.fade {
        LedMode::Fade { pin, polarity }
    } else {
        LedMode::Solid { pin, polarity }
    }
}

fn descriptor_string(
    field: &str,
    value: Option<&str>,
    errors: &mut Vec<String>,
) -> HString<MAX_STRING_LEN> {
    let mut out = HString::new();
    if let Some(value) = value {
        if out.push_str(value).is_err() {
            errors.push(format!(
                "[usb] {} is longer than {} bytes",
                field, MAX_STRING_LEN
            ));
        }
    }
    out
}
