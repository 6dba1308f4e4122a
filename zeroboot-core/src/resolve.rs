//! Resolution entry point
//!
//! Runs the validator, then the clock and pad resolvers, and assembles the
//! immutable configuration handed to the bootloader's initialisers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chip::ChipFamily;
use crate::clock::{resolve_clock, ClockPlan};
use crate::config::{CommunicationInterface, LedPolicy, ResolutionPolicy, SelectorSet};
use crate::error::{push_warning, ConfigError, DependentValue, Warnings};
use crate::identity::BoardIdentity;
use crate::pinmux::{resolve_uart, UartConfig};
use crate::trigger::BootTrigger;
use crate::validate::validate;

/// Layout version of [`ResolvedConfig`]
pub const CONFIG_VERSION: u8 = 1;

/// Resolved communication link
///
/// UART parameters exist only when the UART is used; a USB-only link
/// carries nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkConfig {
    Usb,
    Uart(UartConfig),
    Both(UartConfig),
}

impl LinkConfig {
    pub const fn interface(&self) -> CommunicationInterface {
        match self {
            LinkConfig::Usb => CommunicationInterface::UsbOnly,
            LinkConfig::Uart(_) => CommunicationInterface::UartOnly,
            LinkConfig::Both(_) => CommunicationInterface::Both,
        }
    }

    pub const fn uart(&self) -> Option<&UartConfig> {
        match self {
            LinkConfig::Usb => None,
            LinkConfig::Uart(uart) | LinkConfig::Both(uart) => Some(uart),
        }
    }

    pub const fn usb_enabled(&self) -> bool {
        self.interface().uses_usb()
    }
}

/// Complete bootloader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedConfig {
    /// Layout version for compatibility checks
    pub version: u8,
    pub chip: ChipFamily,
    pub clock: ClockPlan,
    pub link: LinkConfig,
    pub boot_trigger: BootTrigger,
    pub leds: LedPolicy,
    pub identity: BoardIdentity,
}

impl ResolvedConfig {
    /// Master clock frequency the clock plan produces
    pub const fn master_clock_hz(&self) -> u32 {
        self.clock.master_clock_hz()
    }
}

/// Resolved configuration plus the warnings raised on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: ResolvedConfig,
    pub warnings: Warnings,
}

/// Resolve a selector set
///
/// Deterministic: the same selectors and policy always give the same
/// result.
pub fn resolve(
    selectors: &SelectorSet,
    policy: &ResolutionPolicy,
) -> Result<Resolution, ConfigError> {
    info!("resolving {} configuration", selectors.chip.name());

    let mut warnings = validate(selectors, policy)?;

    let clock = resolve_clock(
        selectors.chip,
        &selectors.clock,
        policy.inexact_multiplier,
        &mut warnings,
    )?;

    let link = match selectors.interface {
        CommunicationInterface::UsbOnly => LinkConfig::Usb,
        CommunicationInterface::UartOnly => LinkConfig::Uart(uart_config(selectors)?),
        CommunicationInterface::Both => LinkConfig::Both(uart_config(selectors)?),
    };

    let (boot_trigger, trigger_warning) =
        BootTrigger::select(&selectors.boot, policy.trigger_conflict)?;
    if let Some(warning) = trigger_warning {
        push_warning(&mut warnings, warning);
    }

    let config = ResolvedConfig {
        version: CONFIG_VERSION,
        chip: selectors.chip,
        clock,
        link,
        boot_trigger,
        leds: selectors.leds,
        identity: BoardIdentity::assemble(&selectors.identity),
    };

    if policy.deny_warnings {
        if let Some(warning) = warnings.first() {
            return Err(ConfigError::PromotedWarning(*warning));
        }
    }

    info!(
        "resolved: {} Hz, {:?}, {} warning(s)",
        config.master_clock_hz(),
        config.link.interface(),
        warnings.len()
    );
    Ok(Resolution { config, warnings })
}

fn uart_config(selectors: &SelectorSet) -> Result<UartConfig, ConfigError> {
    let uart = selectors
        .uart
        .as_ref()
        .ok_or(ConfigError::MissingDependentValue(DependentValue::UartPads))?;
    resolve_uart(selectors.chip, uart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TARGET_MCK_HZ;
    use crate::config::{
        ClockSelectors, ClockSource, InexactMultiplierPolicy, PadSelector, PinId, PinMux,
        SercomPad, TriggerPolicy, UartSelectors,
    };
    use crate::error::{TriggerKind, Warning};
    use crate::pinmux::{PadRole, PINMUX_UNUSED};

    fn uart() -> UartSelectors {
        UartSelectors::new(0)
            .with_pad(
                SercomPad::Pad2,
                PadSelector::Tx {
                    pin: PinId::pa(10),
                    mux: PinMux::C,
                },
            )
            .with_pad(
                SercomPad::Pad3,
                PadSelector::Rx {
                    pin: PinId::pa(11),
                    mux: PinMux::C,
                },
            )
    }

    #[test]
    fn test_default_d21() {
        let resolution = resolve(
            &SelectorSet::for_chip(ChipFamily::SamD21),
            &ResolutionPolicy::default(),
        )
        .unwrap();
        let config = resolution.config;
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.link, LinkConfig::Usb);
        assert!(config.link.uart().is_none());
        assert!(config.link.usb_enabled());
        assert_eq!(
            config.clock,
            ClockPlan::OpenLoopDfll {
                fine_calibration: 512,
                usb_clock_recovery: true
            }
        );
        assert_eq!(config.master_clock_hz(), TARGET_MCK_HZ);
        assert_eq!(config.boot_trigger, BootTrigger::DoubleTap);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_uart_only_link() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamC21);
        sel.uart = Some(uart());
        let config = resolve(&sel, &ResolutionPolicy::default()).unwrap().config;

        let LinkConfig::Uart(uart) = config.link else {
            panic!("expected UART-only link, got {:?}", config.link);
        };
        assert_eq!(
            uart.pads.roles,
            [PadRole::Unused, PadRole::Unused, PadRole::Tx, PadRole::Rx]
        );
        assert_eq!(uart.pads.function_codes[0], PINMUX_UNUSED);
        assert_eq!(uart.pads.function_codes[1], PINMUX_UNUSED);
        assert!(!config.link.usb_enabled());
        assert_eq!(config.clock, ClockPlan::InternalOsc48m);
    }

    #[test]
    fn test_both_interfaces() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.interface = CommunicationInterface::Both;
        sel.uart = Some(uart());
        let config = resolve(&sel, &ResolutionPolicy::default()).unwrap().config;
        assert_eq!(config.link.interface(), CommunicationInterface::Both);
        assert_eq!(config.link.uart().unwrap().settings.rxpo, 3);
    }

    #[test]
    fn test_validation_runs_first() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.clock = ClockSelectors::new(ClockSource::CrystalHs);
        assert!(matches!(
            resolve(&sel, &ResolutionPolicy::default()),
            Err(ConfigError::MissingDependentValue(DependentValue::CrystalFrequency))
        ));
    }

    #[test]
    fn test_trigger_precedence_warning() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.boot.load_pin = Some(PinId::pa(27));
        let policy = ResolutionPolicy::new().with_trigger_conflict(TriggerPolicy::PreferDoubleTap);
        let resolution = resolve(&sel, &policy).unwrap();
        assert_eq!(resolution.config.boot_trigger, BootTrigger::DoubleTap);
        assert_eq!(
            resolution.warnings.as_slice(),
            &[Warning::ConflictingTrigger {
                kept: TriggerKind::DoubleTap
            }]
        );
    }

    #[test]
    fn test_deny_warnings() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.clock = ClockSelectors::new(ClockSource::Crystal32k);

        let lenient = ResolutionPolicy::default();
        let resolution = resolve(&sel, &lenient).unwrap();
        assert_eq!(resolution.warnings.len(), 1);

        let deny = lenient.with_deny_warnings(true);
        assert_eq!(
            resolve(&sel, &deny),
            Err(ConfigError::PromotedWarning(Warning::InexactMultiplier {
                achieved_hz: 48_005_120
            }))
        );

        let auto = deny.with_inexact_multiplier(InexactMultiplierPolicy::AutoFractional);
        assert!(matches!(
            resolve(&sel, &auto),
            Err(ConfigError::PromotedWarning(Warning::FractionalAutoEnabled { .. }))
        ));

        sel.clock = sel.clock.with_fractional(true);
        assert!(resolve(&sel, &deny).is_ok());
    }

    #[test]
    fn test_deterministic() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.clock = ClockSelectors::crystal_hs(16_000_000);
        sel.interface = CommunicationInterface::Both;
        sel.uart = Some(uart());
        let policy = ResolutionPolicy::default();
        assert_eq!(resolve(&sel, &policy), resolve(&sel, &policy));
    }
}
