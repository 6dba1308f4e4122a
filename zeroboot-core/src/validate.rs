//! Constraint validation
//!
//! Cross-field checks that run before anything is derived. The first
//! violation found is returned; questionable but legal combinations are
//! recorded as warnings.

use crate::config::{
    ClockSource, CommunicationInterface, ImageBudget, LedMode, LedRole, ResolutionPolicy,
    SelectorSet, TriggerPolicy,
};
use crate::error::{
    push_warning, ConfigError, DependentValue, ImageFeature, PllOption, Warning, Warnings,
};

/// Validate a selector set
pub fn validate(selectors: &SelectorSet, policy: &ResolutionPolicy) -> Result<Warnings, ConfigError> {
    let mut warnings = Warnings::new();

    check_interface(selectors, &mut warnings)?;
    check_clock(selectors, &mut warnings)?;
    check_triggers(selectors, policy)?;
    check_leds(selectors)?;
    check_identity(selectors)?;
    check_image_budget(selectors)?;

    Ok(warnings)
}

fn check_interface(selectors: &SelectorSet, warnings: &mut Warnings) -> Result<(), ConfigError> {
    let interface = selectors.interface;
    if interface.uses_usb() && !selectors.chip.has_usb() {
        return Err(ConfigError::IncompatibleInterface {
            chip: selectors.chip,
            interface,
        });
    }
    if interface.uses_uart() && selectors.uart.is_none() {
        return Err(ConfigError::MissingDependentValue(DependentValue::UartPads));
    }
    if !interface.uses_uart() && selectors.uart.is_some() {
        push_warning(warnings, Warning::UartPadsIgnored);
    }
    Ok(())
}

fn check_clock(selectors: &SelectorSet, warnings: &mut Warnings) -> Result<(), ConfigError> {
    let clock = &selectors.clock;
    let chip = selectors.chip;

    match clock.source {
        ClockSource::InternalRc => {}
        ClockSource::InternalUsbSynced => {
            if !chip.has_dfll() || !chip.has_usb() {
                return Err(ConfigError::UnsupportedClockSource {
                    chip,
                    source: clock.source,
                });
            }
            if !selectors.interface.uses_usb() {
                push_warning(warnings, Warning::ClockRecoveryWithoutUsb);
            }
        }
        ClockSource::Crystal32k => {
            if clock.fast_startup {
                push_warning(warnings, Warning::FastStartupIgnored);
            }
        }
        ClockSource::CrystalHs => {
            crate::clock::crystal_frequency(clock)?;
        }
    }

    if clock.source != ClockSource::CrystalHs && clock.crystal_hz.is_some() {
        return Err(ConfigError::InapplicableOption(PllOption::CrystalFrequency));
    }
    if !clock.source.uses_pll() {
        if clock.fast_startup {
            return Err(ConfigError::InapplicableOption(PllOption::FastStartup));
        }
        if clock.fractional {
            return Err(ConfigError::InapplicableOption(PllOption::Fractional));
        }
    }
    Ok(())
}

fn check_triggers(selectors: &SelectorSet, policy: &ResolutionPolicy) -> Result<(), ConfigError> {
    if selectors.boot.is_conflicting() && policy.trigger_conflict == TriggerPolicy::Reject {
        return Err(ConfigError::ConflictingTrigger);
    }
    Ok(())
}

fn check_leds(selectors: &SelectorSet) -> Result<(), ConfigError> {
    for (role, mode) in selectors.leds.roles() {
        if role != LedRole::Main && matches!(mode, LedMode::Fade { .. }) {
            return Err(ConfigError::UnsupportedLedMode(role));
        }
    }
    Ok(())
}

fn check_identity(selectors: &SelectorSet) -> Result<(), ConfigError> {
    let identity = &selectors.identity;
    if !identity.strings_enabled {
        return Ok(());
    }
    if identity.manufacturer.is_empty() {
        return Err(ConfigError::MissingDependentValue(DependentValue::Manufacturer));
    }
    if identity.product.is_empty() {
        return Err(ConfigError::MissingDependentValue(DependentValue::Product));
    }
    Ok(())
}

fn check_image_budget(selectors: &SelectorSet) -> Result<(), ConfigError> {
    if selectors.image != ImageBudget::Kb4 {
        return Ok(());
    }
    if selectors.interface == CommunicationInterface::Both {
        return Err(ConfigError::ExceedsImageBudget(ImageFeature::BothInterfaces));
    }
    if selectors.identity.extended_capabilities {
        return Err(ConfigError::ExceedsImageBudget(
            ImageFeature::ExtendedCapabilities,
        ));
    }
    if selectors.identity.strings_enabled {
        return Err(ConfigError::ExceedsImageBudget(ImageFeature::VendorStrings));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ChipFamily;
    use crate::config::{
        ClockSelectors, LedPolarity, PadSelector, PinId, PinMux, SercomPad, UartSelectors,
    };
    use crate::error::RangeItem;

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

    fn check(selectors: &SelectorSet) -> Result<Warnings, ConfigError> {
        validate(selectors, &ResolutionPolicy::default())
    }

    #[test]
    fn test_defaults_are_valid() {
        for chip in [
            ChipFamily::SamD21,
            ChipFamily::SamD11,
            ChipFamily::SamL21,
        ] {
            assert!(check(&SelectorSet::for_chip(chip)).unwrap().is_empty());
        }

        let mut c21 = SelectorSet::for_chip(ChipFamily::SamC21);
        c21.uart = Some(uart());
        assert!(check(&c21).unwrap().is_empty());
    }

    #[test]
    fn test_usb_on_c21_rejected() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamC21);
        sel.uart = Some(uart());
        for interface in [CommunicationInterface::UsbOnly, CommunicationInterface::Both] {
            sel.interface = interface;
            assert_eq!(
                check(&sel),
                Err(ConfigError::IncompatibleInterface {
                    chip: ChipFamily::SamC21,
                    interface
                })
            );
        }
    }

    #[test]
    fn test_uart_requires_pads() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.interface = CommunicationInterface::Both;
        assert_eq!(
            check(&sel),
            Err(ConfigError::MissingDependentValue(DependentValue::UartPads))
        );
    }

    #[test]
    fn test_usb_only_ignores_pads() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.uart = Some(uart());
        assert_eq!(check(&sel).unwrap().as_slice(), &[Warning::UartPadsIgnored]);
    }

    #[test]
    fn test_crystal_hs_frequency() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.clock = ClockSelectors::new(ClockSource::CrystalHs);
        assert_eq!(
            check(&sel),
            Err(ConfigError::MissingDependentValue(
                DependentValue::CrystalFrequency
            ))
        );

        sel.clock = ClockSelectors::crystal_hs(-1);
        assert!(matches!(
            check(&sel),
            Err(ConfigError::MissingDependentValue(_))
        ));

        sel.clock = ClockSelectors::crystal_hs(100_000);
        assert_eq!(
            check(&sel),
            Err(ConfigError::OutOfRange(RangeItem::CrystalFrequency))
        );

        sel.clock = ClockSelectors::crystal_hs(16_000_000);
        assert!(check(&sel).is_ok());
    }

    #[test]
    fn test_pll_options_need_crystal() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.clock = ClockSelectors::new(ClockSource::InternalRc).with_fast_startup(true);
        assert_eq!(
            check(&sel),
            Err(ConfigError::InapplicableOption(PllOption::FastStartup))
        );

        sel.clock = ClockSelectors::new(ClockSource::InternalUsbSynced).with_fractional(true);
        assert_eq!(
            check(&sel),
            Err(ConfigError::InapplicableOption(PllOption::Fractional))
        );

        sel.clock = ClockSelectors::new(ClockSource::Crystal32k).with_fast_startup(true);
        assert_eq!(check(&sel).unwrap().as_slice(), &[Warning::FastStartupIgnored]);
    }

    #[test]
    fn test_crystal_frequency_only_for_crystal_hs() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        for source in [
            ClockSource::InternalRc,
            ClockSource::InternalUsbSynced,
            ClockSource::Crystal32k,
        ] {
            for hz in [-5, 16_000_000] {
                sel.clock = ClockSelectors {
                    crystal_hz: Some(hz),
                    ..ClockSelectors::new(source)
                };
                assert_eq!(
                    validate(&sel, &ResolutionPolicy::strict()),
                    Err(ConfigError::InapplicableOption(PllOption::CrystalFrequency))
                );
            }
        }
    }

    #[test]
    fn test_usb_sync_without_usb() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.interface = CommunicationInterface::UartOnly;
        sel.uart = Some(uart());
        assert_eq!(
            check(&sel).unwrap().as_slice(),
            &[Warning::ClockRecoveryWithoutUsb]
        );

        let mut c21 = SelectorSet::for_chip(ChipFamily::SamC21);
        c21.uart = Some(uart());
        c21.clock = ClockSelectors::new(ClockSource::InternalUsbSynced);
        assert!(matches!(
            check(&c21),
            Err(ConfigError::UnsupportedClockSource { .. })
        ));
    }

    #[test]
    fn test_conflicting_triggers() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.boot.load_pin = Some(PinId::pa(27));
        assert_eq!(check(&sel), Err(ConfigError::ConflictingTrigger));

        let policy = ResolutionPolicy::new().with_trigger_conflict(TriggerPolicy::PreferPinLevel);
        assert!(validate(&sel, &policy).is_ok());
    }

    #[test]
    fn test_fade_only_on_main() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        let fade = LedMode::Fade {
            pin: PinId::pa(17),
            polarity: LedPolarity::HighOn,
        };
        sel.leds.main = fade;
        assert!(check(&sel).is_ok());

        sel.leds.tx = fade;
        assert_eq!(check(&sel), Err(ConfigError::UnsupportedLedMode(LedRole::Tx)));
    }

    #[test]
    fn test_strings_need_values() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.identity.strings_enabled = true;
        assert_eq!(
            check(&sel),
            Err(ConfigError::MissingDependentValue(DependentValue::Manufacturer))
        );
        sel.identity.manufacturer.push_str("Acme").unwrap();
        assert_eq!(
            check(&sel),
            Err(ConfigError::MissingDependentValue(DependentValue::Product))
        );
        sel.identity.product.push_str("Widget").unwrap();
        assert!(check(&sel).is_ok());
    }

    #[test]
    fn test_4kb_budget() {
        let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
        sel.image = ImageBudget::Kb4;
        assert!(check(&sel).is_ok());

        sel.identity.extended_capabilities = true;
        assert_eq!(
            check(&sel),
            Err(ConfigError::ExceedsImageBudget(
                ImageFeature::ExtendedCapabilities
            ))
        );

        sel.identity.extended_capabilities = false;
        sel.interface = CommunicationInterface::Both;
        sel.uart = Some(uart());
        assert_eq!(
            check(&sel),
            Err(ConfigError::ExceedsImageBudget(ImageFeature::BothInterfaces))
        );
    }
}
