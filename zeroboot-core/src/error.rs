//! Resolution errors and warnings
//!
//! Every error is fatal: a board that fails resolution must never produce
//! an image. Warnings describe configurations that work but are probably
//! not what the author wanted; [`ResolutionPolicy::deny_warnings`] turns
//! them into [`ConfigError::PromotedWarning`].
//!
//! [`ResolutionPolicy::deny_warnings`]: crate::ResolutionPolicy::deny_warnings

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chip::ChipFamily;
use crate::config::{ClockSource, CommunicationInterface, LedRole};

/// Maximum warnings collected in one resolution run
pub const MAX_WARNINGS: usize = 8;

/// Warnings collected during resolution
pub type Warnings = heapless::Vec<Warning, MAX_WARNINGS>;

/// Value that another selector depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DependentValue {
    /// High-speed crystal frequency
    CrystalFrequency,
    /// UART pad assignment
    UartPads,
    /// Manufacturer string (strings enabled)
    Manufacturer,
    /// Product string (strings enabled)
    Product,
}

/// Clock option tied to a particular source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PllOption {
    FastStartup,
    Fractional,
    /// Declared frequency of the high-speed crystal
    CrystalFrequency,
}

/// Feature that does not fit a 4 KB image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageFeature {
    BothInterfaces,
    ExtendedCapabilities,
    VendorStrings,
}

/// Quantity that fell outside its hardware range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RangeItem {
    /// XOSC frequency (400 kHz - 32 MHz)
    CrystalFrequency,
    /// No pre-divider puts the crystal inside a DPLL reference band
    PllReference,
    /// Multiplier zero or beyond the 12-bit loop divider
    PllMultiplier,
    /// Baud rate zero or above fref / 16
    BaudRate,
}

/// Problem with the UART pad roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PadRoleFault {
    MissingRx,
    MissingTx,
    DuplicateRx,
    DuplicateTx,
    /// TX is only routable to PAD0 or PAD2
    TxPadNotSupported(u8),
}

/// Which trigger survived a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TriggerKind {
    DoubleTap,
    PinLevel,
}

/// Fatal resolution error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConfigError {
    /// A selector requires a value that is absent or not positive
    MissingDependentValue(DependentValue),
    /// Interface needs a peripheral the chip lacks
    IncompatibleInterface {
        chip: ChipFamily,
        interface: CommunicationInterface,
    },
    /// Clock source needs a peripheral the chip lacks
    UnsupportedClockSource {
        chip: ChipFamily,
        source: ClockSource,
    },
    /// More than one boot trigger enabled
    ConflictingTrigger,
    /// Clock option set for a source it does not apply to
    InapplicableOption(PllOption),
    /// Fade requested for an LED that cannot pulse
    UnsupportedLedMode(LedRole),
    /// Feature does not fit the image budget
    ExceedsImageBudget(ImageFeature),
    /// Value outside hardware range
    OutOfRange(RangeItem),
    /// PLL multiplier is not exact and the policy rejects it
    InexactMultiplier {
        /// Frequency the nearest integer multiplier would produce
        achieved_hz: u32,
    },
    /// UART pad roles are incomplete or unroutable
    InvalidPadRoles(PadRoleFault),
    /// SERCOM instance does not exist on this chip
    UnknownSerialInstance { instance: u8, available: u8 },
    /// Two active pads resolve to the same pin
    PadConflict { first: u8, second: u8, pin: u8 },
    /// A warning promoted by policy
    PromotedWarning(Warning),
}

/// Non-fatal resolution finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Warning {
    /// Integer PLL multiplier misses the target
    InexactMultiplier { achieved_hz: u32 },
    /// Fractional mode switched on by policy
    FractionalAutoEnabled { achieved_hz: u32 },
    /// Fast startup has no effect on the 32 kHz crystal
    FastStartupIgnored,
    /// Both boot triggers enabled; only one is kept
    ConflictingTrigger { kept: TriggerKind },
    /// UART pads given but the interface is USB only
    UartPadsIgnored,
    /// USB clock recovery enabled but USB is not brought up
    ClockRecoveryWithoutUsb,
}

impl fmt::Display for DependentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependentValue::CrystalFrequency => {
                f.write_str("high-speed crystal selected without a positive frequency")
            }
            DependentValue::UartPads => f.write_str("UART interface selected without pads"),
            DependentValue::Manufacturer => {
                f.write_str("vendor strings enabled without a manufacturer string")
            }
            DependentValue::Product => f.write_str("vendor strings enabled without a product string"),
        }
    }
}

impl fmt::Display for RangeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeItem::CrystalFrequency => "crystal frequency must be 400 kHz - 32 MHz",
            RangeItem::PllReference => "no pre-divider brings the crystal into a PLL reference band",
            RangeItem::PllMultiplier => "PLL multiplier must be 1-4096",
            RangeItem::BaudRate => "baud rate must be non-zero and at most 3 Mbaud",
        })
    }
}

impl fmt::Display for PadRoleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadRoleFault::MissingRx => f.write_str("no RX pad"),
            PadRoleFault::MissingTx => f.write_str("no TX pad"),
            PadRoleFault::DuplicateRx => f.write_str("more than one RX pad"),
            PadRoleFault::DuplicateTx => f.write_str("more than one TX pad"),
            PadRoleFault::TxPadNotSupported(pad) => {
                write!(f, "TX on PAD{} (only PAD0 or PAD2)", pad)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingDependentValue(value) => write!(f, "{}", value),
            ConfigError::IncompatibleInterface { chip, interface } => {
                write!(f, "{} has no USB; {:?} is not available", chip.name(), interface)
            }
            ConfigError::UnsupportedClockSource { chip, source } => {
                write!(f, "{:?} clock is not available on {}", source, chip.name())
            }
            ConfigError::ConflictingTrigger => {
                f.write_str("double-tap and load-pin boot triggers are both enabled")
            }
            ConfigError::InapplicableOption(PllOption::CrystalFrequency) => {
                f.write_str("crystal frequency only applies to the high-speed crystal source")
            }
            ConfigError::InapplicableOption(option) => {
                write!(f, "{:?} only applies to crystal (PLL) clock sources", option)
            }
            ConfigError::UnsupportedLedMode(role) => {
                write!(f, "{:?} LED cannot fade; only the main LED can", role)
            }
            ConfigError::ExceedsImageBudget(feature) => {
                write!(f, "{:?} does not fit a 4 KB bootloader", feature)
            }
            ConfigError::OutOfRange(item) => write!(f, "{}", item),
            ConfigError::InexactMultiplier { achieved_hz } => write!(
                f,
                "PLL cannot reach the master clock exactly (nearest {} Hz); enable fractional mode",
                achieved_hz
            ),
            ConfigError::InvalidPadRoles(fault) => write!(f, "invalid UART pads: {}", fault),
            ConfigError::UnknownSerialInstance {
                instance,
                available,
            } => write!(
                f,
                "SERCOM{} does not exist (chip has {})",
                instance, available
            ),
            ConfigError::PadConflict { first, second, pin } => write!(
                f,
                "PAD{} and PAD{} both use pin {}",
                first, second, pin
            ),
            ConfigError::PromotedWarning(warning) => write!(f, "{} (warnings denied)", warning),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InexactMultiplier { achieved_hz } => write!(
                f,
                "integer PLL multiplier gives {} Hz instead of the master clock",
                achieved_hz
            ),
            Warning::FractionalAutoEnabled { achieved_hz } => write!(
                f,
                "fractional PLL mode enabled automatically ({} Hz)",
                achieved_hz
            ),
            Warning::FastStartupIgnored => {
                f.write_str("fast startup has no effect with the 32.768 kHz crystal")
            }
            Warning::ConflictingTrigger { kept } => write!(
                f,
                "both boot triggers enabled; keeping {:?} only",
                kept
            ),
            Warning::UartPadsIgnored => f.write_str("UART pads ignored for a USB-only interface"),
            Warning::ClockRecoveryWithoutUsb => f.write_str(
                "USB clock recovery enabled but USB is not used; DFLL stays open-loop",
            ),
        }
    }
}

/// Record a warning
///
/// The list holds one slot per distinct warning, so a push cannot overflow.
pub(crate) fn push_warning(warnings: &mut Warnings, warning: Warning) {
    warn!("{:?}", warning);
    if !warnings.contains(&warning) {
        let _ = warnings.push(warning);
    }
}
