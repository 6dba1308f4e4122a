//! Clock tree derivation
//!
//! Every clock source ends at the same 48 MHz master clock. The internal
//! sources get there through the DFLL48M in open-loop mode (or OSC48M on
//! the C21); the crystals go through the FDPLL96M, for which the resolver
//! picks a reference pre-divider and loop ratio.
//!
//! DPLL arithmetic:
//!
//! ```text
//! f_ref  = f_xosc / (2 * (DIV + 1))          (XOSC32K: f_ref = 32768 Hz)
//! f_out  = f_ref * (LDR + 1 + LDRFRAC / 16)
//! ```
//!
//! The reference must sit between 32 kHz and 2 MHz and `LDR` is 12 bits.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chip::ChipFamily;
use crate::config::{ClockSelectors, ClockSource, InexactMultiplierPolicy};
use crate::error::{push_warning, ConfigError, DependentValue, RangeItem, Warning, Warnings};

/// Master clock (also CPU clock) frequency
pub const TARGET_MCK_HZ: u32 = 48_000_000;

/// XOSC32K crystal frequency
pub const XOSC32K_HZ: u32 = 32_768;

/// DFLL48M fine calibration for open-loop mode. The coarse value comes from
/// the NVM factory calibration row at runtime.
pub const DFLL48M_FINE_CALIBRATION: u16 = 512;

/// XOSC supported crystal range
pub const XOSC_MIN_HZ: u32 = 400_000;
pub const XOSC_MAX_HZ: u32 = 32_000_000;

/// Largest XOSC pre-divider (DIV is 11 bits, divider = 2 * (DIV + 1))
pub const MAX_PRE_DIVIDER: u16 = 4096;

/// Largest loop ratio (LDR is 12 bits and holds ratio - 1)
pub const MAX_LOOP_RATIO: u32 = 4096;

/// Reference band used with fast startup
const FAST_BAND_HZ: (u32, u32) = (1_000_000, 2_000_000);

/// Reference band used otherwise
const SLOW_BAND_HZ: (u32, u32) = (32_000, 64_000);

/// DPLL reference input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PllReference {
    Xosc32k,
    Xosc,
}

/// Fractional loop ratio: `integer + sixteenths / 16`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PllFraction {
    pub integer: u16,
    pub sixteenths: u8,
}

/// DPLL parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockDerivation {
    pub reference: PllReference,
    /// Crystal frequency before pre-division
    pub source_hz: u32,
    /// Crystal pre-divider (1 for XOSC32K)
    pub divider: u16,
    /// Reference frequency after pre-division (rounded down)
    pub reference_hz: u32,
    /// Nearest integer loop ratio
    pub multiplier: u16,
    /// Fractional loop ratio, present only in fractional mode
    pub fraction: Option<PllFraction>,
    pub fast_startup: bool,
    pub fractional_enabled: bool,
}

impl ClockDerivation {
    /// `LDR` register field
    pub const fn ldr(&self) -> u16 {
        match self.fraction {
            Some(fraction) => fraction.integer - 1,
            None => self.multiplier - 1,
        }
    }

    /// `LDRFRAC` register field
    pub const fn ldrfrac(&self) -> u8 {
        match self.fraction {
            Some(fraction) => fraction.sixteenths,
            None => 0,
        }
    }

    /// XOSC `DIV` field, `None` for the 32 kHz reference
    pub const fn xosc_div(&self) -> Option<u16> {
        match self.reference {
            PllReference::Xosc => Some(self.divider / 2 - 1),
            PllReference::Xosc32k => None,
        }
    }

    /// Frequency the DPLL actually produces
    pub const fn output_hz(&self) -> u32 {
        let sixteenths = match self.fraction {
            Some(fraction) => fraction.integer as u64 * 16 + fraction.sixteenths as u64,
            None => self.multiplier as u64 * 16,
        };
        (self.source_hz as u64 * sixteenths / (16 * self.divider as u64)) as u32
    }
}

/// How the master clock is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockPlan {
    /// DFLL48M open loop with a stored trim value
    OpenLoopDfll {
        fine_calibration: u16,
        /// Hardware recalibration against USB start-of-frame while the link
        /// is attached and not suspended
        usb_clock_recovery: bool,
    },
    /// OSC48M internal oscillator (parts without a DFLL)
    InternalOsc48m,
    /// FDPLL96M from a crystal
    Pll(ClockDerivation),
}

impl ClockPlan {
    /// Nominal master clock frequency
    pub const fn master_clock_hz(&self) -> u32 {
        match self {
            ClockPlan::OpenLoopDfll { .. } | ClockPlan::InternalOsc48m => TARGET_MCK_HZ,
            ClockPlan::Pll(derivation) => derivation.output_hz(),
        }
    }

    pub const fn derivation(&self) -> Option<&ClockDerivation> {
        match self {
            ClockPlan::Pll(derivation) => Some(derivation),
            ClockPlan::OpenLoopDfll { .. } | ClockPlan::InternalOsc48m => None,
        }
    }
}

/// Derive the clock plan for the selected source
///
/// Assumes the selectors passed validation; the checks that guard the
/// arithmetic are repeated here regardless.
pub fn resolve_clock(
    chip: ChipFamily,
    selectors: &ClockSelectors,
    policy: InexactMultiplierPolicy,
    warnings: &mut Warnings,
) -> Result<ClockPlan, ConfigError> {
    let plan = match selectors.source {
        ClockSource::InternalRc => {
            if chip.has_dfll() {
                ClockPlan::OpenLoopDfll {
                    fine_calibration: DFLL48M_FINE_CALIBRATION,
                    usb_clock_recovery: false,
                }
            } else {
                ClockPlan::InternalOsc48m
            }
        }
        ClockSource::InternalUsbSynced => {
            if !chip.has_dfll() || !chip.has_usb() {
                return Err(ConfigError::UnsupportedClockSource {
                    chip,
                    source: selectors.source,
                });
            }
            ClockPlan::OpenLoopDfll {
                fine_calibration: DFLL48M_FINE_CALIBRATION,
                usb_clock_recovery: true,
            }
        }
        ClockSource::Crystal32k => {
            let derivation = derive_pll(
                PllReference::Xosc32k,
                XOSC32K_HZ,
                1,
                false,
                selectors.fractional,
                policy,
                warnings,
            )?;
            ClockPlan::Pll(derivation)
        }
        ClockSource::CrystalHs => {
            let crystal_hz = crystal_frequency(selectors)?;
            let divider = select_divider(crystal_hz, selectors.fast_startup)?;
            let derivation = derive_pll(
                PllReference::Xosc,
                crystal_hz,
                divider,
                selectors.fast_startup,
                selectors.fractional,
                policy,
                warnings,
            )?;
            ClockPlan::Pll(derivation)
        }
    };

    debug!("clock plan: {:?}", plan);
    Ok(plan)
}

/// Declared HS crystal frequency, checked for presence and range
pub fn crystal_frequency(selectors: &ClockSelectors) -> Result<u32, ConfigError> {
    let hz = match selectors.crystal_hz {
        Some(hz) if hz > 0 => hz,
        _ => {
            return Err(ConfigError::MissingDependentValue(
                DependentValue::CrystalFrequency,
            ))
        }
    };
    if hz < XOSC_MIN_HZ as i64 || hz > XOSC_MAX_HZ as i64 {
        return Err(ConfigError::OutOfRange(RangeItem::CrystalFrequency));
    }
    Ok(hz as u32)
}

/// Choose the XOSC pre-divider
///
/// An exact fit in the 1-2 MHz band always wins since it loses nothing.
/// Otherwise fast startup takes the highest 1-2 MHz reference, and the
/// default falls back to the 32-64 kHz band, exact fit first.
fn select_divider(crystal_hz: u32, fast_startup: bool) -> Result<u16, ConfigError> {
    let exact = |divider: &u16| is_exact(crystal_hz, *divider);

    if let Some(divider) = dividers_in_band(crystal_hz, FAST_BAND_HZ).find(exact) {
        return Ok(divider);
    }
    if fast_startup {
        if let Some(divider) = dividers_in_band(crystal_hz, FAST_BAND_HZ).next() {
            return Ok(divider);
        }
    }
    dividers_in_band(crystal_hz, SLOW_BAND_HZ)
        .find(exact)
        .or_else(|| dividers_in_band(crystal_hz, SLOW_BAND_HZ).next())
        .ok_or(ConfigError::OutOfRange(RangeItem::PllReference))
}

/// Even pre-dividers that put the crystal inside `band`, highest reference
/// first
fn dividers_in_band(crystal_hz: u32, band: (u32, u32)) -> impl Iterator<Item = u16> {
    (1..=MAX_PRE_DIVIDER / 2)
        .map(|k| k * 2)
        .filter(move |&divider| {
            let low = band.0 as u64 * divider as u64;
            let high = band.1 as u64 * divider as u64;
            (low..=high).contains(&(crystal_hz as u64))
        })
}

/// Whether `crystal / divider` multiplies to the target exactly
fn is_exact(source_hz: u32, divider: u16) -> bool {
    (TARGET_MCK_HZ as u64 * divider as u64) % source_hz as u64 == 0
}

fn derive_pll(
    reference: PllReference,
    source_hz: u32,
    divider: u16,
    fast_startup: bool,
    fractional: bool,
    policy: InexactMultiplierPolicy,
    warnings: &mut Warnings,
) -> Result<ClockDerivation, ConfigError> {
    let reference_hz = source_hz / divider as u32;
    if source_hz == 0 || reference_hz == 0 {
        return Err(ConfigError::OutOfRange(RangeItem::PllReference));
    }

    // Nearest integer ratio of target * divider / source
    let scaled_target = TARGET_MCK_HZ as u64 * divider as u64;
    let multiplier = (scaled_target + source_hz as u64 / 2) / source_hz as u64;
    if multiplier == 0 || multiplier > MAX_LOOP_RATIO as u64 {
        return Err(ConfigError::OutOfRange(RangeItem::PllMultiplier));
    }

    let mut derivation = ClockDerivation {
        reference,
        source_hz,
        divider,
        reference_hz,
        multiplier: multiplier as u16,
        fraction: None,
        fast_startup,
        fractional_enabled: false,
    };

    if is_exact(source_hz, divider) {
        return Ok(derivation);
    }

    let auto = match (fractional, policy) {
        (true, _) => false,
        (false, InexactMultiplierPolicy::AutoFractional) => true,
        (false, InexactMultiplierPolicy::Warn) => {
            push_warning(
                warnings,
                Warning::InexactMultiplier {
                    achieved_hz: derivation.output_hz(),
                },
            );
            return Ok(derivation);
        }
        (false, InexactMultiplierPolicy::Reject) => {
            return Err(ConfigError::InexactMultiplier {
                achieved_hz: derivation.output_hz(),
            })
        }
    };

    derivation.fraction = Some(fraction_for(source_hz, divider)?);
    derivation.fractional_enabled = true;
    if auto {
        push_warning(
            warnings,
            Warning::FractionalAutoEnabled {
                achieved_hz: derivation.output_hz(),
            },
        );
    }
    Ok(derivation)
}

/// Nearest loop ratio in sixteenths
fn fraction_for(source_hz: u32, divider: u16) -> Result<PllFraction, ConfigError> {
    let scaled_target = TARGET_MCK_HZ as u64 * divider as u64 * 16;
    let sixteenths = (scaled_target + source_hz as u64 / 2) / source_hz as u64;
    let integer = sixteenths / 16;
    if integer == 0 || integer > MAX_LOOP_RATIO as u64 {
        return Err(ConfigError::OutOfRange(RangeItem::PllMultiplier));
    }
    Ok(PllFraction {
        integer: integer as u16,
        sixteenths: (sixteenths % 16) as u8,
    })
}
