//! SERCOM UART pad resolution
//!
//! A SERCOM exposes four pads. The board names which pads carry RX and TX
//! and on which pin/mux; the driver wants a fixed four-entry PINMUX table,
//! the RXPO/TXPO pad-settings pair and the BAUD register value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chip::ChipFamily;
use crate::clock::TARGET_MCK_HZ;
use crate::config::{PadSelector, PinId, PinMux, UartSelectors};
use crate::error::{ConfigError, PadRoleFault, RangeItem};

/// PINMUX value of an unused pad
pub const PINMUX_UNUSED: u32 = 0xFFFF_FFFF;

/// Pads per SERCOM
pub const PAD_COUNT: usize = 4;

/// Role of a pad in the resolved table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PadRole {
    #[default]
    Unused,
    Rx,
    Tx,
}

/// Resolved pad table for one SERCOM instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialPadMapping {
    pub instance: u8,
    pub roles: [PadRole; PAD_COUNT],
    /// `(pin << 16) | mux`, or [`PINMUX_UNUSED`]
    pub function_codes: [u32; PAD_COUNT],
}

impl SerialPadMapping {
    /// Pad index carrying `role`
    pub fn pad_for(&self, role: PadRole) -> Option<u8> {
        self.roles.iter().position(|r| *r == role).map(|i| i as u8)
    }

    /// Active `(pad, role, code)` entries
    pub fn active(&self) -> impl Iterator<Item = (u8, PadRole, u32)> + '_ {
        self.roles
            .iter()
            .zip(self.function_codes.iter())
            .enumerate()
            .filter(|(_, (role, _))| **role != PadRole::Unused)
            .map(|(pad, (role, code))| (pad as u8, *role, *code))
    }
}

/// USART CTRLA pad settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartPadSettings {
    /// RX pad number
    pub rxpo: u8,
    /// 0 = TX on PAD0, 1 = TX on PAD2
    pub txpo: u8,
}

/// Everything the UART bring-up needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartConfig {
    pub pads: SerialPadMapping,
    pub settings: UartPadSettings,
    pub baud_rate: u32,
    /// Arithmetic-mode BAUD register value
    pub baud_register: u16,
}

/// PINMUX code for a pin/function pair
pub const fn function_code(pin: PinId, mux: PinMux) -> u32 {
    ((pin.number() as u32) << 16) | mux.value() as u32
}

/// Resolve the UART pads of `selectors` on `chip`
pub fn resolve_uart(chip: ChipFamily, selectors: &UartSelectors) -> Result<UartConfig, ConfigError> {
    if selectors.instance >= chip.sercom_count() {
        return Err(ConfigError::UnknownSerialInstance {
            instance: selectors.instance,
            available: chip.sercom_count(),
        });
    }

    let mut roles = [PadRole::Unused; PAD_COUNT];
    let mut function_codes = [PINMUX_UNUSED; PAD_COUNT];
    for (pad, selector) in selectors.pads.iter().enumerate() {
        let (role, code) = match *selector {
            PadSelector::Unused => (PadRole::Unused, PINMUX_UNUSED),
            PadSelector::Rx { pin, mux } => (PadRole::Rx, function_code(pin, mux)),
            PadSelector::Tx { pin, mux } => (PadRole::Tx, function_code(pin, mux)),
        };
        roles[pad] = role;
        function_codes[pad] = code;
    }

    check_conflicts(&selectors.pads)?;
    let settings = pad_settings(&roles)?;
    let baud_register = baud_register(selectors.baud_rate, TARGET_MCK_HZ)?;

    let config = UartConfig {
        pads: SerialPadMapping {
            instance: selectors.instance,
            roles,
            function_codes,
        },
        settings,
        baud_rate: selectors.baud_rate,
        baud_register,
    };
    debug!(
        "SERCOM{} rxpo={} txpo={} baud={}",
        config.pads.instance,
        config.settings.rxpo,
        config.settings.txpo,
        config.baud_register
    );
    Ok(config)
}

/// Reject two active pads on one pin
fn check_conflicts(pads: &[PadSelector; PAD_COUNT]) -> Result<(), ConfigError> {
    for (first, a) in pads.iter().enumerate() {
        let Some(pin) = a.pin() else { continue };
        for (second, b) in pads.iter().enumerate().skip(first + 1) {
            if b.pin() == Some(pin) {
                return Err(ConfigError::PadConflict {
                    first: first as u8,
                    second: second as u8,
                    pin: pin.number(),
                });
            }
        }
    }
    Ok(())
}

/// RXPO/TXPO for a role table with exactly one RX and one TX
fn pad_settings(roles: &[PadRole; PAD_COUNT]) -> Result<UartPadSettings, ConfigError> {
    let mut rx = None;
    let mut tx = None;
    for (pad, role) in roles.iter().enumerate() {
        let slot = match role {
            PadRole::Unused => continue,
            PadRole::Rx => &mut rx,
            PadRole::Tx => &mut tx,
        };
        if slot.replace(pad as u8).is_some() {
            let fault = match role {
                PadRole::Rx => PadRoleFault::DuplicateRx,
                _ => PadRoleFault::DuplicateTx,
            };
            return Err(ConfigError::InvalidPadRoles(fault));
        }
    }

    let rxpo = rx.ok_or(ConfigError::InvalidPadRoles(PadRoleFault::MissingRx))?;
    let txpo = match tx.ok_or(ConfigError::InvalidPadRoles(PadRoleFault::MissingTx))? {
        0 => 0,
        2 => 1,
        pad => {
            return Err(ConfigError::InvalidPadRoles(
                PadRoleFault::TxPadNotSupported(pad),
            ))
        }
    };
    Ok(UartPadSettings { rxpo, txpo })
}

/// Arithmetic baud value: `65536 * (1 - 16 * baud / fref)`, rounded
pub fn baud_register(baud_rate: u32, fref_hz: u32) -> Result<u16, ConfigError> {
    let oversampled = 16 * baud_rate as u64;
    if baud_rate == 0 || oversampled > fref_hz as u64 {
        return Err(ConfigError::OutOfRange(RangeItem::BaudRate));
    }
    let fref = fref_hz as u64;
    let value = (65_536 * (fref - oversampled) + fref / 2) / fref;
    u16::try_from(value).map_err(|_| ConfigError::OutOfRange(RangeItem::BaudRate))
}
