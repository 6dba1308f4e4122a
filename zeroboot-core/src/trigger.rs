//! Boot trigger selection
//!
//! The reset-time check looks at exactly one mechanism. When a board enables
//! both, [`TriggerPolicy`] decides which survives.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{BootTriggerSelectors, PinId, TriggerPolicy};
use crate::error::{ConfigError, TriggerKind, Warning};

/// Condition that keeps the bootloader active after reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BootTrigger {
    /// Two resets in quick succession
    DoubleTap,
    /// Pin tied low at reset
    PinLevel(PinId),
    /// Only an invalid application keeps the bootloader running
    None,
}

impl BootTrigger {
    /// Pick the active trigger
    ///
    /// Returns the trigger together with a warning when a conflict was
    /// settled by precedence. Fails with [`ConfigError::ConflictingTrigger`]
    /// when the policy rejects conflicts.
    pub fn select(
        selectors: &BootTriggerSelectors,
        policy: TriggerPolicy,
    ) -> Result<(Self, Option<Warning>), ConfigError> {
        match (selectors.double_tap, selectors.load_pin) {
            (false, None) => Ok((BootTrigger::None, None)),
            (true, None) => Ok((BootTrigger::DoubleTap, None)),
            (false, Some(pin)) => Ok((BootTrigger::PinLevel(pin), None)),
            (true, Some(pin)) => match policy {
                TriggerPolicy::Reject => Err(ConfigError::ConflictingTrigger),
                TriggerPolicy::PreferDoubleTap => Ok((
                    BootTrigger::DoubleTap,
                    Some(Warning::ConflictingTrigger {
                        kept: TriggerKind::DoubleTap,
                    }),
                )),
                TriggerPolicy::PreferPinLevel => Ok((
                    BootTrigger::PinLevel(pin),
                    Some(Warning::ConflictingTrigger {
                        kept: TriggerKind::PinLevel,
                    }),
                )),
            },
        }
    }

    /// Pin sampled by the trigger check, if any
    pub const fn pin(&self) -> Option<PinId> {
        match self {
            BootTrigger::PinLevel(pin) => Some(*pin),
            BootTrigger::DoubleTap | BootTrigger::None => None,
        }
    }
}
