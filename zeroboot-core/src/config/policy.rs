//! Resolution policy
//!
//! A couple of selector combinations are legal but questionable. Rather than
//! guess what a board author meant, the resolver asks the policy.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do when the PLL cannot hit the target with an integer multiplier
/// and the board did not ask for fractional mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InexactMultiplierPolicy {
    /// Fail resolution
    Reject,
    /// Use the nearest integer multiplier and report the achieved frequency
    #[default]
    Warn,
    /// Switch fractional mode on and report it
    AutoFractional,
}

/// What to do when double-tap and load-pin triggers are both enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TriggerPolicy {
    /// Fail resolution
    #[default]
    Reject,
    /// Keep double-tap, drop the load pin
    PreferDoubleTap,
    /// Keep the load pin, drop double-tap
    PreferPinLevel,
}

/// Policy knobs for a resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolutionPolicy {
    pub inexact_multiplier: InexactMultiplierPolicy,
    pub trigger_conflict: TriggerPolicy,
    /// Promote every warning to an error
    pub deny_warnings: bool,
}

impl ResolutionPolicy {
    pub const fn new() -> Self {
        Self {
            inexact_multiplier: InexactMultiplierPolicy::Warn,
            trigger_conflict: TriggerPolicy::Reject,
            deny_warnings: false,
        }
    }

    /// Reject anything that is not exact
    pub const fn strict() -> Self {
        Self {
            inexact_multiplier: InexactMultiplierPolicy::Reject,
            trigger_conflict: TriggerPolicy::Reject,
            deny_warnings: true,
        }
    }

    pub const fn with_inexact_multiplier(mut self, policy: InexactMultiplierPolicy) -> Self {
        self.inexact_multiplier = policy;
        self
    }

    pub const fn with_trigger_conflict(mut self, policy: TriggerPolicy) -> Self {
        self.trigger_conflict = policy;
        self
    }

    pub const fn with_deny_warnings(mut self, deny: bool) -> Self {
        self.deny_warnings = deny;
        self
    }
}
