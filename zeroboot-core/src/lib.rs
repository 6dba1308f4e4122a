//! Board configuration resolution for the zeroboot bootloader
//!
//! The bootloader runs on SAM D21/D11/L21/C21 parts ahead of the user
//! application. Everything it needs to bring up the clock tree, the USB CDC
//! or SERCOM UART link and the boot-trigger check is derived here, once,
//! from a small set of board selectors:
//!
//! - Selector types and resolution policy (`config`)
//! - Constraint validation across selectors (`validate`)
//! - DFLL / DPLL clock derivation for the 48 MHz master clock (`clock`)
//! - SERCOM pad to pin-function mapping (`pinmux`)
//! - USB identity block (`identity`)
//! - Boot trigger precedence (`trigger`)
//!
//! [`resolve`] ties these together and returns an immutable
//! [`ResolvedConfig`] that is handed by reference to every consumer.

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

#[cfg(feature = "serde")]
pub mod blob;
pub mod chip;
pub mod clock;
pub mod config;
pub mod error;
pub mod identity;
pub mod pinmux;
pub mod resolve;
pub mod trigger;
pub mod validate;

pub use chip::ChipFamily;
pub use clock::{ClockDerivation, ClockPlan, TARGET_MCK_HZ};
pub use config::*;
pub use error::{ConfigError, Warning, Warnings};
pub use identity::BoardIdentity;
pub use pinmux::{PadRole, SerialPadMapping, UartConfig};
pub use resolve::{resolve, LinkConfig, Resolution, ResolvedConfig};
pub use trigger::BootTrigger;
