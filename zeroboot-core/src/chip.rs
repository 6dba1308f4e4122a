//! Target chip families
//!
//! The bootloader builds for the SAM x21 family only. The members differ in
//! which clock and communication peripherals they carry, which is all the
//! resolver needs to know about them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ClockSource, CommunicationInterface};

/// Supported chip families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChipFamily {
    /// SAM D21 (USB, DFLL48M, FDPLL96M)
    SamD21,
    /// SAM D11 (USB, DFLL48M, FDPLL96M, three SERCOMs)
    SamD11,
    /// SAM L21 (USB, DFLL48M, FDPLL96M)
    SamL21,
    /// SAM C21 (no USB, no DFLL; OSC48M instead)
    SamC21,
}

impl ChipFamily {
    /// Whether the family has a full-speed USB device peripheral
    pub const fn has_usb(self) -> bool {
        !matches!(self, ChipFamily::SamC21)
    }

    /// Whether the family has the DFLL48M oscillator
    pub const fn has_dfll(self) -> bool {
        !matches!(self, ChipFamily::SamC21)
    }

    /// Number of SERCOM instances on the family's largest package
    pub const fn sercom_count(self) -> u8 {
        match self {
            ChipFamily::SamD21 => 6,
            ChipFamily::SamD11 => 3,
            ChipFamily::SamL21 => 6,
            ChipFamily::SamC21 => 4,
        }
    }

    /// Interface used when a board does not choose one
    pub const fn default_interface(self) -> CommunicationInterface {
        if self.has_usb() {
            CommunicationInterface::UsbOnly
        } else {
            CommunicationInterface::UartOnly
        }
    }

    /// Clock source used when a board does not choose one
    pub const fn default_clock_source(self) -> ClockSource {
        if self.has_usb() {
            ClockSource::InternalUsbSynced
        } else {
            ClockSource::InternalRc
        }
    }

    /// Short display name
    pub const fn name(self) -> &'static str {
        match self {
            ChipFamily::SamD21 => "SAMD21",
            ChipFamily::SamD11 => "SAMD11",
            ChipFamily::SamL21 => "SAML21",
            ChipFamily::SamC21 => "SAMC21",
        }
    }
}
