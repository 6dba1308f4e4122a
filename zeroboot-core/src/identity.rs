//! USB identity block

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{IdentitySelectors, MAX_STRING_LEN};

/// Accelerated programming commands (erase, buffered write, CRC)
/// understood by bossac and the Arduino IDE
pub const EXTENDED_COMMANDS: [u8; 3] = *b"XYZ";

/// Identity presented to the host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Present only when strings are enabled
    pub manufacturer: Option<String<MAX_STRING_LEN>>,
    /// Present only when strings are enabled
    pub product: Option<String<MAX_STRING_LEN>>,
    pub strings_enabled: bool,
    pub extended_capabilities: bool,
}

impl BoardIdentity {
    /// Assemble the identity from selectors
    pub fn assemble(selectors: &IdentitySelectors) -> Self {
        let strings = |s: &String<MAX_STRING_LEN>| selectors.strings_enabled.then(|| s.clone());
        Self {
            vendor_id: selectors.vendor_id,
            product_id: selectors.product_id,
            manufacturer: strings(&selectors.manufacturer),
            product: strings(&selectors.product),
            strings_enabled: selectors.strings_enabled,
            extended_capabilities: selectors.extended_capabilities,
        }
    }

    /// Vendor ID as descriptor bytes (little endian)
    pub const fn vendor_id_bytes(&self) -> [u8; 2] {
        self.vendor_id.to_le_bytes()
    }

    /// Product ID as descriptor bytes (little endian)
    pub const fn product_id_bytes(&self) -> [u8; 2] {
        self.product_id.to_le_bytes()
    }

    /// Extra commands advertised in the version string
    pub fn advertised_commands(&self) -> &'static [u8] {
        if self.extended_capabilities {
            &EXTENDED_COMMANDS
        } else {
            &[]
        }
    }
}
