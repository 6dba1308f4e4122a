//! `board.toml` schema
//!
//! ```toml
//! [board]
//! name = "Generic SAMx21E"
//! chip = "samd21"            # samd21 | samd11 | saml21 | samc21
//! interface = "usb"          # usb | uart | both (default: chip's preferred)
//! image = "8k"               # 4k | 8k
//! extended_capabilities = true
//!
//! [clock]
//! source = "crystal-hs"      # internal | internal-usb | crystal-32k | crystal-hs
//! crystal_hz = 16000000
//! fast_startup = false
//! fractional = false
//!
//! [uart]
//! sercom = 0
//! baud = 115200
//! pad = [
//!     { index = 2, role = "tx", pin = "PA10", mux = "C" },
//!     { index = 3, role = "rx", pin = "PA11", mux = "C" },
//! ]
//!
//! [boot]
//! double_tap = true
//! load_pin = "PA27"
//!
//! [led.main]
//! pin = "PA17"
//! polarity = "high-on"
//! fade = true
//!
//! [usb]
//! vid = 0x16D0
//! pid = 0x0557
//! strings = true
//! manufacturer = "MattairTech LLC"
//! product = "Generic SAMx21E"
//!
//! [policy]
//! inexact_multiplier = "warn" # reject | warn | auto-fractional
//! trigger_conflict = "reject" # reject | prefer-double-tap | prefer-pin-level
//! deny_warnings = false
//! ```

use serde::Deserialize;

/// Top-level board file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardFile {
    pub board: BoardSection,
    #[serde(default)]
    pub clock: ClockSection,
    pub uart: Option<UartSection>,
    #[serde(default)]
    pub boot: BootSection,
    #[serde(default)]
    pub led: LedSection,
    #[serde(default)]
    pub usb: UsbSection,
    #[serde(default)]
    pub policy: PolicySection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardSection {
    pub name: String,
    pub chip: ChipName,
    pub interface: Option<InterfaceName>,
    #[serde(default)]
    pub image: ImageName,
    #[serde(default)]
    pub extended_capabilities: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipName {
    Samd21,
    Samd11,
    Saml21,
    Samc21,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceName {
    Usb,
    Uart,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ImageName {
    #[serde(rename = "4k")]
    Kb4,
    #[default]
    #[serde(rename = "8k")]
    Kb8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockSection {
    pub source: Option<ClockSourceName>,
    pub crystal_hz: Option<i64>,
    #[serde(default)]
    pub fast_startup: bool,
    #[serde(default)]
    pub fractional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ClockSourceName {
    #[serde(rename = "internal")]
    Internal,
    #[serde(rename = "internal-usb")]
    InternalUsb,
    #[serde(rename = "crystal-32k")]
    Crystal32k,
    #[serde(rename = "crystal-hs")]
    CrystalHs,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UartSection {
    pub sercom: u8,
    pub baud: Option<u32>,
    #[serde(default)]
    pub pad: Vec<PadEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PadEntry {
    pub index: u8,
    pub role: PadRoleName,
    pub pin: Option<String>,
    #[serde(default)]
    pub mux: MuxName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadRoleName {
    Unused,
    Rx,
    Tx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MuxName {
    #[default]
    C,
    D,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootSection {
    pub double_tap: Option<bool>,
    pub load_pin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedSection {
    pub main: Option<LedEntry>,
    pub rx: Option<LedEntry>,
    pub tx: Option<LedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedEntry {
    pub pin: String,
    #[serde(default)]
    pub polarity: PolarityName,
    #[serde(default)]
    pub fade: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolarityName {
    #[default]
    HighOn,
    LowOn,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsbSection {
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    #[serde(default)]
    pub strings: bool,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    #[serde(default)]
    pub inexact_multiplier: InexactName,
    #[serde(default)]
    pub trigger_conflict: TriggerConflictName,
    #[serde(default)]
    pub deny_warnings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InexactName {
    Reject,
    #[default]
    Warn,
    AutoFractional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerConflictName {
    #[default]
    Reject,
    PreferDoubleTap,
    PreferPinLevel,
}
