//! Board selector types
//!
//! These are the raw, human-authored choices for a board. Nothing here is
//! derived; the validator and resolvers turn a [`SelectorSet`] into a
//! [`ResolvedConfig`](crate::ResolvedConfig).

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chip::ChipFamily;

/// Maximum length of a USB descriptor string
pub const MAX_STRING_LEN: usize = 32;

/// Default UART baud rate of the SAM-BA monitor
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Atmel/Microchip USB vendor ID used by the reference boards
pub const DEFAULT_VENDOR_ID: u16 = 0x16D0;

/// Product ID used by the reference boards
pub const DEFAULT_PRODUCT_ID: u16 = 0x0557;

/// GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Port {
    A,
    B,
}

/// Physical pin (port + index within the port)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinId {
    port: Port,
    pin: u8,
}

impl PinId {
    /// Create a pin, or `None` if the index is not 0-31
    pub const fn new(port: Port, pin: u8) -> Option<Self> {
        if pin < 32 {
            Some(Self { port, pin })
        } else {
            None
        }
    }

    /// Port A pin. Panics at compile time when used in const context with
    /// an index above 31.
    pub const fn pa(pin: u8) -> Self {
        assert!(pin < 32, "port pins are numbered 0-31");
        Self { port: Port::A, pin }
    }

    /// Port B pin
    pub const fn pb(pin: u8) -> Self {
        assert!(pin < 32, "port pins are numbered 0-31");
        Self { port: Port::B, pin }
    }

    /// Parse `"PA11"` / `"pb03"` style names
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let bytes = name.as_bytes();
        if bytes.len() < 3 || !bytes[0].eq_ignore_ascii_case(&b'P') {
            return None;
        }
        let port = match bytes[1].to_ascii_uppercase() {
            b'A' => Port::A,
            b'B' => Port::B,
            _ => return None,
        };
        let pin: u8 = name.get(2..)?.parse().ok()?;
        Self::new(port, pin)
    }

    pub const fn port(&self) -> Port {
        self.port
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// Flat pin number as used by the PORT and PINMUX encodings
    /// (`PIN_PA11` = 11, `PIN_PB03` = 35)
    pub const fn number(&self) -> u8 {
        match self.port {
            Port::A => self.pin,
            Port::B => 32 + self.pin,
        }
    }
}

/// Peripheral multiplexer function of a SERCOM pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinMux {
    /// Function C (SERCOM)
    C,
    /// Function D (SERCOM-ALT)
    D,
}

impl PinMux {
    /// PMUX field value
    pub const fn value(self) -> u8 {
        match self {
            PinMux::C => 2,
            PinMux::D => 3,
        }
    }
}

/// Communication interface(s) the bootloader listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CommunicationInterface {
    /// USB CDC only
    UsbOnly,
    /// SERCOM UART only
    UartOnly,
    /// USB CDC and UART
    Both,
}

impl CommunicationInterface {
    pub const fn uses_usb(self) -> bool {
        matches!(
            self,
            CommunicationInterface::UsbOnly | CommunicationInterface::Both
        )
    }

    pub const fn uses_uart(self) -> bool {
        matches!(
            self,
            CommunicationInterface::UartOnly | CommunicationInterface::Both
        )
    }
}

/// Master clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockSource {
    /// DFLL48M in open-loop mode (OSC48M on parts without a DFLL)
    InternalRc,
    /// DFLL48M open-loop, recalibrated against USB start-of-frame
    InternalUsbSynced,
    /// 32.768 kHz crystal driving the DPLL
    Crystal32k,
    /// High-speed crystal (XOSC) driving the DPLL
    CrystalHs,
}

impl ClockSource {
    /// Whether this source goes through the DPLL
    pub const fn uses_pll(self) -> bool {
        matches!(self, ClockSource::Crystal32k | ClockSource::CrystalHs)
    }
}

/// Clock selectors
///
/// `crystal_hz`, `fast_startup` and `fractional` only mean something for
/// the crystal sources; the validator rejects or ignores them elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockSelectors {
    pub source: ClockSource,
    /// Declared XOSC frequency in Hz (CrystalHs only)
    pub crystal_hz: Option<i64>,
    /// Pre-divide the crystal into the 1-2 MHz band for faster PLL lock
    pub fast_startup: bool,
    /// Allow a fractional PLL multiplier (better accuracy, more jitter)
    pub fractional: bool,
}

impl ClockSelectors {
    pub const fn new(source: ClockSource) -> Self {
        Self {
            source,
            crystal_hz: None,
            fast_startup: false,
            fractional: false,
        }
    }

    /// High-speed crystal of the given frequency
    pub const fn crystal_hs(hz: i64) -> Self {
        Self {
            source: ClockSource::CrystalHs,
            crystal_hz: Some(hz),
            fast_startup: false,
            fractional: false,
        }
    }

    pub const fn with_fast_startup(mut self, fast_startup: bool) -> Self {
        self.fast_startup = fast_startup;
        self
    }

    pub const fn with_fractional(mut self, fractional: bool) -> Self {
        self.fractional = fractional;
        self
    }
}

/// Pad selector for one of the four SERCOM pads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PadSelector {
    #[default]
    Unused,
    Rx {
        pin: PinId,
        mux: PinMux,
    },
    Tx {
        pin: PinId,
        mux: PinMux,
    },
}

impl PadSelector {
    /// Pin claimed by an active pad
    pub const fn pin(&self) -> Option<PinId> {
        match self {
            PadSelector::Unused => None,
            PadSelector::Rx { pin, .. } | PadSelector::Tx { pin, .. } => Some(*pin),
        }
    }
}

/// SERCOM pad index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SercomPad {
    Pad0,
    Pad1,
    Pad2,
    Pad3,
}

impl SercomPad {
    pub const ALL: [SercomPad; 4] = [
        SercomPad::Pad0,
        SercomPad::Pad1,
        SercomPad::Pad2,
        SercomPad::Pad3,
    ];

    /// Pad for a raw index, `None` above 3
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(SercomPad::Pad0),
            1 => Some(SercomPad::Pad1),
            2 => Some(SercomPad::Pad2),
            3 => Some(SercomPad::Pad3),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// UART selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartSelectors {
    /// SERCOM instance number
    pub instance: u8,
    /// Pad 0-3 assignments
    pub pads: [PadSelector; 4],
    /// Baud rate
    pub baud_rate: u32,
}

impl UartSelectors {
    /// UART on `instance` with every pad unused
    pub const fn new(instance: u8) -> Self {
        Self {
            instance,
            pads: [PadSelector::Unused; 4],
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    pub fn with_pad(mut self, pad: SercomPad, selector: PadSelector) -> Self {
        self.pads[pad.index()] = selector;
        self
    }

    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

/// Boot trigger selectors
///
/// Both mechanisms can be switched on independently; the validator decides
/// what happens when they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootTriggerSelectors {
    /// Stay in the bootloader after two quick resets
    pub double_tap: bool,
    /// Stay in the bootloader while this pin is held low
    pub load_pin: Option<PinId>,
}

impl BootTriggerSelectors {
    /// Whether more than one mechanism is enabled
    pub const fn is_conflicting(&self) -> bool {
        self.double_tap && self.load_pin.is_some()
    }
}

/// LED drive polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LedPolarity {
    #[default]
    HighOn,
    LowOn,
}

/// LED behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LedMode {
    #[default]
    Disabled,
    /// On while the bootloader runs
    Solid { pin: PinId, polarity: LedPolarity },
    /// PWM heartbeat
    Fade { pin: PinId, polarity: LedPolarity },
}

impl LedMode {
    pub const fn pin(&self) -> Option<PinId> {
        match self {
            LedMode::Disabled => None,
            LedMode::Solid { pin, .. } | LedMode::Fade { pin, .. } => Some(*pin),
        }
    }
}

/// Logical LED role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LedRole {
    Main,
    Rx,
    Tx,
}

/// LED policy for all roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedPolicy {
    pub main: LedMode,
    pub rx: LedMode,
    pub tx: LedMode,
}

impl LedPolicy {
    /// Mode for a role
    pub const fn get(&self, role: LedRole) -> LedMode {
        match role {
            LedRole::Main => self.main,
            LedRole::Rx => self.rx,
            LedRole::Tx => self.tx,
        }
    }

    /// Roles paired with their modes
    pub fn roles(&self) -> [(LedRole, LedMode); 3] {
        [
            (LedRole::Main, self.main),
            (LedRole::Rx, self.rx),
            (LedRole::Tx, self.tx),
        ]
    }
}

/// USB identity selectors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentitySelectors {
    pub vendor_id: u16,
    pub product_id: u16,
    pub manufacturer: String<MAX_STRING_LEN>,
    pub product: String<MAX_STRING_LEN>,
    /// Send manufacturer/product strings to the host
    pub strings_enabled: bool,
    /// Advertise the accelerated programming commands
    pub extended_capabilities: bool,
}

impl Default for IdentitySelectors {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
            manufacturer: String::new(),
            product: String::new(),
            strings_enabled: false,
            extended_capabilities: false,
        }
    }
}

/// Flash budget of the bootloader image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageBudget {
    /// 4 KB image: one interface, no extras
    Kb4,
    #[default]
    Kb8,
}

/// Complete set of board selectors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectorSet {
    pub chip: ChipFamily,
    pub interface: CommunicationInterface,
    pub clock: ClockSelectors,
    /// UART pads; required when the interface includes UART
    pub uart: Option<UartSelectors>,
    pub boot: BootTriggerSelectors,
    pub leds: LedPolicy,
    pub identity: IdentitySelectors,
    pub image: ImageBudget,
}

impl SelectorSet {
    /// Selectors with the chip family's defaults: its preferred interface
    /// and internal clock, double-tap boot, LEDs off, strings off.
    pub fn for_chip(chip: ChipFamily) -> Self {
        Self {
            chip,
            interface: chip.default_interface(),
            clock: ClockSelectors::new(chip.default_clock_source()),
            uart: None,
            boot: BootTriggerSelectors {
                double_tap: true,
                load_pin: None,
            },
            leds: LedPolicy::default(),
            identity: IdentitySelectors::default(),
            image: ImageBudget::default(),
        }
    }
}
