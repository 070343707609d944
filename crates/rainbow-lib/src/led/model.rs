//! Physical LEDs, group selections and the binmask bit table.
//!
//! The ordinal of each [`Led`] is shared by every backend. Backends map it to
//! their own hardware index through explicit tables, never by arithmetic on
//! the enum discriminant.

use std::fmt;

/// One of the 12 front-panel LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    Pwr,
    Lan0,
    Lan1,
    Lan2,
    Lan3,
    Lan4,
    Wan,
    Pci1,
    Pci2,
    Pci3,
    Usr1,
    Usr2,
}

impl Led {
    /// All physical LEDs in ordinal order. Never reorder.
    pub const ALL: [Led; 12] = [
        Led::Pwr,
        Led::Lan0,
        Led::Lan1,
        Led::Lan2,
        Led::Lan3,
        Led::Lan4,
        Led::Wan,
        Led::Pci1,
        Led::Pci2,
        Led::Pci3,
        Led::Usr1,
        Led::Usr2,
    ];

    /// The five LAN port LEDs, ascending.
    pub const LAN: [Led; 5] = [Led::Lan0, Led::Lan1, Led::Lan2, Led::Lan3, Led::Lan4];

    /// Position in [`Led::ALL`].
    pub fn ordinal(self) -> usize {
        Led::ALL
            .iter()
            .position(|&l| l == self)
            .unwrap_or_default()
    }

    /// Keyword used on the command line.
    pub fn keyword(self) -> &'static str {
        match self {
            Led::Pwr => "pwr",
            Led::Lan0 => "lan0",
            Led::Lan1 => "lan1",
            Led::Lan2 => "lan2",
            Led::Lan3 => "lan3",
            Led::Lan4 => "lan4",
            Led::Wan => "wan",
            Led::Pci1 => "pci1",
            Led::Pci2 => "pci2",
            Led::Pci3 => "pci3",
            Led::Usr1 => "usr1",
            Led::Usr2 => "usr2",
        }
    }
}

impl fmt::Display for Led {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

static PANEL: [Led; 12] = Led::ALL;
static LAN_PORTS: [Led; 5] = Led::LAN;

/// Device context selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedSet {
    One(Led),
    /// `lan` alias: LAN0..LAN4.
    Lan,
    /// `all` alias: every physical LED.
    All,
}

impl LedSet {
    /// Fan-out list, ascending ordinal.
    pub fn leds(self) -> &'static [Led] {
        match self {
            LedSet::One(led) => std::slice::from_ref(&PANEL[led.ordinal()]),
            LedSet::Lan => &LAN_PORTS,
            LedSet::All => &PANEL,
        }
    }
}

/// LED address handed to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Led(Led),
    /// Broadcast to every LED in one call. Only issued to backends that
    /// report [`supports_broadcast`](crate::backend::LedBackend::supports_broadcast).
    All,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Led(led) => write!(f, "{led}"),
            Address::All => f.write_str("all"),
        }
    }
}

/// LED operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Static off (manual override, brightness 0).
    Disable,
    /// Static on (manual override, full brightness).
    Enable,
    /// Driven by hardware, e.g. blinking on traffic.
    Auto,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Disable => "disable",
            Status::Enable => "enable",
            Status::Auto => "auto",
        })
    }
}

/// Largest value accepted by `binmask`.
pub const MAX_BINMASK: u32 = 0xFFF;

/// Largest value accepted by `intensity`.
pub const MAX_INTENSITY: u32 = 100;

/// Binmask bit → LED, most significant bit first.
pub const BINMASK_BITS: [(u16, Led); 12] = [
    (0x800, Led::Pwr),
    (0x400, Led::Lan0),
    (0x200, Led::Lan1),
    (0x100, Led::Lan2),
    (0x080, Led::Lan3),
    (0x040, Led::Lan4),
    (0x020, Led::Wan),
    (0x010, Led::Pci1),
    (0x008, Led::Pci2),
    (0x004, Led::Pci3),
    (0x002, Led::Usr1),
    (0x001, Led::Usr2),
];

/// Decode a 12-bit mask into one enable/disable status per LED, high bit first.
pub fn binmask_statuses(mask: u16) -> impl Iterator<Item = (Led, Status)> {
    BINMASK_BITS.into_iter().map(move |(bit, led)| {
        let status = if mask & bit != 0 {
            Status::Enable
        } else {
            Status::Disable
        };
        (led, status)
    })
}

/// Bit assigned to `led` in [`BINMASK_BITS`].
pub fn binmask_bit(led: Led) -> u16 {
    BINMASK_BITS
        .iter()
        .find(|&&(_, l)| l == led)
        .map(|&(bit, _)| bit)
        .unwrap_or_default()
}
