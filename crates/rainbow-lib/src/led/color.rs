//! 24-bit RGB colour and the named-colour table.

use std::fmt;

/// RGB colour, `0xRRGGBB`. The top byte is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(u32);

/// Colour names accepted on the command line.
pub const NAMED_COLORS: [(&str, Color); 5] = [
    ("red", Color(0xFF0000)),
    ("green", Color(0x00FF00)),
    ("blue", Color(0x0000FF)),
    ("white", Color(0xFFFFFF)),
    ("black", Color(0x000000)),
];

impl Color {
    pub const fn from_rgb(rgb: u32) -> Self {
        Color(rgb & 0x00FF_FFFF)
    }

    /// Exact, case-sensitive lookup in [`NAMED_COLORS`].
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, c)| c)
    }

    pub const fn rgb(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r(), self.g(), self.b())
    }
}
