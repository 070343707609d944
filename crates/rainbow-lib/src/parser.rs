//! Keyword and value parsers for single command-line words.
//!
//! Every parser is total: a word that does not belong to the category yields
//! `None`, never an error. The tokenizer tries them in a fixed order
//! (command, status, colour, number).

use crate::led::{Color, Led, Status};

/// A recognised keyword: a device, a group alias or a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Led(Led),
    /// `all`
    All,
    /// `lan`
    Lan,
    /// `intensity N` (also the only `get` target)
    Intensity,
    /// `binmask N`
    Binmask,
    /// `get WHAT`
    Get,
}

/// Keyword table. Matching is exact and case-sensitive.
pub const COMMAND_KEYWORDS: [(&str, Command); 17] = [
    ("pwr", Command::Led(Led::Pwr)),
    ("lan0", Command::Led(Led::Lan0)),
    ("lan1", Command::Led(Led::Lan1)),
    ("lan2", Command::Led(Led::Lan2)),
    ("lan3", Command::Led(Led::Lan3)),
    ("lan4", Command::Led(Led::Lan4)),
    ("wan", Command::Led(Led::Wan)),
    ("pci1", Command::Led(Led::Pci1)),
    ("pci2", Command::Led(Led::Pci2)),
    ("pci3", Command::Led(Led::Pci3)),
    ("usr1", Command::Led(Led::Usr1)),
    ("usr2", Command::Led(Led::Usr2)),
    ("all", Command::All),
    ("lan", Command::Lan),
    ("intensity", Command::Intensity),
    ("binmask", Command::Binmask),
    ("get", Command::Get),
];

/// Status keywords.
pub const STATUS_KEYWORDS: [(&str, Status); 3] = [
    ("enable", Status::Enable),
    ("disable", Status::Disable),
    ("auto", Status::Auto),
];

pub fn parse_command(word: &str) -> Option<Command> {
    COMMAND_KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == word)
        .map(|&(_, cmd)| cmd)
}

pub fn parse_status(word: &str) -> Option<Status> {
    STATUS_KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == word)
        .map(|&(_, st)| st)
}

/// Parse a colour name or a 6-character hex literal (`RRGGBB`).
///
/// The hex branch accepts any 6-character word whose hex prefix is non-empty,
/// so `"FF00ZZ"` yields `0x00FF00` (digits `FF00`, rest ignored) and
/// `"0x0FFF"` yields `0x000FFF`. Only words with no leading hex digit at all
/// are rejected. Existing scripts depend on this, keep it.
pub fn parse_color(word: &str) -> Option<Color> {
    if let Some(color) = Color::from_name(word) {
        return Some(color);
    }
    if word.len() != 6 {
        return None;
    }
    scan_integer(word, 16).map(|v| Color::from_rgb(v as u32))
}

/// Parse an unsigned number with automatic base detection:
/// `0x` prefix is hex, a leading `0` is octal, anything else decimal.
///
/// Trailing garbage after the digits is ignored. A leading `-` wraps
/// modulo 2^32, so `"-1"` is `u32::MAX`.
pub fn parse_number(word: &str) -> Option<u32> {
    scan_integer(word, 0).map(|v| v as u32)
}

fn is_c_space(b: u8) -> bool {
    b == b' ' || (b'\t'..=b'\r').contains(&b)
}

fn has_hex_prefix(s: &[u8]) -> bool {
    s.len() > 2 && s[0] == b'0' && (s[1] | 0x20) == b'x' && s[2].is_ascii_hexdigit()
}

/// Longest-prefix integer scan with C `strtol` conventions.
///
/// `radix` is 16 or 0 (auto-detect). Returns `None` when no digit was
/// consumed. Overflow saturates to the `i64` range.
fn scan_integer(s: &str, radix: u32) -> Option<i64> {
    let mut bytes = s.as_bytes();
    let start = bytes
        .iter()
        .position(|&b| !is_c_space(b))
        .unwrap_or(bytes.len());
    bytes = &bytes[start..];

    let mut negative = false;
    if let [sign @ (b'+' | b'-'), rest @ ..] = bytes {
        negative = *sign == b'-';
        bytes = rest;
    }

    let base = match radix {
        16 => {
            if has_hex_prefix(bytes) {
                bytes = &bytes[2..];
            }
            16
        }
        _ => {
            if has_hex_prefix(bytes) {
                bytes = &bytes[2..];
                16
            } else if bytes.first() == Some(&b'0') {
                8
            } else {
                10
            }
        }
    };

    let mut value: u64 = 0;
    let mut digits = 0usize;
    for &b in bytes {
        let Some(d) = (b as char).to_digit(base) else {
            break;
        };
        value = value.saturating_mul(u64::from(base)).saturating_add(u64::from(d));
        digits += 1;
    }
    if digits == 0 {
        return None;
    }

    let value = if negative {
        if value > i64::MAX as u64 {
            i64::MIN
        } else {
            -(value as i64)
        }
    } else {
        value.min(i64::MAX as u64) as i64
    };
    Some(value)
}
