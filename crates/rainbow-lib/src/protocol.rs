//! Hardware constants for the supported Turris boards.
//!
//! ## Board revisions
//!
//! - **Omnia, kernel driver** — `leds-turris-omnia` exposes one sysfs LED
//!   directory per front-panel LED plus a global brightness attribute.
//! - **Omnia, raw MCU** — the board microcontroller on I2C bus 1, address
//!   0x2a, takes single-byte commands followed by a short payload.
//! - **Turris 1.x** — the CPLD register window, reached through `/dev/mem`.
//!
//! Every table below is indexed by [`Led::ordinal`](crate::led::Led::ordinal).

use crate::led::Led;

// ── sysfs (leds-turris-omnia) ──

/// Default sysfs directory of the MCU LED controller.
pub const SYSFS_ROOT: &str =
    "/sys/devices/platform/soc/soc:internal-regs/f1011000.i2c/i2c-0/i2c-1/1-002b";

/// LED class device prefix under [`SYSFS_ROOT`].
pub const SYSFS_LED_PREFIX: &str = "leds/omnia-led";

/// Global brightness attribute, percent.
pub const SYSFS_GLOBAL_BRIGHTNESS: &str = "global_brightness";

/// LED directory suffixes, ordinal order.
pub const SYSFS_LED_NAMES: [&str; 12] = [
    "power", "lan0", "lan1", "lan2", "lan3", "lan4", "wan", "pci1", "pci2", "pci3", "user1",
    "user2",
];

/// Directory suffix that addresses every LED at once.
pub const SYSFS_ALL_NAME: &str = "all";

/// `brightness` value written for ENABLE.
pub const SYSFS_BRIGHTNESS_ON: &str = "255";

// ── Omnia MCU (I2C) ──

/// Default I2C bus number (`/dev/i2c-1`).
pub const MCU_I2C_BUS: u8 = 1;

/// MCU 7-bit slave address.
pub const MCU_I2C_ADDRESS: u16 = 0x2a;

/// `[idx | mode << 4]` — mode 0 = hardware driven, 1 = user controlled.
pub const MCU_CMD_LED_MODE: u8 = 0x03;

/// `[idx | state << 4]` — state 1 = lit (user mode only).
pub const MCU_CMD_LED_STATE: u8 = 0x04;

/// `[idx, r, g, b]`
pub const MCU_CMD_LED_COLOR: u8 = 0x05;

/// `[percent]`
pub const MCU_CMD_SET_BRIGHTNESS: u8 = 0x07;

/// Response: `[percent]`
pub const MCU_CMD_GET_BRIGHTNESS: u8 = 0x08;

pub const MCU_LED_MODE_AUTO: u8 = 0;
pub const MCU_LED_MODE_USER: u8 = 1;

/// MCU LED index, ordinal order. The MCU numbers LEDs right to left.
pub const MCU_LED_INDEX: [u8; 12] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0];

/// MCU index that addresses every LED at once.
pub const MCU_LED_ALL: u8 = 12;

// ── Turris 1.x CPLD ──

/// Physical address of the CPLD register window.
pub const CPLD_BASE: u64 = 0xFFA0_0000;

/// Size of the register window in bytes.
pub const CPLD_WINDOW: u64 = 0x40;

/// State mask, high byte then low byte. Bit set = lit.
pub const REG_STATE_HI: u64 = 0x20;
pub const REG_STATE_LO: u64 = 0x21;

/// Override mask, high byte then low byte. Bit set = software controlled.
pub const REG_OVERRIDE_HI: u64 = 0x22;
pub const REG_OVERRIDE_LO: u64 = 0x23;

/// Colour decoder: write the LED slot, then the three component registers.
pub const REG_COLOR_INDEX: u64 = 0x13;
pub const REG_COLOR_R: u64 = 0x14;
pub const REG_COLOR_G: u64 = 0x15;
pub const REG_COLOR_B: u64 = 0x16;

/// Global brightness, percent.
pub const REG_INTENSITY: u64 = 0x24;

/// Colour decoder slot, ordinal order.
pub const CPLD_COLOR_SLOT: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Default device node exposing the CPLD window.
pub const CPLD_DEVICE: &str = "/dev/mem";

/// Hardware index of `led` on the MCU.
pub fn mcu_index(led: Led) -> u8 {
    MCU_LED_INDEX[led.ordinal()]
}

/// CPLD colour decoder slot of `led`.
pub fn cpld_slot(led: Led) -> u8 {
    CPLD_COLOR_SLOT[led.ordinal()]
}

/// sysfs directory suffix of `led`.
pub fn sysfs_name(led: Led) -> &'static str {
    SYSFS_LED_NAMES[led.ordinal()]
}
