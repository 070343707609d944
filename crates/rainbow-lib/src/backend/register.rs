//! Register backend — Turris 1.x CPLD window, byte registers at a base offset.
//!
//! Status is kept in two 12-bit masks (override and state) laid out like the
//! binmask: bit 11 is PWR, bit 0 is USR2.

use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{BackendError, LedBackend, Result};
use crate::led::{Address, Color, Led, LedSet, Status, binmask_bit};
use crate::protocol;

pub struct RegisterBackend<T = File> {
    window: RefCell<T>,
    base: u64,
}

impl RegisterBackend<File> {
    /// Open `device` read-write; registers live at `base + reg`.
    pub fn open(device: impl AsRef<Path>, base: u64) -> Result<Self> {
        let device = device.as_ref();
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(device)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    BackendError::NotFound(format!("{}: {e}", device.display()))
                }
                _ => BackendError::OpenFailed(format!("{}: {e}", device.display())),
            })?;
        log::debug!("register: {} at base 0x{base:08x}", device.display());
        Ok(Self::from_window(file, base))
    }
}

impl<T: Read + Write + Seek> RegisterBackend<T> {
    pub fn from_window(window: T, base: u64) -> Self {
        RegisterBackend {
            window: RefCell::new(window),
            base,
        }
    }

    fn write_reg(&self, reg: u64, value: u8) -> Result<()> {
        log::debug!("register: 0x{reg:02x} <- 0x{value:02x}");
        let mut w = self.window.borrow_mut();
        w.seek(SeekFrom::Start(self.base + reg))
            .and_then(|_| w.write_all(&[value]))
            .map_err(|e| BackendError::WriteFailed(format!("register 0x{reg:02x}: {e}")))
    }

    fn read_reg(&self, reg: u64) -> Result<u8> {
        let mut w = self.window.borrow_mut();
        let mut buf = [0u8; 1];
        w.seek(SeekFrom::Start(self.base + reg))
            .and_then(|_| w.read_exact(&mut buf))
            .map_err(|e| BackendError::ReadFailed(format!("register 0x{reg:02x}: {e}")))?;
        Ok(buf[0])
    }

    fn read_mask(&self, hi: u64, lo: u64) -> Result<u16> {
        let hi = self.read_reg(hi)?;
        let lo = self.read_reg(lo)?;
        Ok(u16::from_be_bytes([hi, lo]) & 0x0FFF)
    }

    fn write_mask(&self, hi: u64, lo: u64, mask: u16) -> Result<()> {
        let [h, l] = mask.to_be_bytes();
        self.write_reg(hi, h)?;
        self.write_reg(lo, l)
    }
}

fn leds(addr: Address) -> &'static [Led] {
    match addr {
        Address::Led(led) => LedSet::One(led).leds(),
        Address::All => LedSet::All.leds(),
    }
}

impl<T: Read + Write + Seek> LedBackend for RegisterBackend<T> {
    fn name(&self) -> &'static str {
        "register"
    }

    fn set_color(&self, addr: Address, color: Color) -> Result<()> {
        for &led in leds(addr) {
            self.write_reg(protocol::REG_COLOR_INDEX, protocol::cpld_slot(led))?;
            self.write_reg(protocol::REG_COLOR_R, color.r())?;
            self.write_reg(protocol::REG_COLOR_G, color.g())?;
            self.write_reg(protocol::REG_COLOR_B, color.b())?;
        }
        Ok(())
    }

    fn set_status(&self, addr: Address, status: Status) -> Result<()> {
        let bits = leds(addr)
            .iter()
            .fold(0u16, |acc, &led| acc | binmask_bit(led));

        let mut overridden = self.read_mask(protocol::REG_OVERRIDE_HI, protocol::REG_OVERRIDE_LO)?;
        let mut lit = self.read_mask(protocol::REG_STATE_HI, protocol::REG_STATE_LO)?;
        match status {
            Status::Auto => overridden &= !bits,
            Status::Enable => {
                overridden |= bits;
                lit |= bits;
            }
            Status::Disable => {
                overridden |= bits;
                lit &= !bits;
            }
        }
        self.write_mask(protocol::REG_STATE_HI, protocol::REG_STATE_LO, lit)?;
        self.write_mask(protocol::REG_OVERRIDE_HI, protocol::REG_OVERRIDE_LO, overridden)
    }

    fn set_intensity(&self, percent: u8) -> Result<()> {
        self.write_reg(protocol::REG_INTENSITY, percent)
    }

    fn get_intensity(&self) -> Result<u8> {
        self.read_reg(protocol::REG_INTENSITY)
    }
}
