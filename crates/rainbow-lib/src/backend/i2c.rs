//! I2C backend — Omnia MCU driven directly over `/dev/i2c-N`.
//!
//! Every request is one SMBus-style write: command byte then payload.
//! Brightness is read back by writing the command byte and reading one byte.

use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Write};

use super::{BackendError, LedBackend, Result};
use crate::led::{Address, Color, Status};
use crate::protocol::{self, MCU_LED_MODE_AUTO, MCU_LED_MODE_USER};

/// Linux `I2C_SLAVE` ioctl request number (`linux/i2c-dev.h`).
#[cfg(target_os = "linux")]
const I2C_SLAVE: u32 = 0x0703;

pub struct I2cBackend<T = File> {
    bus: RefCell<T>,
    context: String,
}

impl I2cBackend<File> {
    /// Open `/dev/i2c-<bus>` and bind it to `address`.
    #[cfg(target_os = "linux")]
    pub fn open(bus: u8, address: u16) -> Result<Self> {
        use std::os::fd::AsRawFd;

        let path = format!("/dev/i2c-{bus}");
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => BackendError::NotFound(format!("{path}: {e}")),
                _ => BackendError::OpenFailed(format!("{path}: {e}")),
            })?;

        // SAFETY: `file` is an open i2c-dev node for the duration of the call,
        // and I2C_SLAVE takes the address by value.
        let rc = unsafe {
            libc::ioctl(
                file.as_raw_fd(),
                I2C_SLAVE as _,
                libc::c_ulong::from(address),
            )
        };
        if rc < 0 {
            return Err(BackendError::OpenFailed(format!(
                "{path}: I2C_SLAVE 0x{address:02x}: {}",
                std::io::Error::last_os_error()
            )));
        }
        log::debug!("i2c: bound {path} to 0x{address:02x}");

        let mut backend = Self::from_transport(file);
        backend.context = format!("{path}@0x{address:02x}");
        Ok(backend)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn open(_bus: u8, _address: u16) -> Result<Self> {
        Err(BackendError::Unsupported(
            "i2c: only available on Linux".into(),
        ))
    }
}

impl<T: Read + Write> I2cBackend<T> {
    /// Wrap an already bound transport.
    pub fn from_transport(bus: T) -> Self {
        I2cBackend {
            bus: RefCell::new(bus),
            context: "i2c".into(),
        }
    }

    fn send(&self, frame: &[u8]) -> Result<()> {
        log::debug!("i2c: {} <- {frame:02x?}", self.context);
        self.bus
            .borrow_mut()
            .write_all(frame)
            .map_err(|e| BackendError::WriteFailed(format!("{}: {e}", self.context)))
    }

    fn query(&self, cmd: u8) -> Result<u8> {
        let mut bus = self.bus.borrow_mut();
        let mut buf = [0u8; 1];
        bus.write_all(&[cmd])
            .and_then(|()| bus.read_exact(&mut buf))
            .map_err(|e| BackendError::ReadFailed(format!("{}: {e}", self.context)))?;
        log::debug!("i2c: {} cmd 0x{cmd:02x} -> {:#04x}", self.context, buf[0]);
        Ok(buf[0])
    }
}

fn mcu_index(addr: Address) -> u8 {
    match addr {
        Address::Led(led) => protocol::mcu_index(led),
        Address::All => protocol::MCU_LED_ALL,
    }
}

/// Low nibble: LED index, high nibble: value.
fn nibble_frame(cmd: u8, idx: u8, value: u8) -> [u8; 2] {
    [cmd, (idx & 0x0F) | (value << 4)]
}

impl<T: Read + Write> LedBackend for I2cBackend<T> {
    fn name(&self) -> &'static str {
        "i2c"
    }

    fn set_color(&self, addr: Address, color: Color) -> Result<()> {
        self.send(&[
            protocol::MCU_CMD_LED_COLOR,
            mcu_index(addr),
            color.r(),
            color.g(),
            color.b(),
        ])
    }

    fn set_status(&self, addr: Address, status: Status) -> Result<()> {
        let idx = mcu_index(addr);
        match status {
            Status::Auto => self.send(&nibble_frame(
                protocol::MCU_CMD_LED_MODE,
                idx,
                MCU_LED_MODE_AUTO,
            )),
            Status::Enable | Status::Disable => {
                self.send(&nibble_frame(
                    protocol::MCU_CMD_LED_MODE,
                    idx,
                    MCU_LED_MODE_USER,
                ))?;
                let lit = u8::from(status == Status::Enable);
                self.send(&nibble_frame(protocol::MCU_CMD_LED_STATE, idx, lit))
            }
        }
    }

    fn set_intensity(&self, percent: u8) -> Result<()> {
        self.send(&[protocol::MCU_CMD_SET_BRIGHTNESS, percent])
    }

    fn get_intensity(&self) -> Result<u8> {
        self.query(protocol::MCU_CMD_GET_BRIGHTNESS)
    }

    fn supports_broadcast(&self) -> bool {
        true
    }
}
