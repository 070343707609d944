//! sysfs backend — Omnia with the `leds-turris-omnia` kernel driver.
//!
//! Each LED is a class device `<root>/leds/omnia-led:<name>` with `color`
//! (`"R G B"`), `autonomous` (0/1) and `brightness` (0..255) attributes.

use std::path::{Path, PathBuf};

use super::{BackendError, LedBackend, Result};
use crate::led::{Address, Color, Status};
use crate::protocol;

pub struct SysfsBackend {
    root: PathBuf,
}

impl SysfsBackend {
    /// Bind to the controller directory. Fails if it does not exist.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(BackendError::NotFound(format!(
                "{}: no such directory",
                root.display()
            )));
        }
        Ok(SysfsBackend {
            root: root.to_path_buf(),
        })
    }

    fn led_dir(&self, addr: Address) -> PathBuf {
        let name = match addr {
            Address::Led(led) => protocol::sysfs_name(led),
            Address::All => protocol::SYSFS_ALL_NAME,
        };
        self.root
            .join(format!("{}:{name}", protocol::SYSFS_LED_PREFIX))
    }

    fn write(&self, path: &Path, value: &str) -> Result<()> {
        log::debug!("sysfs: {} <- {value}", path.display());
        std::fs::write(path, value)
            .map_err(|e| BackendError::WriteFailed(format!("{}: {e}", path.display())))
    }
}

/// Leading decimal integer of a sysfs attribute, e.g. `"100\n"`.
fn parse_attribute(contents: &str) -> Option<u8> {
    let trimmed = contents.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

impl LedBackend for SysfsBackend {
    fn name(&self) -> &'static str {
        "sysfs"
    }

    fn set_color(&self, addr: Address, color: Color) -> Result<()> {
        let value = format!("{} {} {}", color.r(), color.g(), color.b());
        self.write(&self.led_dir(addr).join("color"), &value)
    }

    fn set_status(&self, addr: Address, status: Status) -> Result<()> {
        let dir = self.led_dir(addr);
        let autonomous = dir.join("autonomous");
        let brightness = dir.join("brightness");
        match status {
            Status::Disable => {
                self.write(&autonomous, "0")?;
                self.write(&brightness, "0")
            }
            Status::Enable => {
                self.write(&autonomous, "0")?;
                self.write(&brightness, protocol::SYSFS_BRIGHTNESS_ON)
            }
            Status::Auto => self.write(&autonomous, "1"),
        }
    }

    fn set_intensity(&self, percent: u8) -> Result<()> {
        let path = self.root.join(protocol::SYSFS_GLOBAL_BRIGHTNESS);
        self.write(&path, &percent.to_string())
    }

    fn get_intensity(&self) -> Result<u8> {
        let path = self.root.join(protocol::SYSFS_GLOBAL_BRIGHTNESS);
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| BackendError::ReadFailed(format!("{}: {e}", path.display())))?;
        parse_attribute(&contents).ok_or_else(|| {
            BackendError::ReadFailed(format!(
                "{}: unexpected contents {:?}",
                path.display(),
                contents.trim()
            ))
        })
    }

    fn supports_broadcast(&self) -> bool {
        true
    }
}
