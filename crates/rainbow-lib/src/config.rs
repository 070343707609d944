//! Configuration — TOML file selecting the backend and its device paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::protocol;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Which backend drives the LEDs. Default: "sysfs".
    #[serde(default)]
    pub backend: BackendKind,

    /// LED controller directory for the sysfs backend.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,

    /// I2C bus number for the i2c backend (`/dev/i2c-N`).
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: u8,

    /// 7-bit MCU address for the i2c backend.
    #[serde(default = "default_i2c_address")]
    pub i2c_address: u16,

    /// Device node exposing the CPLD window for the register backend.
    #[serde(default = "default_register_device")]
    pub register_device: PathBuf,

    /// Offset of the CPLD window inside `register_device`.
    #[serde(default = "default_register_base")]
    pub register_base: u64,
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from(protocol::SYSFS_ROOT)
}
fn default_i2c_bus() -> u8 {
    protocol::MCU_I2C_BUS
}
fn default_i2c_address() -> u16 {
    protocol::MCU_I2C_ADDRESS
}
fn default_register_device() -> PathBuf {
    PathBuf::from(protocol::CPLD_DEVICE)
}
fn default_register_base() -> u64 {
    protocol::CPLD_BASE
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: BackendKind::default(),
            sysfs_root: default_sysfs_root(),
            i2c_bus: default_i2c_bus(),
            i2c_address: default_i2c_address(),
            register_device: default_register_device(),
            register_base: default_register_base(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A path field is empty.
    EmptyPath(&'static str),
    /// `i2c_address` does not fit in 7 bits.
    InvalidI2cAddress(u16),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPath(field) => write!(f, "{field} cannot be empty"),
            ValidationError::InvalidI2cAddress(addr) => {
                write!(f, "Invalid i2c_address 0x{addr:02x} (must be 0x00-0x7f)")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rainbow"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default path, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::debug!("config loaded from {}", path.display());
                    (config, vec![])
                }
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.sysfs_root.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath("sysfs_root"));
        }
        if self.register_device.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath("register_device"));
        }
        if self.i2c_address > 0x7F {
            errors.push(ValidationError::InvalidI2cAddress(self.i2c_address));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ──

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.backend, BackendKind::Sysfs);
        assert_eq!(c.sysfs_root, PathBuf::from(protocol::SYSFS_ROOT));
        assert_eq!(c.i2c_bus, 1);
        assert_eq!(c.i2c_address, 0x2a);
        assert_eq!(c.register_device, PathBuf::from("/dev/mem"));
        assert_eq!(c.register_base, 0xFFA0_0000);
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    // ── TOML ──

    #[test]
    fn serialize_roundtrip() {
        let c = Config {
            backend: BackendKind::I2c,
            i2c_bus: 0,
            i2c_address: 0x2b,
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&c).unwrap();
        let c2: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: Config = toml::from_str("backend = \"register\"\nregister_base = 0x1000").unwrap();
        assert_eq!(c.backend, BackendKind::Register);
        assert_eq!(c.register_base, 0x1000);
        // Missing fields get defaults
        assert_eq!(c.register_device, PathBuf::from("/dev/mem"));
        assert_eq!(c.i2c_address, 0x2a);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let c: Config = toml::from_str("").unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn unknown_backend_is_parse_error() {
        let result: std::result::Result<Config, _> = toml::from_str("backend = \"spi\"");
        assert!(result.is_err());
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let result: std::result::Result<Config, _> = toml::from_str("i2c_bus = \"one\"");
        assert!(result.is_err());
    }

    // ── load_from ──

    #[test]
    fn load_from_missing_file_gives_defaults_silently() {
        let dir = tempfile::tempdir().unwrap();
        let (c, warnings) = Config::load_from(&dir.path().join("nope.toml"));
        assert_eq!(c, Config::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn load_from_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"dry-run\"\nsysfs_root = \"/tmp/leds\"\n").unwrap();
        let (c, warnings) = Config::load_from(&path);
        assert!(warnings.is_empty());
        assert_eq!(c.backend, BackendKind::DryRun);
        assert_eq!(c.sysfs_root, PathBuf::from("/tmp/leds"));
    }

    #[test]
    fn load_from_malformed_file_warns_and_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is { not valid toml").unwrap();
        let (c, warnings) = Config::load_from(&path);
        assert_eq!(c, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("config parse error"));
    }

    // ── Paths ──

    #[test]
    fn config_path_ends_with_toml() {
        if let Some(path) = Config::path() {
            assert_eq!(path.file_name().unwrap(), "config.toml");
            assert_eq!(path.parent().unwrap().file_name().unwrap(), "rainbow");
        }
    }

    // ── validate ──

    #[test]
    fn validate_collects_all_errors() {
        let c = Config {
            sysfs_root: PathBuf::new(),
            register_device: PathBuf::new(),
            i2c_address: 0x80,
            ..Config::default()
        };
        let errors = c.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyPath("sysfs_root"),
                ValidationError::EmptyPath("register_device"),
                ValidationError::InvalidI2cAddress(0x80),
            ]
        );
    }

    #[test]
    fn validation_error_display() {
        assert_eq!(
            ValidationError::EmptyPath("sysfs_root").to_string(),
            "sysfs_root cannot be empty"
        );
        assert_eq!(
            ValidationError::InvalidI2cAddress(0x80).to_string(),
            "Invalid i2c_address 0x80 (must be 0x00-0x7f)"
        );
    }
}
