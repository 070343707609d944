//! Hardware backends — one trait, one implementation per board revision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::led::{Address, Color, Status};

mod dry_run;
mod i2c;
mod register;
mod sysfs;

pub use dry_run::DryRunBackend;
pub use i2c::I2cBackend;
pub use register::RegisterBackend;
pub use sysfs::SysfsBackend;

// ── Error type ──

/// Backend errors.
///
/// String payloads follow the convention **"context: details"**, where the
/// context names the file, bus or register involved.
#[derive(Debug)]
pub enum BackendError {
    /// The device node or sysfs directory does not exist.
    NotFound(String),
    OpenFailed(String),
    WriteFailed(String),
    ReadFailed(String),
    /// The backend is not available on this platform.
    Unsupported(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotFound(e) => write!(f, "LED controller not found: {e}"),
            BackendError::OpenFailed(e) => write!(f, "Failed to open backend: {e}"),
            BackendError::WriteFailed(e) => write!(f, "Write error: {e}"),
            BackendError::ReadFailed(e) => write!(f, "Read error: {e}"),
            BackendError::Unsupported(e) => write!(f, "Unsupported backend: {e}"),
        }
    }
}

impl std::error::Error for BackendError {}

pub type Result<T> = std::result::Result<T, BackendError>;

// ── Trait ──

/// Write/read capability of one board's LED controller.
///
/// Calls are synchronous. A failed call is final: the caller does not retry
/// and does not roll back earlier writes.
pub trait LedBackend {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn set_color(&self, addr: Address, color: Color) -> Result<()>;

    fn set_status(&self, addr: Address, status: Status) -> Result<()>;

    /// Global brightness, percent (0..=100).
    fn set_intensity(&self, percent: u8) -> Result<()>;

    fn get_intensity(&self) -> Result<u8>;

    /// Whether [`Address::All`] is handled in a single call.
    /// Default: no, the dispatcher fans out.
    fn supports_broadcast(&self) -> bool {
        false
    }
}

// ── Selection ──

/// Which backend implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Omnia with the `leds-turris-omnia` kernel driver.
    #[default]
    Sysfs,
    /// Omnia MCU over `/dev/i2c-N`.
    I2c,
    /// Turris 1.x CPLD register window.
    Register,
    /// No hardware: print every call.
    DryRun,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Sysfs,
        BackendKind::I2c,
        BackendKind::Register,
        BackendKind::DryRun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Sysfs => "sysfs",
            BackendKind::I2c => "i2c",
            BackendKind::Register => "register",
            BackendKind::DryRun => "dry-run",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        BackendKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = BackendKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown backend '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Acquire the hardware handle for `kind`, using paths from `config`.
///
/// This is the only place a handle is opened; it is released when the
/// returned box is dropped.
pub fn open_backend(kind: BackendKind, config: &Config) -> Result<Box<dyn LedBackend>> {
    log::debug!("opening {kind} backend");
    let backend: Box<dyn LedBackend> = match kind {
        BackendKind::Sysfs => Box::new(SysfsBackend::open(&config.sysfs_root)?),
        BackendKind::Register => Box::new(RegisterBackend::open(
            &config.register_device,
            config.register_base,
        )?),
        BackendKind::I2c => Box::new(I2cBackend::open(config.i2c_bus, config.i2c_address)?),
        BackendKind::DryRun => Box::new(DryRunBackend::new()),
    };
    Ok(backend)
}

// ── Mock backend for testing ──

/// In-memory mock backend for unit and integration tests.
///
/// Always compiled, hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use crate::led::Led;
    use std::cell::{Cell, RefCell};

    /// One recorded backend call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Call {
        Color(Address, Color),
        Status(Address, Status),
        SetIntensity(u8),
        GetIntensity,
    }

    /// Records calls in order and keeps the resulting per-LED state.
    pub struct MockBackend {
        pub calls: RefCell<Vec<Call>>,
        /// Current colour per LED, ordinal order.
        pub colors: RefCell<[Option<Color>; 12]>,
        /// Current status per LED, ordinal order.
        pub statuses: RefCell<[Option<Status>; 12]>,
        pub intensity: Cell<u8>,
        /// Accept [`Address::All`] instead of requiring fan-out.
        pub broadcast: bool,
        /// Fail every call after this many successful ones.
        pub fail_after: Cell<Option<usize>>,
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            MockBackend {
                calls: RefCell::new(Vec::new()),
                colors: RefCell::new([None; 12]),
                statuses: RefCell::new([None; 12]),
                intensity: Cell::new(100),
                broadcast: false,
                fail_after: Cell::new(None),
            }
        }

        pub fn with_broadcast() -> Self {
            MockBackend {
                broadcast: true,
                ..Self::new()
            }
        }

        pub fn color_of(&self, led: Led) -> Option<Color> {
            self.colors.borrow()[led.ordinal()]
        }

        pub fn status_of(&self, led: Led) -> Option<Status> {
            self.statuses.borrow()[led.ordinal()]
        }

        fn record(&self, call: Call) -> Result<()> {
            if let Some(n) = self.fail_after.get()
                && self.calls.borrow().len() >= n
            {
                return Err(BackendError::WriteFailed(format!(
                    "mock: failure injected at {call:?}"
                )));
            }
            self.calls.borrow_mut().push(call);
            Ok(())
        }

        fn targets(&self, addr: Address) -> Vec<Led> {
            match addr {
                Address::Led(led) => vec![led],
                Address::All => {
                    assert!(self.broadcast, "broadcast sent to non-broadcast backend");
                    Led::ALL.to_vec()
                }
            }
        }
    }

    impl LedBackend for MockBackend {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn set_color(&self, addr: Address, color: Color) -> Result<()> {
            self.record(Call::Color(addr, color))?;
            for led in self.targets(addr) {
                self.colors.borrow_mut()[led.ordinal()] = Some(color);
            }
            Ok(())
        }

        fn set_status(&self, addr: Address, status: Status) -> Result<()> {
            self.record(Call::Status(addr, status))?;
            for led in self.targets(addr) {
                self.statuses.borrow_mut()[led.ordinal()] = Some(status);
            }
            Ok(())
        }

        fn set_intensity(&self, percent: u8) -> Result<()> {
            self.record(Call::SetIntensity(percent))?;
            self.intensity.set(percent);
            Ok(())
        }

        fn get_intensity(&self) -> Result<u8> {
            self.record(Call::GetIntensity)?;
            Ok(self.intensity.get())
        }

        fn supports_broadcast(&self) -> bool {
            self.broadcast
        }
    }
}
