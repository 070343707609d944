//! Unified error type for the rainbow-lib crate.
//!
//! [`RainbowError`] wraps the backend error type and the usage/config error
//! kinds. Each variant maps onto one process exit code, see
//! [`RainbowError::exit_code`].

use std::fmt;

use crate::backend::BackendError;
use crate::config::ValidationError;

/// Malformed or out-of-grammar command line words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(pub String);

impl UsageError {
    pub fn new(msg: impl Into<String>) -> Self {
        UsageError(msg.into())
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

/// Unified error type for rainbow-lib operations.
#[derive(Debug)]
pub enum RainbowError {
    /// Bad arguments. Nothing after the offending word was applied.
    Usage(UsageError),
    /// The hardware handle could not be acquired.
    Setup(BackendError),
    /// A write or read on an already opened backend failed.
    Backend(BackendError),
    /// Configuration file is present but unusable.
    Config(Vec<ValidationError>),
    /// Standard I/O error (writing getter output).
    Io(std::io::Error),
}

impl RainbowError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RainbowError::Usage(_) => 1,
            RainbowError::Setup(_) | RainbowError::Config(_) => 2,
            RainbowError::Backend(_) | RainbowError::Io(_) => 3,
        }
    }

    /// Usage errors get a pointer to `--help` appended when reported.
    pub fn is_usage(&self) -> bool {
        matches!(self, RainbowError::Usage(_))
    }
}

impl fmt::Display for RainbowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RainbowError::Usage(e) => write!(f, "{e}"),
            RainbowError::Setup(e) => write!(f, "Setup failed: {e}"),
            RainbowError::Backend(e) => write!(f, "{e}"),
            RainbowError::Config(errors) => {
                let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "Config error: {}", msgs.join("; "))
            }
            RainbowError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for RainbowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RainbowError::Usage(e) => Some(e),
            RainbowError::Setup(e) | RainbowError::Backend(e) => Some(e),
            RainbowError::Io(e) => Some(e),
            RainbowError::Config(_) => None,
        }
    }
}

impl From<UsageError> for RainbowError {
    fn from(e: UsageError) -> Self {
        RainbowError::Usage(e)
    }
}

impl From<BackendError> for RainbowError {
    fn from(e: BackendError) -> Self {
        RainbowError::Backend(e)
    }
}

impl From<std::io::Error> for RainbowError {
    fn from(e: std::io::Error) -> Self {
        RainbowError::Io(e)
    }
}

/// Crate-level Result alias using [`RainbowError`].
pub type Result<T> = std::result::Result<T, RainbowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_taxonomy() {
        assert_eq!(RainbowError::Usage(UsageError::new("x")).exit_code(), 1);
        assert_eq!(RainbowError::Setup(BackendError::NotFound("x".into())).exit_code(), 2);
        assert_eq!(RainbowError::Config(vec![]).exit_code(), 2);
        assert_eq!(
            RainbowError::Backend(BackendError::WriteFailed("x".into())).exit_code(),
            3
        );
    }

    #[test]
    fn from_backend_error_is_backend_not_setup() {
        let e: RainbowError = BackendError::WriteFailed("color: EIO".into()).into();
        assert!(matches!(e, RainbowError::Backend(_)));
        assert_eq!(e.exit_code(), 3);
    }

    #[test]
    fn from_usage_error() {
        let e: RainbowError = UsageError::new("Specify binary mask").into();
        assert!(e.is_usage());
        assert_eq!(e.to_string(), "Specify binary mask");
    }

    #[test]
    fn display_setup_error() {
        let e = RainbowError::Setup(BackendError::OpenFailed("/dev/i2c-1: denied".into()));
        assert_eq!(
            e.to_string(),
            "Setup failed: Failed to open backend: /dev/i2c-1: denied"
        );
    }

    #[test]
    fn display_config_error_joins_all_problems() {
        let e = RainbowError::Config(vec![
            ValidationError::EmptyPath("sysfs_root"),
            ValidationError::InvalidI2cAddress(0x80),
        ]);
        let text = e.to_string();
        assert!(text.starts_with("Config error: "));
        assert!(text.contains("sysfs_root"));
        assert!(text.contains("0x80"));
    }

    #[test]
    fn source_chains_backend_error() {
        let e = RainbowError::Backend(BackendError::ReadFailed("global_brightness: EIO".into()));
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("EIO"));
    }

    #[test]
    fn source_none_for_config() {
        let e = RainbowError::Config(vec![]);
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn question_mark_propagation_backend() {
        fn inner() -> crate::backend::Result<()> {
            Err(BackendError::WriteFailed("nope".into()))
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        assert!(matches!(outer().unwrap_err(), RainbowError::Backend(_)));
    }
}
