//! Rainbow — colour, brightness and mode control for Turris router LEDs.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod led;
pub mod parser;
pub mod protocol;
pub mod token;

pub use error::RainbowError;
