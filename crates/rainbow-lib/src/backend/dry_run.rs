//! Dry-run backend — prints what would be written instead of touching hardware.

use std::cell::{Cell, RefCell};
use std::io::{Stdout, Write};

use super::{BackendError, LedBackend, Result};
use crate::led::{Address, Color, Status};

pub struct DryRunBackend<W = Stdout> {
    out: RefCell<W>,
    intensity: Cell<u8>,
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunBackend {
    /// Report to stdout.
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write> DryRunBackend<W> {
    pub fn with_writer(out: W) -> Self {
        DryRunBackend {
            out: RefCell::new(out),
            intensity: Cell::new(100),
        }
    }

    fn report(&self, line: std::fmt::Arguments<'_>) -> Result<()> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "{line}")
            .and_then(|()| out.flush())
            .map_err(|e| BackendError::WriteFailed(format!("dry-run output: {e}")))
    }
}

impl<W: Write> LedBackend for DryRunBackend<W> {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn set_color(&self, addr: Address, color: Color) -> Result<()> {
        self.report(format_args!("{addr} color {color}"))
    }

    fn set_status(&self, addr: Address, status: Status) -> Result<()> {
        self.report(format_args!("{addr} status {status}"))
    }

    fn set_intensity(&self, percent: u8) -> Result<()> {
        self.report(format_args!("intensity {percent}"))?;
        self.intensity.set(percent);
        Ok(())
    }

    fn get_intensity(&self) -> Result<u8> {
        Ok(self.intensity.get())
    }

    fn supports_broadcast(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::led::Led;

    /// Writer whose peer has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn text(b: &DryRunBackend<Vec<u8>>) -> String {
        String::from_utf8(b.out.borrow().clone()).unwrap()
    }

    #[test]
    fn intensity_is_remembered() {
        let b = DryRunBackend::with_writer(Vec::new());
        assert_eq!(b.get_intensity().unwrap(), 100);
        b.set_intensity(5).unwrap();
        assert_eq!(b.get_intensity().unwrap(), 5);
        assert_eq!(text(&b), "intensity 5\n");
    }

    #[test]
    fn reports_one_line_per_call() {
        let b = DryRunBackend::with_writer(Vec::new());
        b.set_color(Address::All, Color::from_rgb(0x0000FF)).unwrap();
        b.set_status(Address::Led(Led::Wan), Status::Auto).unwrap();
        assert_eq!(text(&b), "all color #0000FF\nwan status auto\n");
    }

    #[test]
    fn closed_output_is_write_error() {
        let b = DryRunBackend::with_writer(ClosedPipe);
        let err = b.set_status(Address::Led(Led::Pwr), Status::Enable).unwrap_err();
        assert!(matches!(err, BackendError::WriteFailed(_)));
        assert!(err.to_string().starts_with("Write error: dry-run output"));
        assert!(b.set_intensity(7).is_err());
        assert_eq!(b.get_intensity().unwrap(), 100);
    }
}
