//! Command interpreter — drives a backend from a token stream.
//!
//! The only context is the current device, set by a device or group word
//! and kept until the next one. Directives (`get`, `intensity`, `binmask`)
//! consume exactly one following token and leave the current device alone.

use std::io::Write;

use crate::backend::LedBackend;
use crate::error::{Result, UsageError};
use crate::led::{
    Address, Color, LedSet, MAX_BINMASK, MAX_INTENSITY, Status, binmask_statuses,
};
use crate::parser::Command;
use crate::token::{Token, TokenKind, Tokenizer};

/// Interpreter state. Errors are terminal and surface as `Err` from
/// [`Interpreter::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No device selected yet.
    AwaitingToken,
    /// Colour and status words apply to this selection.
    HaveDevice(LedSet),
    /// End of input reached.
    Done,
}

/// One kind of LED write, applied through the fan-out.
#[derive(Debug, Clone, Copy)]
enum Setting {
    Color(Color),
    Status(Status),
}

pub struct Interpreter<'b, B: LedBackend + ?Sized> {
    backend: &'b B,
    state: State,
}

impl<'b, B: LedBackend + ?Sized> Interpreter<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Interpreter {
            backend,
            state: State::AwaitingToken,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Consume `tokens` to the end, writing getter output to `out`.
    ///
    /// Stops at the first error. Writes issued before it are not undone.
    pub fn run(&mut self, tokens: &mut Tokenizer<'_>, out: &mut impl Write) -> Result<()> {
        while self.state != State::Done {
            let token = tokens.next_token();
            self.step(token, tokens, out)?;
        }
        Ok(())
    }

    fn step(
        &mut self,
        token: Token<'_>,
        tokens: &mut Tokenizer<'_>,
        out: &mut impl Write,
    ) -> Result<()> {
        match token.kind {
            TokenKind::Invalid => Err(usage(format!(
                "Undefined sequence: {} is some garbage",
                token.raw
            ))),
            TokenKind::Command(Command::Get) => self.get(tokens.next_token(), out),
            TokenKind::Command(Command::Intensity) => self.intensity(tokens.next_token()),
            TokenKind::Command(Command::Binmask) => self.binmask(tokens.next_token()),
            TokenKind::Command(Command::Led(led)) => {
                self.select(LedSet::One(led));
                Ok(())
            }
            TokenKind::Command(Command::Lan) => {
                self.select(LedSet::Lan);
                Ok(())
            }
            TokenKind::Command(Command::All) => {
                self.select(LedSet::All);
                Ok(())
            }
            TokenKind::Number(_) => Err(usage(format!("Unexpected value: {}", token.raw))),
            TokenKind::Color(color) => self.apply(Setting::Color(color)),
            TokenKind::Status(status) => self.apply(Setting::Status(status)),
            TokenKind::EndOfInput => {
                self.state = State::Done;
                Ok(())
            }
        }
    }

    fn select(&mut self, set: LedSet) {
        log::debug!("device {set:?}");
        self.state = State::HaveDevice(set);
    }

    fn get(&mut self, item: Token<'_>, out: &mut impl Write) -> Result<()> {
        match item.kind {
            TokenKind::Command(Command::Intensity) => {
                let level = self.backend.get_intensity()?;
                writeln!(out, "{level}")?;
                Ok(())
            }
            TokenKind::Command(_) => Err(usage("Unknown getter")),
            _ => Err(usage("Specify item for get command")),
        }
    }

    fn intensity(&mut self, arg: Token<'_>) -> Result<()> {
        let TokenKind::Number(level) = arg.kind else {
            return Err(usage("Specify intensity level"));
        };
        if level > MAX_INTENSITY {
            return Err(usage("Intensity is out of range [0-100]"));
        }
        // level <= 100 fits in a byte
        self.backend.set_intensity(level as u8)?;
        Ok(())
    }

    fn binmask(&mut self, arg: Token<'_>) -> Result<()> {
        let TokenKind::Number(mask) = arg.kind else {
            return Err(usage("Specify binary mask"));
        };
        if mask > MAX_BINMASK {
            return Err(usage("Number is out of range [0-0xFFF]"));
        }
        log::debug!("binmask 0x{mask:03x}");
        for (led, status) in binmask_statuses(mask as u16) {
            self.backend.set_status(Address::Led(led), status)?;
        }
        Ok(())
    }

    /// Apply `setting` to the current device, fanning out groups.
    fn apply(&mut self, setting: Setting) -> Result<()> {
        let State::HaveDevice(set) = self.state else {
            return Err(usage("Trying to configure undefined device"));
        };
        if set == LedSet::All && self.backend.supports_broadcast() {
            return self.write(Address::All, setting);
        }
        for &led in set.leds() {
            self.write(Address::Led(led), setting)?;
        }
        Ok(())
    }

    fn write(&self, addr: Address, setting: Setting) -> Result<()> {
        match setting {
            Setting::Color(color) => self.backend.set_color(addr, color)?,
            Setting::Status(status) => self.backend.set_status(addr, status)?,
        }
        Ok(())
    }
}

fn usage(msg: impl Into<String>) -> crate::error::RainbowError {
    UsageError::new(msg).into()
}

/// Run `words` against `backend` in one go.
pub fn execute<B: LedBackend + ?Sized>(
    backend: &B,
    words: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let mut tokens = Tokenizer::new(words);
    Interpreter::new(backend).run(&mut tokens, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{Call, MockBackend};
    use crate::error::RainbowError;
    use crate::led::Led;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|s| s.to_string()).collect()
    }

    fn run(backend: &MockBackend, ws: &[&str]) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = execute(backend, &words(ws), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn usage_message(result: Result<()>) -> String {
        match result {
            Err(RainbowError::Usage(e)) => e.0,
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    // ── Device context ──

    #[test]
    fn empty_input_is_done_without_calls() {
        let mock = MockBackend::new();
        let mut out = Vec::new();
        let args = words(&[]);
        let mut tokens = Tokenizer::new(&args);
        let mut interp = Interpreter::new(&mock);
        interp.run(&mut tokens, &mut out).unwrap();
        assert_eq!(interp.state(), State::Done);
        assert!(mock.calls.borrow().is_empty());
    }

    #[test]
    fn single_device_gets_direct_calls() {
        let mock = MockBackend::new();
        let (result, _) = run(&mock, &["wan", "red", "enable"]);
        result.unwrap();
        assert_eq!(
            *mock.calls.borrow(),
            vec![
                Call::Color(Address::Led(Led::Wan), Color::from_rgb(0xFF0000)),
                Call::Status(Address::Led(Led::Wan), Status::Enable),
            ]
        );
    }

    #[test]
    fn status_before_color_is_accepted() {
        let mock = MockBackend::new();
        run(&mock, &["pci2", "auto", "00FF00"]).0.unwrap();
        assert_eq!(mock.status_of(Led::Pci2), Some(Status::Auto));
        assert_eq!(mock.color_of(Led::Pci2), Some(Color::from_rgb(0x00FF00)));
    }

    #[test]
    fn lan_fans_out_in_order() {
        let mock = MockBackend::new();
        run(&mock, &["lan", "blue"]).0.unwrap();
        let blue = Color::from_rgb(0x0000FF);
        assert_eq!(
            *mock.calls.borrow(),
            Led::LAN
                .iter()
                .map(|&l| Call::Color(Address::Led(l), blue))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn all_without_broadcast_fans_out_over_twelve() {
        let mock = MockBackend::new();
        run(&mock, &["all", "disable"]).0.unwrap();
        let calls = mock.calls.borrow();
        assert_eq!(calls.len(), 12);
        assert_eq!(calls[0], Call::Status(Address::Led(Led::Pwr), Status::Disable));
        assert_eq!(calls[11], Call::Status(Address::Led(Led::Usr2), Status::Disable));
    }

    #[test]
    fn all_with_broadcast_is_one_call() {
        let mock = MockBackend::with_broadcast();
        run(&mock, &["all", "white"]).0.unwrap();
        assert_eq!(
            *mock.calls.borrow(),
            vec![Call::Color(Address::All, Color::from_rgb(0xFFFFFF))]
        );
    }

    #[test]
    fn directive_keeps_current_device() {
        let mock = MockBackend::new();
        run(&mock, &["usr1", "intensity", "50", "red"]).0.unwrap();
        assert_eq!(mock.intensity.get(), 50);
        assert_eq!(mock.color_of(Led::Usr1), Some(Color::from_rgb(0xFF0000)));
    }

    // ── Directives ──

    #[test]
    fn get_intensity_prints_level() {
        let mock = MockBackend::new();
        mock.intensity.set(42);
        let (result, out) = run(&mock, &["get", "intensity"]);
        result.unwrap();
        assert_eq!(out, "42\n");
    }

    #[test]
    fn get_without_item() {
        let mock = MockBackend::new();
        assert_eq!(
            usage_message(run(&mock, &["get"]).0),
            "Specify item for get command"
        );
    }

    #[test]
    fn get_unknown_item() {
        let mock = MockBackend::new();
        assert_eq!(usage_message(run(&mock, &["get", "pwr"]).0), "Unknown getter");
    }

    #[test]
    fn intensity_bounds() {
        let mock = MockBackend::new();
        run(&mock, &["intensity", "0"]).0.unwrap();
        run(&mock, &["intensity", "100"]).0.unwrap();
        assert_eq!(mock.intensity.get(), 100);
        assert_eq!(
            usage_message(run(&mock, &["intensity", "101"]).0),
            "Intensity is out of range [0-100]"
        );
        assert_eq!(
            usage_message(run(&mock, &["intensity", "-1"]).0),
            "Intensity is out of range [0-100]"
        );
    }

    #[test]
    fn intensity_requires_number() {
        let mock = MockBackend::new();
        assert_eq!(
            usage_message(run(&mock, &["intensity", "pwr"]).0),
            "Specify intensity level"
        );
        assert_eq!(
            usage_message(run(&mock, &["intensity"]).0),
            "Specify intensity level"
        );
    }

    #[test]
    fn binmask_uses_direct_calls_high_bit_first() {
        let mock = MockBackend::with_broadcast();
        run(&mock, &["binmask", "0x801"]).0.unwrap();
        let calls = mock.calls.borrow();
        assert_eq!(calls.len(), 12);
        assert_eq!(calls[0], Call::Status(Address::Led(Led::Pwr), Status::Enable));
        assert_eq!(calls[1], Call::Status(Address::Led(Led::Lan0), Status::Disable));
        assert_eq!(calls[11], Call::Status(Address::Led(Led::Usr2), Status::Enable));
        assert!(!calls.iter().any(|c| matches!(c, Call::Status(Address::All, _))));
    }

    #[test]
    fn binmask_decimal_and_octal() {
        let mock = MockBackend::new();
        run(&mock, &["binmask", "4095"]).0.unwrap();
        assert!(Led::ALL.iter().all(|&l| mock.status_of(l) == Some(Status::Enable)));
        // 010 octal = 0x008 = PCI2
        run(&mock, &["binmask", "010"]).0.unwrap();
        assert_eq!(mock.status_of(Led::Pci2), Some(Status::Enable));
        assert_eq!(mock.status_of(Led::Pci1), Some(Status::Disable));
    }

    #[test]
    fn binmask_out_of_range() {
        let mock = MockBackend::new();
        assert_eq!(
            usage_message(run(&mock, &["binmask", "4096"]).0),
            "Number is out of range [0-0xFFF]"
        );
        assert!(mock.calls.borrow().is_empty());
    }

    // ── Errors ──

    #[test]
    fn garbage_word() {
        let mock = MockBackend::new();
        assert_eq!(
            usage_message(run(&mock, &["pwr", "purple"]).0),
            "Undefined sequence: purple is some garbage"
        );
    }

    #[test]
    fn stray_number() {
        let mock = MockBackend::new();
        assert_eq!(
            usage_message(run(&mock, &["pwr", "7"]).0),
            "Unexpected value: 7"
        );
    }

    #[test]
    fn color_without_device() {
        let mock = MockBackend::new();
        assert_eq!(
            usage_message(run(&mock, &["red"]).0),
            "Trying to configure undefined device"
        );
    }

    #[test]
    fn earlier_writes_stand_after_error() {
        let mock = MockBackend::new();
        let (result, _) = run(&mock, &["pwr", "red", "zzz", "wan", "blue"]);
        assert!(result.unwrap_err().is_usage());
        assert_eq!(mock.color_of(Led::Pwr), Some(Color::from_rgb(0xFF0000)));
        assert_eq!(mock.color_of(Led::Wan), None);
    }

    #[test]
    fn backend_failure_stops_processing() {
        let mock = MockBackend::new();
        mock.fail_after.set(Some(2));
        let (result, _) = run(&mock, &["lan", "enable"]);
        let err = result.unwrap_err();
        assert!(matches!(err, RainbowError::Backend(_)));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(mock.calls.borrow().len(), 2);
        assert_eq!(mock.status_of(Led::Lan2), None);
    }
}
