//! Tokenizer — classifies command-line words into typed tokens.

use crate::led::{Color, Status};
use crate::parser::{self, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Command(Command),
    Number(u32),
    Color(Color),
    Status(Status),
    EndOfInput,
    /// Matched no category.
    Invalid,
}

/// A classified word together with its original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source word, empty for [`TokenKind::EndOfInput`].
    pub raw: &'a str,
}

impl<'a> Token<'a> {
    /// Classify one word. Order matters: `enable` is also a valid hex colour.
    pub fn classify(word: &'a str) -> Self {
        let kind = if let Some(cmd) = parser::parse_command(word) {
            TokenKind::Command(cmd)
        } else if let Some(status) = parser::parse_status(word) {
            TokenKind::Status(status)
        } else if let Some(color) = parser::parse_color(word) {
            TokenKind::Color(color)
        } else if let Some(n) = parser::parse_number(word) {
            TokenKind::Number(n)
        } else {
            TokenKind::Invalid
        };
        Token { kind, raw: word }
    }

    fn end() -> Self {
        Token {
            kind: TokenKind::EndOfInput,
            raw: "",
        }
    }
}

/// Read cursor over the argument words. Borrows them, never copies.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    words: &'a [String],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// `words` must already exclude the program name and flags.
    pub fn new(words: &'a [String]) -> Self {
        Tokenizer { words, pos: 0 }
    }

    /// Classify the next word. Keeps returning `EndOfInput` once exhausted.
    pub fn next_token(&mut self) -> Token<'a> {
        let Some(word) = self.words.get(self.pos) else {
            return Token::end();
        };
        self.pos += 1;
        let token = Token::classify(word);
        log::trace!("token {:?} <- {word:?}", token.kind);
        token
    }
}
