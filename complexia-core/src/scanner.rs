//! Lexical scanner for Complexia source text.
//!
//! A byte-cursor tokenizer with exactly one token of lookahead. The
//! constructor eagerly scans the first token into the lookahead buffer, so
//! the parser can peek from the very first call — no sentinel leading
//! character is ever needed.
//!
//! # Token production rules
//!
//! | Input                  | Token produced                                |
//! |------------------------|-----------------------------------------------|
//! | `42`, `3.14`, `.5`, `2e3` | `Number(n + 0i)`                           |
//! | `3i` (no letter after) | `Number(0 + 3i)`                              |
//! | `i`, `e`, `pi`         | `Number` with the constant's value            |
//! | `sin`, `cos`           | `Sin`, `Cos`                                  |
//! | `abc`, `x_1`           | `Ident("abc")`, `Ident("x_1")` — but digits   |
//! |                        | never join an identifier (`x2` is two tokens) |
//! | `+ - * / ^ # = ( )`    | one fixed token each                          |
//! | anything else          | `Unknown` plus a recorded [`ScanError`]       |
//! | end of input           | `Eof`, repeatable                             |

use crate::complex::Complex;
use crate::error::{ErrorKind, LangError};
use crate::token::{Span, Token, TokenKind};

/// Identifier characters: ASCII letters and underscore. Digits are
/// excluded, so a digit always terminates an identifier run.
const fn is_identifier(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

// ---------------------------------------------------------------------------
// Scanner error
// ---------------------------------------------------------------------------

/// An error encountered during scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    UnexpectedCharacter,
    MalformedNumber,
}

/// An error encountered during scanning.
///
/// Scan errors are not fatal to the scanner itself: the offending input
/// becomes an [`TokenKind::Unknown`] token and scanning continues. The
/// parser turns the `Unknown` token into a fatal compile error, surfacing
/// the recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// Machine-readable error kind.
    pub kind: ScanErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Location of the error.
    pub span: Span,
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scan error at {}-{}: {}",
            self.span.start, self.span.end, self.message
        )
    }
}

impl std::error::Error for ScanError {}

impl From<ScanError> for LangError {
    fn from(err: ScanError) -> Self {
        let kind = match err.kind {
            ScanErrorKind::UnexpectedCharacter => ErrorKind::UnexpectedCharacter,
            ScanErrorKind::MalformedNumber => ErrorKind::MalformedNumber,
        };
        Self::new(kind, err.message).with_span(err.span)
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Lexical scanner with one buffered lookahead token.
pub struct Scanner {
    /// Source bytes (owned).
    src: Vec<u8>,
    /// Current byte position.
    pos: usize,
    /// The pre-scanned next token. Filled at construction and after every
    /// [`Scanner::scan`]; `None` is only observable mid-operation.
    lookahead: Option<Token>,
    /// Accumulated errors (non-fatal).
    errors: Vec<ScanError>,
}

impl Scanner {
    /// Create a new scanner over the given source string.
    ///
    /// The first token is scanned immediately into the lookahead buffer.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut scanner = Self {
            src: source.as_bytes().to_vec(),
            pos: 0,
            lookahead: None,
            errors: Vec::new(),
        };
        let first = scanner.scan_single();
        scanner.lookahead = Some(first);
        scanner
    }

    /// Consume and return the next token, refilling the lookahead buffer.
    ///
    /// Once the input is exhausted this returns `Eof` forever.
    pub fn scan(&mut self) -> Token {
        let current = match self.lookahead.take() {
            Some(tok) => tok,
            None => self.scan_single(),
        };
        self.lookahead = Some(self.scan_single());
        current
    }

    /// The buffered lookahead token, without consuming it.
    pub fn peek(&mut self) -> &Token {
        let tok = match self.lookahead.take() {
            Some(tok) => tok,
            None => self.scan_single(),
        };
        self.lookahead.insert(tok)
    }

    /// Scan all remaining tokens (including the final `Eof`).
    #[cfg(test)]
    pub fn scan_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.scan();
            let is_eof = tok.kind.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Return accumulated scan errors.
    #[must_use]
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    /// Drain accumulated scan errors.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    // -- internal helpers --

    /// Produce one token from the cursor position, ignoring the lookahead
    /// buffer entirely.
    fn scan_single(&mut self) -> Token {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        if self.pos >= self.src.len() {
            return Token {
                kind: TokenKind::Eof,
                span: Span::at(self.pos),
            };
        }

        let start = self.pos;
        let c = self.src[self.pos];

        if is_identifier(c) {
            return self.scan_identifier(start);
        }
        if c == b'.' || c.is_ascii_digit() {
            return self.scan_number(start);
        }

        self.pos += 1;
        let span = Span::new(start, self.pos);
        let kind = match c {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Mult,
            b'/' => TokenKind::Div,
            b'^' => TokenKind::Pow,
            b'#' => TokenKind::Hash,
            b'=' => TokenKind::Eq,
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            _ => {
                let message = if c.is_ascii_graphic() {
                    format!("unexpected character `{}`", c as char)
                } else {
                    format!("unexpected character {c:#04x}")
                };
                self.errors.push(ScanError {
                    kind: ScanErrorKind::UnexpectedCharacter,
                    message,
                    span,
                });
                TokenKind::Unknown
            }
        };
        Token { kind, span }
    }

    /// Scan an identifier or keyword starting at `start`.
    fn scan_identifier(&mut self, start: usize) -> Token {
        while self.pos < self.src.len() && is_identifier(self.src[self.pos]) {
            self.pos += 1;
        }
        let span = Span::new(start, self.pos);
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("");

        let kind = match text {
            "i" => TokenKind::Number(Complex::I),
            "e" => TokenKind::Number(Complex::E),
            "pi" => TokenKind::Number(Complex::PI),
            "sin" => TokenKind::Sin,
            "cos" => TokenKind::Cos,
            _ => TokenKind::Ident(text.to_owned()),
        };
        Token { kind, span }
    }

    /// Scan a numeric literal starting at `start`.
    ///
    /// Called when the character at `start` is a digit or `.`. Consumes the
    /// longest decimal float (digits, optional fraction, optional exponent),
    /// then checks for the imaginary `i` suffix: the suffix counts only when
    /// the character after the `i` is not an identifier character, so
    /// `5identifier` lexes as the real `5` followed by one identifier.
    fn scan_number(&mut self, start: usize) -> Token {
        // A lone `.` starts nothing.
        if self.src[self.pos] == b'.'
            && (self.pos + 1 >= self.src.len() || !self.src[self.pos + 1].is_ascii_digit())
        {
            self.pos += 1;
            let span = Span::new(start, self.pos);
            self.errors.push(ScanError {
                kind: ScanErrorKind::MalformedNumber,
                message: "expected digits after `.`".to_owned(),
                span,
            });
            return Token {
                kind: TokenKind::Unknown,
                span,
            };
        }

        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.pos += 1;
        }

        // Fraction
        if self.pos < self.src.len() && self.src[self.pos] == b'.' {
            self.pos += 1;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        // Exponent — consumed only when digits actually follow, so `2e`
        // stays a literal `2` and an `e` constant token.
        if self.pos < self.src.len() && matches!(self.src[self.pos], b'e' | b'E') {
            let mut cursor = self.pos + 1;
            if cursor < self.src.len() && matches!(self.src[cursor], b'+' | b'-') {
                cursor += 1;
            }
            if cursor < self.src.len() && self.src[cursor].is_ascii_digit() {
                self.pos = cursor;
                while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
            }
        }

        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("0");
        let value: f32 = text.parse().unwrap_or(0.0);

        // Imaginary suffix
        if self.pos < self.src.len()
            && self.src[self.pos] == b'i'
            && !(self.pos + 1 < self.src.len() && is_identifier(self.src[self.pos + 1]))
        {
            self.pos += 1;
            return Token {
                kind: TokenKind::Number(Complex::new(0.0, value)),
                span: Span::new(start, self.pos),
            };
        }

        Token {
            kind: TokenKind::Number(Complex::new(value, 0.0)),
            span: Span::new(start, self.pos),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
