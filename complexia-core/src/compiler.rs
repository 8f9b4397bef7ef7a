//! Recursive-descent compiler from source text to bytecode.
//!
//! Grammar, loosest-binding first; every level is left-associative via an
//! iterative loop except `unary`, which recurses on itself:
//!
//! ```text
//! expr     := term
//! term     := factor ( ('+' | '-') factor )*
//! factor   := unary ( ('*' | '/') unary )*
//! unary    := '-' unary | 'sin' unary | 'cos' unary | exponent
//! exponent := primary ( '^' primary )*
//! primary  := NUMBER | '(' expr ')'
//! ```
//!
//! Consequences worth knowing: `^` is *left*-associative (`2^3^2` is
//! `(2^3)^2`), and unary prefixes bind looser than `^` (`-2^2` is
//! `-(2^2)`) but tighter than `*`.
//!
//! Each production emits its operator opcode after both operands, so the
//! output is postfix and the evaluator sees operands before operators.
//! Any grammar violation aborts compilation with a [`LangError`]; no
//! partial program is ever returned.

use crate::bytecode::{Opcode, Program};
use crate::error::{ErrorKind, LangError, LangResult};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Compile one expression into a bytecode program.
///
/// # Errors
/// Any lexical or syntax error; see [`ErrorKind`].
pub fn compile(source: &str) -> LangResult<Program> {
    Compiler::new(source).compile()
}

/// Single-use compiler: owns its scanner and output buffer, consumed by
/// [`Compiler::compile`].
pub struct Compiler {
    scanner: Scanner,
    program: Program,
}

impl Compiler {
    /// Create a compiler over the given source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            program: Program::new(),
        }
    }

    /// Run the compilation, producing a program terminated by `done`.
    ///
    /// A single leading `#` is discarded — the historical driver prefixed
    /// every line with one to prime the scanner's lookahead, which now
    /// primes itself.
    ///
    /// # Errors
    /// Any lexical or syntax error, including input left over after the
    /// expression.
    pub fn compile(mut self) -> LangResult<Program> {
        self.consume(&TokenKind::Hash);

        self.expr()?;

        let trailing = self.peek();
        if !trailing.kind.is_eof() {
            return Err(LangError::new(
                ErrorKind::TrailingInput,
                format!("unexpected {} after the expression", trailing.kind.name()),
            )
            .with_span(trailing.span));
        }

        self.program.push_op(Opcode::Done);
        Ok(self.program)
    }

    // -- grammar productions --

    fn expr(&mut self) -> LangResult<()> {
        self.term()
    }

    fn term(&mut self) -> LangResult<()> {
        // left operand
        self.factor()?;

        while self.next_is(&TokenKind::Plus) || self.next_is(&TokenKind::Minus) {
            let span = self.peek().span;
            let plus = self.consume(&TokenKind::Plus);
            let minus = self.consume(&TokenKind::Minus);
            if plus && minus {
                return Err(LangError::new(
                    ErrorKind::ConflictingOperators,
                    "expected an expression between `+` and `-`",
                )
                .with_span(span));
            }

            // right operand
            self.factor()?;
            self.program
                .push_op(if plus { Opcode::Add } else { Opcode::Sub });
        }
        Ok(())
    }

    fn factor(&mut self) -> LangResult<()> {
        // left operand
        self.unary()?;

        while self.next_is(&TokenKind::Mult) || self.next_is(&TokenKind::Div) {
            let span = self.peek().span;
            let mult = self.consume(&TokenKind::Mult);
            let div = self.consume(&TokenKind::Div);
            if mult && div {
                return Err(LangError::new(
                    ErrorKind::ConflictingOperators,
                    "expected an expression between `*` and `/`",
                )
                .with_span(span));
            }

            // right operand
            self.unary()?;
            self.program
                .push_op(if mult { Opcode::Mul } else { Opcode::Div });
        }
        Ok(())
    }

    /// Unary prefixes recurse on this level, so `--5` and `sin cos 3`
    /// nest, while the operand of `^` below stays a `primary`.
    fn unary(&mut self) -> LangResult<()> {
        if self.consume(&TokenKind::Minus) {
            self.unary()?;
            self.program.push_op(Opcode::Neg);
            return Ok(());
        }
        if self.consume(&TokenKind::Sin) {
            self.unary()?;
            self.program.push_op(Opcode::Sin);
            return Ok(());
        }
        if self.consume(&TokenKind::Cos) {
            self.unary()?;
            self.program.push_op(Opcode::Cos);
            return Ok(());
        }
        self.exponent()
    }

    fn exponent(&mut self) -> LangResult<()> {
        // left operand
        self.primary()?;

        while self.consume(&TokenKind::Pow) {
            // right operand
            self.primary()?;
            self.program.push_op(Opcode::Pow);
        }
        Ok(())
    }

    fn primary(&mut self) -> LangResult<()> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Number(value) => {
                self.scanner.scan();
                self.program.push_const(value);
                Ok(())
            }
            TokenKind::LeftParen => self.paren(),
            TokenKind::Unknown => {
                // Surface the scanner's diagnostic for the bad character.
                let span = tok.span;
                Err(self
                    .scanner
                    .take_errors()
                    .into_iter()
                    .next()
                    .map_or_else(
                        || {
                            LangError::new(ErrorKind::UnexpectedCharacter, "invalid character")
                                .with_span(span)
                        },
                        LangError::from,
                    ))
            }
            ref kind => Err(LangError::new(
                ErrorKind::UnexpectedToken,
                format!("expected a number or `(`, found {}", kind.name()),
            )
            .with_span(tok.span)),
        }
    }

    fn paren(&mut self) -> LangResult<()> {
        self.consume(&TokenKind::LeftParen);
        self.expr()?;
        if !self.consume(&TokenKind::RightParen) {
            let tok = self.peek();
            return Err(LangError::new(
                ErrorKind::UnbalancedDelimiter,
                format!("expected `)`, found {}", tok.kind.name()),
            )
            .with_span(tok.span));
        }
        Ok(())
    }

    // -- token helpers --

    fn peek(&mut self) -> Token {
        self.scanner.peek().clone()
    }

    fn next_is(&mut self, kind: &TokenKind) -> bool {
        self.scanner.peek().kind == *kind
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.next_is(kind) {
            self.scanner.scan();
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
