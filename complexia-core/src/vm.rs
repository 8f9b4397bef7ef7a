//! Stack-machine evaluator for compiled programs.
//!
//! Executes instructions left to right against an operand stack of complex
//! values. Binary opcodes pop the right operand first, then the left, and
//! apply `op(left, right)`. `done` pops the final value and halts.
//!
//! The compiler only emits well-formed programs, so none of the error
//! paths here fire on the normal pipeline; they exist so that a malformed
//! or hand-patched program is reported instead of corrupting anything.

use crate::bytecode::{Instr, Program};
use crate::complex::Complex;
use crate::error::{ErrorKind, LangError, LangResult};

/// Stack slots guaranteed without reallocation.
pub const STACK_RESERVE: usize = 256;

/// Hard ceiling on operand-stack growth. Far beyond anything the compiler
/// can emit from real input; exceeding it reports `StackOverflow` instead
/// of growing without bound.
const MAX_STACK: usize = 1 << 20;

/// Evaluate a program to its single complex result.
///
/// # Errors
/// See [`Vm::run`].
pub fn evaluate(program: &Program) -> LangResult<Complex> {
    Vm::new().run(program)
}

/// A reusable evaluator. The operand stack is retained between runs, so
/// hosts evaluating many programs (or one program many times) skip the
/// per-run allocation.
pub struct Vm {
    stack: Vec<Complex>,
}

impl Vm {
    /// Create an evaluator with the guaranteed stack reserve.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(STACK_RESERVE),
        }
    }

    /// Execute `program` and return the value `done` pops.
    ///
    /// # Errors
    /// `UnknownOpcode` and `TruncatedProgram` from decoding,
    /// `StackUnderflow` when an opcode pops more than the stack holds,
    /// `StackOverflow` past the hard ceiling, and `TruncatedProgram` when
    /// the bytes run out before `done`.
    pub fn run(&mut self, program: &Program) -> LangResult<Complex> {
        self.stack.clear();

        let mut decoder = program.decoder();
        while let Some(instr) = decoder.next_instruction()? {
            match instr {
                Instr::Const(value) => self.push(value)?,
                Instr::Add => {
                    let (left, right) = self.pop_pair()?;
                    self.push(left + right)?;
                }
                Instr::Sub => {
                    let (left, right) = self.pop_pair()?;
                    self.push(left - right)?;
                }
                Instr::Mul => {
                    let (left, right) = self.pop_pair()?;
                    self.push(left * right)?;
                }
                Instr::Div => {
                    let (left, right) = self.pop_pair()?;
                    self.push(left / right)?;
                }
                Instr::Pow => {
                    let (left, right) = self.pop_pair()?;
                    self.push(left.pow(right))?;
                }
                Instr::Neg => {
                    let value = self.pop()?;
                    self.push(-value)?;
                }
                Instr::Sin => {
                    let value = self.pop()?;
                    self.push(value.sin())?;
                }
                Instr::Cos => {
                    let value = self.pop()?;
                    self.push(value.cos())?;
                }
                Instr::Done => return self.pop(),
            }
        }

        Err(LangError::new(
            ErrorKind::TruncatedProgram,
            "program ended without `done`",
        ))
    }

    // -- stack helpers --

    fn push(&mut self, value: Complex) -> LangResult<()> {
        if self.stack.len() >= MAX_STACK {
            return Err(LangError::new(
                ErrorKind::StackOverflow,
                format!("operand stack exceeded {MAX_STACK} slots"),
            ));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> LangResult<Complex> {
        self.stack.pop().ok_or_else(|| {
            LangError::new(
                ErrorKind::StackUnderflow,
                "operand stack underflow: malformed program",
            )
        })
    }

    /// Pop the right operand, then the left.
    fn pop_pair(&mut self) -> LangResult<(Complex, Complex)> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests — full pipeline: source text through compile and run
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Opcode;
    use crate::compiler::compile;

    const EPSILON: f32 = 1e-3;

    fn eval(source: &str) -> Complex {
        evaluate(&compile(source).expect("compile")).expect("evaluate")
    }

    fn assert_close(actual: Complex, re: f32, im: f32) {
        assert!(
            (actual.re - re).abs() < EPSILON && (actual.im - im).abs() < EPSILON,
            "expected ({re} + {im}i), got {actual}"
        );
    }

    // -- arithmetic and precedence --

    #[test]
    fn multiplication_before_addition() {
        assert_close(eval("3 + 5 * 4"), 23.0, 0.0);
    }

    #[test]
    fn parentheses_first() {
        assert_close(eval("(3 + 5) * 4"), 32.0, 0.0);
    }

    #[test]
    fn left_associative_power() {
        // (2^3)^2 = 64, not the conventional right-associative 512.
        assert_close(eval("2^3^2"), 64.0, 0.0);
    }

    #[test]
    fn double_negation() {
        assert_close(eval("--5"), 5.0, 0.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_close(eval("-2^2"), -4.0, 0.0);
    }

    #[test]
    fn subtraction_is_left_to_right() {
        assert_close(eval("10 - 4 - 3"), 3.0, 0.0);
    }

    // -- complex behavior --

    #[test]
    fn imaginary_literal_squared() {
        assert_close(eval("3i * 3i"), -9.0, 0.0);
    }

    #[test]
    fn i_squared_via_power() {
        assert_close(eval("i^2"), -1.0, 0.0);
    }

    #[test]
    fn euler_identity() {
        assert_close(eval("e^(i*pi)"), -1.0, 0.0);
    }

    #[test]
    fn sine_of_pi_over_two() {
        assert_close(eval("sin(pi/2)"), 1.0, 0.0);
    }

    #[test]
    fn pythagorean_identity_on_a_complex_point() {
        // `sin z ^ 2` would square z first (the prefix's operand is parsed
        // at unary level, below `^`), so the sine itself is parenthesized.
        assert_close(eval("(sin(1 + 2i))^2 + (cos(1 + 2i))^2"), 1.0, 0.0);
    }

    #[test]
    fn division_by_zero_is_non_finite() {
        let value = eval("1 / 0");
        assert!(!value.is_finite(), "got {value}");
    }

    // -- stack behavior --

    #[test]
    fn deep_nesting_grows_past_the_reserve() {
        // 300 pending left operands force the stack past STACK_RESERVE.
        let mut source = String::new();
        for _ in 0..300 {
            source.push_str("1+(");
        }
        source.push('1');
        for _ in 0..300 {
            source.push(')');
        }
        assert_close(eval(&source), 301.0, 0.0);
    }

    // -- defensive errors on malformed programs --

    #[test]
    fn unknown_opcode_is_reported() {
        let program = Program::from_bytes(vec![0xAB]);
        let err = evaluate(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownOpcode);
    }

    #[test]
    fn underflow_is_reported() {
        let mut program = Program::new();
        program.push_op(Opcode::Add);
        program.push_op(Opcode::Done);
        let err = evaluate(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackUnderflow);
    }

    #[test]
    fn missing_done_is_reported() {
        let mut program = Program::new();
        program.push_const(Complex::new(1.0, 0.0));
        let err = evaluate(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TruncatedProgram);
    }

    #[test]
    fn vm_is_reusable_across_runs() {
        let mut vm = Vm::new();
        let first = compile("1 + 2").expect("compile");
        let second = compile("2 * 3i").expect("compile");
        assert_close(vm.run(&first).expect("run"), 3.0, 0.0);
        assert_close(vm.run(&second).expect("run"), 0.0, 6.0);
    }
}
