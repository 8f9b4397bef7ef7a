//! Complexia expression compiler: scanner, recursive-descent compiler,
//! bytecode format, and stack-machine evaluator for arithmetic over
//! complex numbers.
//!
//! The pipeline is `text → tokens → bytecode → complex result`:
//!
//! ```
//! let program = complexia_core::compiler::compile("e^(i*pi)").unwrap();
//! let value = complexia_core::vm::evaluate(&program).unwrap();
//! assert!((value.re + 1.0).abs() < 1e-3);
//! ```

pub mod bytecode;
pub mod compiler;
pub mod complex;
pub mod error;
pub mod scanner;
pub mod token;
pub mod vm;
