//! Grid renderer for compiled Complexia programs.
//!
//! Evaluates one program over a rectangular window of the complex plane,
//! one sample per grid cell, and colors each cell by the resulting value
//! (domain coloring: hue from the argument, lightness from the magnitude).
//! The [`svg`] module turns a sampled grid into a document of colored
//! squares.
//!
//! # Input injection
//!
//! The core language has no variables, so the cell coordinate enters a
//! program through the bytecode itself: by convention, the *first*
//! `const` of the program is the input slot, and [`GridEvaluator`]
//! overwrites its operand bytes before every evaluation. A graphed
//! expression is written with a placeholder literal where the coordinate
//! goes — `sin 0` graphs the sine of each cell's position.

pub mod svg;

use complexia_core::bytecode::Program;
use complexia_core::complex::Complex;
use complexia_core::error::LangError;
use complexia_core::vm::Vm;
pub use kurbo::Rect;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error produced while sampling a grid.
#[derive(Debug, Clone)]
pub enum GridError {
    /// The program holds no `const` instruction to use as the input slot.
    MissingInputSlot,
    /// The cell size is zero, negative, or non-finite.
    InvalidStep(f64),
    /// Evaluation failed (malformed program).
    Eval(LangError),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInputSlot => {
                write!(f, "program has no constant to use as the input slot")
            }
            Self::InvalidStep(step) => write!(f, "invalid grid step {step}"),
            Self::Eval(err) => write!(f, "evaluation failed: {err}"),
        }
    }
}

impl std::error::Error for GridError {}

impl From<LangError> for GridError {
    fn from(err: LangError) -> Self {
        Self::Eval(err)
    }
}

// ---------------------------------------------------------------------------
// Grid evaluation
// ---------------------------------------------------------------------------

/// Options controlling grid sampling.
#[derive(Debug, Clone, Copy)]
pub struct GridOptions {
    /// The complex-plane window to sample, as a rectangle whose x axis is
    /// the real part and y axis the imaginary part.
    pub window: Rect,
    /// Cell size in complex-plane units.
    pub step: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            window: Rect::new(-2.0, -2.0, 2.0, 2.0),
            step: 0.1,
        }
    }
}

/// One sampled grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// The cell's center, which was the program's input.
    pub center: Complex,
    /// The program's value at that input.
    pub value: Complex,
}

/// A sampled grid, row-major from the window's bottom-left corner.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Sampled cells, `columns * rows` of them.
    pub cells: Vec<Cell>,
    /// Cells per row.
    pub columns: usize,
    /// Number of rows.
    pub rows: usize,
    /// The sampled window.
    pub window: Rect,
    /// Cell size in complex-plane units.
    pub step: f64,
}

impl Grid {
    /// The plane-coordinate rectangle of one cell.
    #[must_use]
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let x0 = self.window.x0 + col as f64 * self.step;
        let y0 = self.window.y0 + row as f64 * self.step;
        Rect::new(x0, y0, x0 + self.step, y0 + self.step)
    }
}

/// Evaluates one program at many input positions.
///
/// Owns a private copy of the program (patched in place per position, no
/// per-cell allocation) and a reusable [`Vm`].
pub struct GridEvaluator {
    program: Program,
    vm: Vm,
}

impl GridEvaluator {
    /// Wrap a program whose first `const` is the input slot.
    ///
    /// # Errors
    /// [`GridError::MissingInputSlot`] if the program holds no `const`.
    pub fn new(program: Program) -> Result<Self, GridError> {
        if program.const_count() == 0 {
            return Err(GridError::MissingInputSlot);
        }
        Ok(Self {
            program,
            vm: Vm::new(),
        })
    }

    /// Evaluate the program with its input slot set to `pos`.
    ///
    /// # Errors
    /// [`GridError::Eval`] if the program fails to run.
    pub fn eval_at(&mut self, pos: Complex) -> Result<Complex, GridError> {
        if !self.program.patch_const(0, pos) {
            return Err(GridError::MissingInputSlot);
        }
        Ok(self.vm.run(&self.program)?)
    }
}

/// Sample a program over every cell of the window.
///
/// Cell centers are the inputs; a window that is not a whole number of
/// steps wide gains a partial final column/row rather than losing one.
///
/// # Errors
/// [`GridError`] for a bad step, a program without an input slot, or an
/// evaluation failure.
pub fn sample(program: Program, options: &GridOptions) -> Result<Grid, GridError> {
    if !options.step.is_finite() || options.step <= 0.0 {
        return Err(GridError::InvalidStep(options.step));
    }
    let mut evaluator = GridEvaluator::new(program)?;

    let columns = cell_count(options.window.width(), options.step);
    let rows = cell_count(options.window.height(), options.step);

    let mut cells = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let x = options.window.x0 + (col as f64 + 0.5) * options.step;
            let y = options.window.y0 + (row as f64 + 0.5) * options.step;
            let center = Complex::new(x as f32, y as f32);
            let value = evaluator.eval_at(center)?;
            cells.push(Cell { center, value });
        }
    }

    Ok(Grid {
        cells,
        columns,
        rows,
        window: options.window,
        step: options.step,
    })
}

fn cell_count(extent: f64, step: f64) -> usize {
    let count = (extent.abs() / step).ceil();
    if count < 1.0 {
        1
    } else {
        count as usize
    }
}

// ---------------------------------------------------------------------------
// Domain coloring
// ---------------------------------------------------------------------------

/// RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form for SVG fills.
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Map a sampled value to its cell color.
///
/// Classic domain coloring: the argument picks the hue, the magnitude the
/// lightness (`m / (m + 1)`, so zeros are black and large values tend to
/// white). Non-finite values — poles, `ln 0` fallout from `pow` — render
/// as pure white.
#[must_use]
pub fn value_color(z: Complex) -> Color {
    if !z.is_finite() {
        return Color::WHITE;
    }
    let mut hue = z.arg().to_degrees();
    if hue < 0.0 {
        hue += 360.0;
    }
    let magnitude = z.magnitude();
    let lightness = magnitude / (magnitude + 1.0);
    hsl_to_rgb(hue, 1.0, lightness)
}

/// Standard HSL to RGB conversion. `h` in degrees, `s` and `l` in [0, 1].
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = chroma * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    Color::new(r + m, g + m, b + m)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
