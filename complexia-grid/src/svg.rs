//! SVG backend for sampled grids.
//!
//! Converts a [`Grid`] into an SVG document with one `<rect>` per cell,
//! filled with the cell's domain color.
//!
//! The complex plane has the imaginary axis pointing **up**; SVG has Y
//! pointing **down**. All Y coordinates are negated at render time so the
//! picture comes out right-side up without a global transform.

use svg::node::element::Rectangle;
use svg::Document;

use crate::{value_color, Grid};

/// Options controlling SVG output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Number of decimal places for coordinates. Default: 4.
    pub precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { precision: 4 }
    }
}

/// Render a grid to an SVG [`Document`] with default options.
#[must_use]
pub fn render(grid: &Grid) -> Document {
    render_with_options(grid, &RenderOptions::default())
}

/// Render a grid to an SVG string.
#[must_use]
pub fn render_to_string(grid: &Grid) -> String {
    render(grid).to_string()
}

/// Render a grid to an SVG [`Document`] with custom options.
///
/// The `viewBox` is the sampled window (Y negated); one rectangle is
/// emitted per cell, with `shape-rendering: crispEdges` so adjacent cells
/// meet without antialiasing seams.
#[must_use]
pub fn render_with_options(grid: &Grid, opts: &RenderOptions) -> Document {
    let window = grid.window;
    let view_box = format!(
        "{} {} {} {}",
        coord(window.x0, opts.precision),
        coord(-window.y1, opts.precision),
        coord(window.width(), opts.precision),
        coord(window.height(), opts.precision),
    );

    let mut document = Document::new().set("viewBox", view_box);

    for (idx, cell) in grid.cells.iter().enumerate() {
        let row = idx / grid.columns;
        let col = idx % grid.columns;
        let rect = grid.cell_rect(row, col);

        let square = Rectangle::new()
            .set("x", coord(rect.x0, opts.precision))
            .set("y", coord(-rect.y1, opts.precision))
            .set("width", coord(rect.width(), opts.precision))
            .set("height", coord(rect.height(), opts.precision))
            .set("fill", value_color(cell.value).to_hex())
            .set("shape-rendering", "crispEdges");
        document = document.add(square);
    }

    document
}

/// Format a coordinate with the configured precision.
fn coord(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
