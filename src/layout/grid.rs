//! Grid: rows and columns balanced in log-aspect space.
//!
//! Column widths and row heights are chosen so that, to first order, every
//! cell's own aspect matches the aspect of the cell it is given. The solve is
//! closed-form: with `l_ij = ln a_ij` and `μ` their mean, column `j` gets a
//! width proportional to `exp(mean_i l_ij - μ)` and row `i` a height
//! proportional to `exp(μ - mean_j l_ij)`. This is exact when all cells share
//! one aspect and an approximation otherwise.

use glam::DVec2;

use crate::errors::{LayoutError, Result};
use crate::log::debug;
use crate::scene::{AspectRule, NodeId, Placement, Scene};
use crate::spec::Spec;
use crate::types::{Extent, Rect, check_positive};

use super::pinned;

#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Gap between columns and between rows, as fractions of each axis.
    pub spacing: Extent,
    /// Explicit column widths, normalized; overrides the balancing.
    pub widths: Option<Vec<f64>>,
    /// Explicit row heights, normalized; overrides the balancing.
    pub heights: Option<Vec<f64>>,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            spacing: Extent::Scalar(0.0),
            widths: None,
            heights: None,
        }
    }
}

/// Solved grid geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Column widths, summing to one less the column gaps.
    pub widths: Vec<f64>,
    /// Row heights, summing to one less the row gaps.
    pub heights: Vec<f64>,
    pub aspect: Option<f64>,
    pub spacing: DVec2,
}

impl GridLayout {
    /// Placement rect of the cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<Rect> {
        let x0: f64 = self.widths.get(..col)?.iter().sum::<f64>() + self.spacing.x * col as f64;
        let y0: f64 = self.heights.get(..row)?.iter().sum::<f64>() + self.spacing.y * row as f64;
        Some(Rect::new(x0, y0, x0 + self.widths.get(col)?, y0 + self.heights.get(row)?))
    }
}

fn normalize(what: &'static str, values: &[f64], count: usize) -> Result<Vec<f64>> {
    if values.len() != count {
        return Err(LayoutError::bounds(format!(
            "{} {what} given for {count} tracks",
            values.len()
        )));
    }
    for v in values {
        check_positive(*v).map_err(|e| LayoutError::number(what, e))?;
    }
    let total: f64 = values.iter().sum();
    Ok(values.iter().map(|v| v / total).collect())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn mean_log(values: &[f64]) -> f64 {
    mean(&values.iter().map(|v| v.ln()).collect::<Vec<_>>())
}

/// Solve column widths, row heights and the grid aspect.
///
/// `aspects` is row-major and rectangular; a missing aspect counts as 1.
pub fn solve_grid(aspects: &[Vec<Option<f64>>], options: &GridOptions) -> Result<GridLayout> {
    let rows = aspects.len();
    let cols = aspects.first().map_or(0, Vec::len);
    if aspects.iter().any(|row| row.len() != cols) {
        return Err(LayoutError::bounds("grid rows differ in length"));
    }
    let spacing = options
        .spacing
        .try_finite()
        .map_err(|e| LayoutError::number("spacing", e))?
        .pair();
    if rows == 0 || cols == 0 {
        return Ok(GridLayout {
            widths: vec![0.0; cols],
            heights: vec![0.0; rows],
            aspect: None,
            spacing,
        });
    }

    let logs: Vec<Vec<f64>> = aspects
        .iter()
        .map(|row| row.iter().map(|a| a.unwrap_or(1.0).ln()).collect())
        .collect();
    let mu = mean(&logs.concat());

    let widths = match &options.widths {
        Some(w) => normalize("widths", w, cols)?,
        None => {
            let raw: Vec<f64> = (0..cols)
                .map(|j| {
                    let column: Vec<f64> = logs.iter().map(|row| row[j]).collect();
                    (mean(&column) - mu).exp()
                })
                .collect();
            normalize("widths", &raw, cols)?
        }
    };
    let heights = match &options.heights {
        Some(h) => normalize("heights", h, rows)?,
        None => {
            let raw: Vec<f64> = logs
                .iter()
                .map(|row| (mu - mean(row)).exp())
                .collect();
            normalize("heights", &raw, rows)?
        }
    };

    let aspect = (mu - mean_log(&widths) + mean_log(&heights)).exp();

    let shrink_x = 1.0 - spacing.x * (cols - 1) as f64;
    let shrink_y = 1.0 - spacing.y * (rows - 1) as f64;
    if spacing.x < 0.0 || spacing.y < 0.0 || shrink_x <= 0.0 || shrink_y <= 0.0 {
        return Err(LayoutError::bounds(format!(
            "spacing {spacing} leaves no room for a {rows}x{cols} grid"
        )));
    }
    let widths: Vec<f64> = widths.into_iter().map(|w| w * shrink_x).collect();
    let heights: Vec<f64> = heights.into_iter().map(|h| h * shrink_y).collect();
    let aspect = aspect * shrink_y / shrink_x;
    debug!(?widths, ?heights, aspect, "grid");

    Ok(GridLayout {
        widths,
        heights,
        aspect: Some(aspect),
        spacing,
    })
}

impl Scene {
    /// Lay out `rows` of children; short rows are padded with spacers.
    pub fn grid(&mut self, rows: Vec<Vec<NodeId>>, options: &GridOptions, spec: Spec) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("grid");
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut cells: Vec<Vec<NodeId>> = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row = row;
            while row.len() < cols {
                row.push(self.spacer(Spec::default())?);
            }
            cells.push(row);
        }

        let aspects = cells
            .iter()
            .map(|row| row.iter().map(|id| self.aspect(*id)).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()
            .map_err(wrap)?;
        let layout = solve_grid(&aspects, options).map_err(wrap)?;

        let mut children = Vec::with_capacity(cells.len() * cols);
        for (i, row) in cells.iter().enumerate() {
            for (j, id) in row.iter().enumerate() {
                let rect = layout.cell(i, j).unwrap_or(Rect::UNIT);
                children.push((*id, Placement::at(rect)));
            }
        }
        self.composite("grid", children, pinned(spec), AspectRule::Fixed(layout.aspect))
    }
}
