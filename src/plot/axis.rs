//! Axis decorations: tick resolution, scales with labels, and mesh lines.
//!
//! Axes are built in plot units, where the graph box is `[0, 0, A, 1]` with
//! y down. Each axis is a group whose coordinates are data units along the
//! axis and plot units across it, so ticks sit exactly on their data values.

use glam::dvec2;

use crate::errors::{LayoutError, Result};
use crate::render::defaults;
use crate::render::geometry::merge_rects;
use crate::render::svg::{Attrs, format_num};
use crate::scene::{AspectRule, NodeId, Placement, Scene};
use crate::spec::{Align, Spec};
use crate::text::FontSpec;
use crate::types::Rect;

/// Where ticks go on an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Ticks {
    /// Evenly spaced across the range, ends included.
    Auto(usize),
    /// At these values, labelled with the values.
    Values(Vec<f64>),
    /// At these values, with these labels.
    Labeled(Vec<(f64, String)>),
    /// No ticks.
    Hidden,
}

impl Default for Ticks {
    fn default() -> Self {
        Ticks::Auto(defaults::TICK_COUNT)
    }
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

impl Ticks {
    fn count(&self) -> usize {
        match self {
            Ticks::Auto(n) => *n,
            Ticks::Values(values) => values.len(),
            Ticks::Labeled(pairs) => pairs.len(),
            Ticks::Hidden => 0,
        }
    }

    /// Tick positions and labels inside `(lo, hi)`.
    ///
    /// Every tick becomes a mark and a label node, so the count shares the
    /// sample ceiling.
    pub fn resolve(&self, (lo, hi): (f64, f64), prec: usize) -> Result<Vec<(f64, String)>> {
        let requested = self.count();
        if requested > defaults::MAX_SAMPLES {
            return Err(LayoutError::TooManySamples {
                requested,
                limit: defaults::MAX_SAMPLES,
            });
        }
        let eps = (hi - lo).abs() * 1e-9;
        let inside = |v: &f64| v.is_finite() && *v >= lo - eps && *v <= hi + eps;
        let label = |v: f64| format_num(v, prec);
        Ok(match self {
            Ticks::Auto(n) => linspace(lo, hi, *n).into_iter().map(|v| (v, label(v))).collect(),
            Ticks::Values(values) => values.iter().filter(|v| inside(*v)).map(|v| (*v, label(*v))).collect(),
            Ticks::Labeled(pairs) => pairs.iter().filter(|(v, _)| inside(v)).cloned().collect(),
            Ticks::Hidden => Vec::new(),
        })
    }
}

/// Sizes of axis decorations, in plot units.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisStyle {
    pub tick_size: f64,
    pub label_size: f64,
    pub label_offset: f64,
    pub font: FontSpec,
}

impl Default for AxisStyle {
    fn default() -> Self {
        AxisStyle {
            tick_size: defaults::TICK_SIZE,
            label_size: defaults::LABEL_SIZE,
            label_offset: defaults::LABEL_OFFSET,
            font: FontSpec::default(),
        }
    }
}

impl AxisStyle {
    fn check(&self) -> Result<()> {
        for (what, v) in [
            ("tick size", self.tick_size),
            ("label size", self.label_size),
            ("label offset", self.label_offset),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(LayoutError::bounds(format!("{what} {v} must be finite and non-negative")));
            }
        }
        if self.tick_size + self.label_offset + self.label_size <= 0.0 {
            return Err(LayoutError::bounds("axis has no depth"));
        }
        Ok(())
    }
}

/// A built axis and the plot-unit area it covers, labels included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBox {
    pub node: NodeId,
    pub extent: Rect,
}

impl Scene {
    fn text_aspect(&self, text: &str, font: &FontSpec) -> Option<f64> {
        self.measurer().measure(text, font).and_then(|g| g.aspect())
    }

    /// Horizontal axis under a graph box `width` plot units wide.
    pub fn x_axis(&mut self, (lo, hi): (f64, f64), ticks: &[(f64, String)], width: f64, style: &AxisStyle) -> Result<AxisBox> {
        style.check()?;
        let (t, o, s) = (style.tick_size, style.label_offset, style.label_size);
        let depth = t + o + s;
        let to_plot = |x: f64| (x - lo) / (hi - lo) * width;

        let mut children = Vec::with_capacity(1 + 2 * ticks.len());
        children.push(self.line(dvec2(lo, 0.0), dvec2(hi, 0.0), Spec::default())?);
        let mut spans = vec![Rect::new(0.0, 1.0, width, 1.0 + depth)];
        for (x, label) in ticks {
            children.push(self.line(dvec2(*x, 0.0), dvec2(*x, t), Spec::default())?);
            let aspect = self.text_aspect(label, &style.font).unwrap_or(1.0);
            let half = aspect * s / 2.0;
            let data_half = half * (hi - lo) / width;
            let rect = Rect::new(x - data_half, t + o, x + data_half, depth);
            children.push(self.text(label.clone(), style.font.clone(), Spec::at(rect))?);
            let px = to_plot(*x);
            spans.push(Rect::new(px - half, 1.0 + t + o, px + half, 1.0 + depth));
        }

        let spec = Spec::at(Rect::new(0.0, 1.0, width, 1.0 + depth)).with_coord(Rect::new(lo, 0.0, hi, depth));
        let children = children.into_iter().map(|c| (c, Placement::KEEP)).collect();
        let node = self.composite("xaxis", children, spec, AspectRule::Fixed(None))?;
        let extent = merge_rects(spans).unwrap_or(Rect::UNIT);
        Ok(AxisBox { node, extent })
    }

    /// Vertical axis left of a graph box one plot unit tall, labels right-aligned.
    pub fn y_axis(&mut self, (lo, hi): (f64, f64), ticks: &[(f64, String)], style: &AxisStyle) -> Result<AxisBox> {
        style.check()?;
        let (t, o, s) = (style.tick_size, style.label_offset, style.label_size);
        let aspects: Vec<f64> = ticks
            .iter()
            .map(|(_, label)| self.text_aspect(label, &style.font).unwrap_or(1.0))
            .collect();
        let label_width = aspects.iter().copied().fold(0.0, f64::max) * s;
        let depth = t + o + label_width;
        let to_plot = |y: f64| (hi - y) / (hi - lo);
        let half = s * (hi - lo) / 2.0;

        let mut children = Vec::with_capacity(1 + 2 * ticks.len());
        children.push(self.line(dvec2(0.0, lo), dvec2(0.0, hi), Spec::default())?);
        let mut spans = vec![Rect::new(-depth, 0.0, 0.0, 1.0)];
        for (y, label) in ticks {
            children.push(self.line(dvec2(-t, *y), dvec2(0.0, *y), Spec::default())?);
            let rect = Rect::new(-depth, y - half, -(t + o), y + half);
            let spec = Spec::at(rect).with_align(Align::new(1.0, 0.5));
            children.push(self.text(label.clone(), style.font.clone(), spec)?);
            let py = to_plot(*y);
            spans.push(Rect::new(-depth, py - s / 2.0, -(t + o), py + s / 2.0));
        }

        let spec = Spec::at(Rect::new(-depth, 0.0, 0.0, 1.0)).with_coord(Rect::new(-depth, hi, 0.0, lo));
        let children = children.into_iter().map(|c| (c, Placement::KEEP)).collect();
        let node = self.composite("yaxis", children, spec, AspectRule::Fixed(None))?;
        let extent = merge_rects(spans).unwrap_or(Rect::UNIT);
        Ok(AxisBox { node, extent })
    }

    /// Grid lines at tick positions, in the graph's data coordinates.
    ///
    /// `vertical` lines mark x values; otherwise they mark y values.
    pub fn mesh(&mut self, values: &[f64], vertical: bool) -> Result<Vec<NodeId>> {
        values
            .iter()
            .map(|v| {
                let line = if vertical {
                    self.vline(*v, Spec::default())?
                } else {
                    self.hline(*v, Spec::default())?
                };
                self.styled(line, Attrs::new().with("stroke", defaults::MESH_STROKE))
            })
            .collect()
    }
}
