//! Parametric sampling of functions into paths, polygons and point sets.
//!
//! Samples that leave the clip limits, or evaluate to something non-finite,
//! become gaps: the curve is split there rather than joined across.

use std::fmt;

use glam::dvec2;

use crate::errors::{LayoutError, Result};
use crate::layout::PointsOptions;
use crate::log::debug;
use crate::plot::graph::check_range;
use crate::render::defaults;
use crate::render::shapes::PathShape;
use crate::render::svg::Attrs;
use crate::scene::{NodeId, Scene};
use crate::spec::Spec;
use crate::types::{NumericError, Point};

/// What to sample.
pub enum SampleSource {
    /// `y = f(x)` with x over `xlim`.
    Func(Box<dyn Fn(f64) -> f64>),
    /// `x = f(y)` with y over `ylim`.
    FuncY(Box<dyn Fn(f64) -> f64>),
    /// `(x, y) = f(t)` with t over `tlim`.
    Param(Box<dyn Fn(f64) -> Point>),
    /// Precomputed coordinates.
    Values(Vec<f64>, Vec<f64>),
}

impl SampleSource {
    pub fn func(f: impl Fn(f64) -> f64 + 'static) -> Self {
        SampleSource::Func(Box::new(f))
    }

    pub fn func_y(f: impl Fn(f64) -> f64 + 'static) -> Self {
        SampleSource::FuncY(Box::new(f))
    }

    pub fn param(f: impl Fn(f64) -> Point + 'static) -> Self {
        SampleSource::Param(Box::new(f))
    }
}

impl fmt::Debug for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSource::Func(_) => f.write_str("Func"),
            SampleSource::FuncY(_) => f.write_str("FuncY"),
            SampleSource::Param(_) => f.write_str("Param"),
            SampleSource::Values(xs, ys) => f
                .debug_struct("Values")
                .field("xs", &xs.len())
                .field("ys", &ys.len())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOptions {
    /// Number of samples of the free variable.
    pub n: usize,
    /// Range of the parameter for [`SampleSource::Param`].
    pub tlim: (f64, f64),
    /// Range of x for [`SampleSource::Func`], and the x clip limit.
    pub xlim: Option<(f64, f64)>,
    /// Range of y for [`SampleSource::FuncY`], and the y clip limit.
    pub ylim: Option<(f64, f64)>,
    /// Drop samples whose x falls outside `xlim`.
    pub clip_x: bool,
    /// Drop samples whose y falls outside `ylim`.
    pub clip_y: bool,
}

impl Default for SampleOptions {
    fn default() -> Self {
        SampleOptions {
            n: defaults::SAMPLE_COUNT,
            tlim: (0.0, 1.0),
            xlim: None,
            ylim: None,
            clip_x: false,
            clip_y: true,
        }
    }
}

fn linspace(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (hi - lo) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| lo + step * i as f64)
}

fn check_count(n: usize) -> Result<usize> {
    if n == 0 {
        return Err(LayoutError::number("sample count", NumericError::Zero));
    }
    if n > defaults::MAX_SAMPLES {
        return Err(LayoutError::TooManySamples {
            requested: n,
            limit: defaults::MAX_SAMPLES,
        });
    }
    Ok(n)
}

fn within(v: f64, lim: Option<(f64, f64)>) -> bool {
    lim.is_none_or(|(lo, hi)| v >= lo.min(hi) && v <= lo.max(hi))
}

/// Evaluate `source`, nulling samples that are clipped or non-finite.
pub fn sample(source: &SampleSource, options: &SampleOptions) -> Result<Vec<Option<Point>>> {
    let unit = (0.0, 1.0);
    let xlim = options.xlim.map(|l| check_range("xlim", l)).transpose()?;
    let ylim = options.ylim.map(|l| check_range("ylim", l)).transpose()?;

    let raw: Vec<Point> = match source {
        SampleSource::Func(f) => {
            let (lo, hi) = xlim.unwrap_or(unit);
            linspace(lo, hi, check_count(options.n)?).map(|x| dvec2(x, f(x))).collect()
        }
        SampleSource::FuncY(f) => {
            let (lo, hi) = ylim.unwrap_or(unit);
            linspace(lo, hi, check_count(options.n)?).map(|y| dvec2(f(y), y)).collect()
        }
        SampleSource::Param(f) => {
            let (lo, hi) = check_range("tlim", options.tlim)?;
            linspace(lo, hi, check_count(options.n)?).map(|t| f(t)).collect()
        }
        SampleSource::Values(xs, ys) => {
            if xs.len() != ys.len() {
                return Err(LayoutError::SampleLengthMismatch {
                    xs: xs.len(),
                    ys: ys.len(),
                });
            }
            check_count(xs.len())?;
            xs.iter().zip(ys).map(|(x, y)| dvec2(*x, *y)).collect()
        }
    };

    let xclip = if options.clip_x { xlim } else { None };
    let yclip = if options.clip_y { ylim } else { None };
    let samples: Vec<Option<Point>> = raw
        .into_iter()
        .map(|p| (p.is_finite() && within(p.x, xclip) && within(p.y, yclip)).then_some(p))
        .collect();
    debug!(
        total = samples.len(),
        dropped = samples.iter().filter(|p| p.is_none()).count(),
        "sampled"
    );
    Ok(samples)
}

/// Split samples into runs of consecutive valid points.
pub fn runs(samples: &[Option<Point>]) -> Vec<Vec<Point>> {
    samples
        .split(Option::is_none)
        .filter(|run| !run.is_empty())
        .map(|run| run.iter().flatten().copied().collect())
        .collect()
}

impl Scene {
    /// An open path through the samples, broken at gaps.
    pub fn sym_path(&mut self, source: &SampleSource, options: &SampleOptions, spec: Spec) -> Result<NodeId> {
        let samples = sample(source, options).map_err(|e| e.within("sympath"))?;
        self.shape("sympath", PathShape::from_runs(&runs(&samples), false), spec)
    }

    /// A closed polygon through the samples, one subpath per run.
    pub fn sym_poly(&mut self, source: &SampleSource, options: &SampleOptions, spec: Spec) -> Result<NodeId> {
        let samples = sample(source, options).map_err(|e| e.within("sympoly"))?;
        let node = self.shape("sympoly", PathShape::from_runs(&runs(&samples), true), spec)?;
        self.styled(node, Attrs::new().with("fill_rule", "evenodd"))
    }

    /// The region between two curves: the first forwards, the second reversed.
    pub fn sym_fill(
        &mut self,
        upper: &SampleSource,
        lower: &SampleSource,
        options: &SampleOptions,
        spec: Spec,
    ) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("symfill");
        let mut samples = sample(upper, options).map_err(wrap)?;
        let mut back = sample(lower, options).map_err(wrap)?;
        back.reverse();
        samples.extend(back);
        self.shape("symfill", PathShape::from_runs(&runs(&samples), true), spec)
    }

    /// A marker at every sample that survived clipping.
    pub fn sym_points(
        &mut self,
        source: &SampleSource,
        options: &SampleOptions,
        points: &PointsOptions,
        spec: Spec,
    ) -> Result<NodeId> {
        let samples = sample(source, options).map_err(|e| e.within("sympoints"))?;
        let located: Vec<(Point, Option<f64>)> = samples.into_iter().flatten().map(|p| (p, None)).collect();
        self.points(&located, points, spec)
    }
}
