//! Geometry functions: rect conversions, rescaling and rotation-aware fitting

use glam::{DVec2, dvec2};

use crate::types::{Point, Rect};

/// Below this a trig term counts as zero.
const EPS: f64 = 1e-9;

/// Center and half-size of a rect.
pub fn rect_radial(r: Rect) -> (Point, DVec2) {
    (r.center(), dvec2(r.dx() / 2.0, r.dy() / 2.0))
}

/// Rect from a center and a half-size (radius) per axis.
pub fn radial_rect(center: Point, radius: DVec2) -> Rect {
    Rect::from_corners(center - radius, center + radius)
}

/// Center and full size of a rect.
pub fn rect_cbox(r: Rect) -> (Point, DVec2) {
    (r.center(), dvec2(r.dx(), r.dy()))
}

/// Rect from a center and a full size.
pub fn cbox_rect(center: Point, size: DVec2) -> Rect {
    radial_rect(center, size / 2.0)
}

/// Smallest rect containing every input, or `None` for an empty iterator.
pub fn merge_rects(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects
        .into_iter()
        .map(Rect::normalized)
        .reduce(|a, b| Rect::new(a.x0.min(b.x0), a.y0.min(b.y0), a.x1.max(b.x1), a.y1.max(b.y1)))
}

/// Bounding rect of a set of points.
pub fn points_rect(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    merge_rects(points.into_iter().map(|p| Rect::from_corners(p, p)))
}

/// Grow a rect by a fraction of its extent on every side.
pub fn pad_rect(r: Rect, frac: DVec2) -> Rect {
    let (center, radius) = rect_radial(r.normalized());
    radial_rect(center, radius * (1.0 + 2.0 * frac))
}

/// Map a position linearly from the interval `from` onto `to`.
///
/// A degenerate source interval maps everything onto the start of `to`.
pub fn rescale(x: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    to.0 + (x - from.0) / span * (to.1 - to.0)
}

/// Map a length (not a position) from the interval `from` onto `to`.
pub fn resize(d: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return 0.0;
    }
    (d / span * (to.1 - to.0)).abs()
}

/// Absolute cosine and sine of an angle in degrees, with float noise snapped to zero.
fn abs_trig(degrees: f64) -> (f64, f64) {
    let theta = degrees.to_radians();
    let (s, c) = theta.sin_cos();
    let snap = |v: f64| if v.abs() < EPS { 0.0 } else { v.abs() };
    (snap(c), snap(s))
}

/// Axis-aligned bounding size of a box of `size` rotated by `degrees`.
pub fn rotated_size(size: DVec2, degrees: f64) -> DVec2 {
    let (c, s) = abs_trig(degrees);
    dvec2(size.x * c + size.y * s, size.x * s + size.y * c)
}

/// Fitting rule for [`embed_size`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fit {
    /// Target width/height ratio of the unrotated box.
    pub aspect: Option<f64>,
    /// Rotation in degrees.
    pub rotate: f64,
    /// Grow to cover rather than shrink to fit.
    pub expand: bool,
    /// Ignore the rotation when sizing.
    pub invar: bool,
}

/// Size of the unrotated box that, once rotated, fits `outer`.
///
/// With a target aspect the scale solves the two fit constraints
/// `h·(a·c + s) <= W` and `h·(a·s + c) <= H`; `expand` takes the looser one.
/// Without an aspect the box is the largest-area rectangle satisfying
/// `w·c + h·s <= W` and `w·s + h·c <= H`.
pub fn embed_size(outer: DVec2, fit: Fit) -> DVec2 {
    let (c, s) = if fit.invar {
        (1.0, 0.0)
    } else {
        abs_trig(fit.rotate)
    };
    let (w0, h0) = (outer.x, outer.y);

    if let Some(a) = fit.aspect {
        let hw = w0 / (a * c + s);
        let hh = h0 / (a * s + c);
        let h = if fit.expand { hw.max(hh) } else { hw.min(hh) };
        return dvec2(a * h, h);
    }

    if s == 0.0 {
        return dvec2(w0, h0);
    }
    if c == 0.0 {
        return dvec2(h0, w0);
    }

    // both constraints share a slope: only the tighter one binds
    if (c - s).abs() < EPS {
        let m = w0.min(h0);
        return dvec2(m / (2.0 * c), m / (2.0 * s));
    }

    let fits = |w: f64, h: f64| w * c + h * s <= w0 * (1.0 + EPS) && w * s + h * c <= h0 * (1.0 + EPS);

    // area optimum along the width constraint alone
    let (wa, ha) = (w0 / (2.0 * c), w0 / (2.0 * s));
    if fits(wa, ha) {
        return dvec2(wa, ha);
    }
    // area optimum along the height constraint alone
    let (wb, hb) = (h0 / (2.0 * s), h0 / (2.0 * c));
    if fits(wb, hb) {
        return dvec2(wb, hb);
    }

    // both bind: take the corner
    let det = c * c - s * s;
    let w = (c * w0 - s * h0) / det;
    let h = (c * h0 - s * w0) / det;
    dvec2(w.max(0.0), h.max(0.0))
}

/// Place a box of `size` inside `outer` at fractional anchors `align`.
///
/// An anchor of 0 puts the box flush with the low edge, 1 with the high edge.
pub fn align_rect(outer: Rect, size: DVec2, align: DVec2) -> Rect {
    let outer = outer.normalized();
    let x0 = outer.x0 + align.x * (outer.width() - size.x);
    let y0 = outer.y0 + align.y * (outer.height() - size.y);
    Rect::new(x0, y0, x0 + size.x, y0 + size.y)
}
