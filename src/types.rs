//! Strongly-typed geometric primitives shared by every layout stage.
//!
//! Rectangles are stored as corner pairs `(x0, y0, x1, y1)`. A rectangle in a
//! coordinate system may be inverted (for example a y-flipped data domain), so
//! only pixel rectangles are guaranteed to be normalised.

use std::fmt;

use glam::{DVec2, dvec2};

/// A point in either coordinate or pixel space.
pub type Point = DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Reject NaN and infinities.
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Reject NaN, infinities, zero and negative values.
#[inline]
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Axis-aligned rectangle given by two corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Default for Rect {
    fn default() -> Self {
        Rect::UNIT
    }
}

impl Rect {
    /// The unit square, the default coordinate system of every node.
    pub const UNIT: Rect = Rect { x0: 0.0, y0: 0.0, x1: 1.0, y1: 1.0 };

    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect::new(a.x, a.y, b.x, b.y)
    }

    pub fn from_array([x0, y0, x1, y1]: [f64; 4]) -> Self {
        Rect::new(x0, y0, x1, y1)
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Signed extent along x (negative for inverted rects)
    #[inline]
    pub fn dx(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Signed extent along y (negative for inverted rects)
    #[inline]
    pub fn dy(&self) -> f64 {
        self.y1 - self.y0
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.dx().abs()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.dy().abs()
    }

    pub fn size(&self) -> DVec2 {
        dvec2(self.width(), self.height())
    }

    pub fn min(&self) -> Point {
        dvec2(self.x0.min(self.x1), self.y0.min(self.y1))
    }

    pub fn max(&self) -> Point {
        dvec2(self.x0.max(self.x1), self.y0.max(self.y1))
    }

    pub fn center(&self) -> Point {
        dvec2((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Reorder the corners so that `x0 <= x1` and `y0 <= y1`.
    pub fn normalized(self) -> Rect {
        Rect::from_corners(self.min(), self.max())
    }

    /// Width over height, or `None` when either extent is degenerate.
    pub fn aspect(&self) -> Option<f64> {
        let (w, h) = (self.width(), self.height());
        if w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite() {
            Some(w / h)
        } else {
            None
        }
    }

    /// Swap the y corners (turns a y-down domain into a y-up one and back).
    pub fn flip_y(self) -> Rect {
        Rect::new(self.x0, self.y1, self.x1, self.y0)
    }

    /// Swap the roles of the two axes.
    pub fn transpose(self) -> Rect {
        Rect::new(self.y0, self.x0, self.y1, self.x1)
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x0, self.y0, self.x1, self.y1)
    }
}

/// A numeric input that may be given as one value, a pair, or four values.
///
/// Resolved once at construction time: a scalar broadcasts to both axes, a
/// pair is `(horizontal, vertical)`, a quad is `(left, top, right, bottom)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
    Scalar(f64),
    Pair(f64, f64),
    Quad(f64, f64, f64, f64),
}

impl Default for Extent {
    fn default() -> Self {
        Extent::Scalar(0.0)
    }
}

impl From<f64> for Extent {
    fn from(v: f64) -> Self {
        Extent::Scalar(v)
    }
}

impl From<(f64, f64)> for Extent {
    fn from((a, b): (f64, f64)) -> Self {
        Extent::Pair(a, b)
    }
}

impl From<[f64; 2]> for Extent {
    fn from([a, b]: [f64; 2]) -> Self {
        Extent::Pair(a, b)
    }
}

impl From<[f64; 4]> for Extent {
    fn from([l, t, r, b]: [f64; 4]) -> Self {
        Extent::Quad(l, t, r, b)
    }
}

impl Extent {
    /// Resolve to `(horizontal, vertical)`.
    ///
    /// A quad collapses to the sum of its opposite sides.
    pub fn pair(self) -> DVec2 {
        match self {
            Extent::Scalar(v) => dvec2(v, v),
            Extent::Pair(h, v) => dvec2(h, v),
            Extent::Quad(l, t, r, b) => dvec2(l + r, t + b),
        }
    }

    /// Resolve to `[left, top, right, bottom]`.
    pub fn quad(self) -> [f64; 4] {
        match self {
            Extent::Scalar(v) => [v, v, v, v],
            Extent::Pair(h, v) => [h, v, h, v],
            Extent::Quad(l, t, r, b) => [l, t, r, b],
        }
    }

    pub fn is_zero(self) -> bool {
        self.quad().iter().all(|v| *v == 0.0)
    }

    /// Validate every component as a finite number.
    pub fn try_finite(self) -> Result<Extent, NumericError> {
        for v in self.quad() {
            check_finite(v)?;
        }
        Ok(self)
    }
}
