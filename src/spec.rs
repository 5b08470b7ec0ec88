//! Placement configuration carried by every node.

use std::str::FromStr;

use glam::{DVec2, dvec2};

use crate::errors::LayoutError;
use crate::render::geometry::Fit;
use crate::types::Rect;

/// Fractional placement of a node inside its parent's coordinate system.
///
/// A spec is layout-only: none of its fields is ever serialized as a
/// rendering attribute (rotation is emitted separately as a transform).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spec {
    /// Sub-rectangle in the parent's coordinates; `None` means the whole coord.
    pub rect: Option<Rect>,
    /// Target width/height ratio.
    pub aspect: Option<f64>,
    pub align: Align,
    /// Rotation in degrees, clockwise in pixel space.
    pub rotate: f64,
    /// Rotation does not shrink the allocated box.
    pub invar: bool,
    /// Grow to contain the rect rather than shrink to fit inside it.
    pub expand: bool,
    /// Coordinate system override for the subtree.
    pub coord: Option<Rect>,
}

impl Spec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(rect: Rect) -> Self {
        Spec {
            rect: Some(rect),
            ..Spec::default()
        }
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_aspect(mut self, aspect: Option<f64>) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn with_invar(mut self, invar: bool) -> Self {
        self.invar = invar;
        self
    }

    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_coord(mut self, coord: Rect) -> Self {
        self.coord = Some(coord);
        self
    }

    /// The fitting rule this spec asks of [`crate::render::geometry::embed_size`].
    pub fn fit(&self) -> Fit {
        Fit {
            aspect: self.aspect,
            rotate: self.rotate,
            expand: self.expand,
            invar: self.invar,
        }
    }
}

/// Fractional anchors in `[0, 1]` on each axis; 0.5 centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Align {
    pub h: f64,
    pub v: f64,
}

impl Default for Align {
    fn default() -> Self {
        Align::CENTER
    }
}

impl Align {
    pub const CENTER: Align = Align { h: 0.5, v: 0.5 };

    pub fn new(h: f64, v: f64) -> Self {
        Align { h, v }
    }

    pub fn both(frac: f64) -> Self {
        Align { h: frac, v: frac }
    }

    pub fn as_vec(self) -> DVec2 {
        dvec2(self.h, self.v)
    }

    /// Anchor that keeps a box flush with `side`.
    pub fn toward(side: Side) -> Self {
        match side {
            Side::Left => Align::new(0.0, 0.5),
            Side::Right => Align::new(1.0, 0.5),
            Side::Top => Align::new(0.5, 0.0),
            Side::Bottom => Align::new(0.5, 1.0),
        }
    }
}

fn unknown(kind: &'static str, keyword: &str, expected: &str) -> LayoutError {
    LayoutError::UnknownKeyword {
        kind,
        keyword: keyword.to_string(),
        expected: Some(format!("expected one of: {expected}")),
    }
}

impl FromStr for Align {
    type Err = LayoutError;

    /// Parse one or two keywords, e.g. `"left"`, `"center"`, `"right top"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const EXPECTED: &str = "left, center, middle, right, top, bottom";
        let mut align = Align::CENTER;
        let words: Vec<&str> = s.split_whitespace().collect();
        if words.is_empty() || words.len() > 2 {
            return Err(unknown("alignment", s, EXPECTED));
        }
        for word in words {
            match word {
                "left" => align.h = 0.0,
                "right" => align.h = 1.0,
                "top" => align.v = 0.0,
                "bottom" => align.v = 1.0,
                "center" | "middle" => {}
                other => return Err(unknown("alignment", other, EXPECTED)),
            }
        }
        Ok(align)
    }
}

/// One edge of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

impl FromStr for Side {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            other => Err(unknown("side", other, "left, right, top, bottom")),
        }
    }
}

/// Layout axis of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

impl FromStr for Direction {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v" | "vertical" => Ok(Direction::Vertical),
            "h" | "horizontal" => Ok(Direction::Horizontal),
            other => Err(unknown("direction", other, "v, vertical, h, horizontal")),
        }
    }
}
