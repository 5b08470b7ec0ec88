//! Rendering context - the coordinate-to-pixel mapping passed down the tree

use glam::dvec2;

use crate::spec::Spec;
use crate::types::{Point, Rect};

use super::defaults;
use super::geometry::{align_rect, cbox_rect, embed_size, rescale, resize, rotated_size};
use super::svg::format_num;

/// A rotation about a pixel-space center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub center: Point,
}

/// Maps a coordinate rectangle onto a pixel rectangle.
///
/// Contexts are plain values: [`Context::map`] derives a child without
/// touching the parent, so the same inputs always give the same child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    /// Pixel rectangle, always normalised.
    pub prect: Rect,
    /// Coordinate rectangle spanning `prect`; may be inverted.
    pub coord: Rect,
    /// Decimal places kept when serializing.
    pub prec: usize,
    pub debug: bool,
    /// Rotation applied to the element rendered in this context.
    pub rotation: Option<Rotation>,
}

impl Context {
    /// A root context over `prect` with the unit square as coordinates.
    pub fn new(prect: Rect) -> Self {
        Context {
            prect: prect.normalized(),
            coord: Rect::UNIT,
            prec: defaults::PRECISION,
            debug: false,
            rotation: None,
        }
    }

    pub fn with_coord(mut self, coord: Rect) -> Self {
        self.coord = coord;
        self
    }

    pub fn with_precision(mut self, prec: usize) -> Self {
        self.prec = prec;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn xspans(&self) -> ((f64, f64), (f64, f64)) {
        ((self.coord.x0, self.coord.x1), (self.prect.x0, self.prect.x1))
    }

    fn yspans(&self) -> ((f64, f64), (f64, f64)) {
        ((self.coord.y0, self.coord.y1), (self.prect.y0, self.prect.y1))
    }

    /// Horizontal position in coordinates to pixels.
    pub fn rescale_x(&self, x: f64) -> f64 {
        let (from, to) = self.xspans();
        rescale(x, from, to)
    }

    /// Vertical position in coordinates to pixels.
    pub fn rescale_y(&self, y: f64) -> f64 {
        let (from, to) = self.yspans();
        rescale(y, from, to)
    }

    /// Horizontal length in coordinates to pixels.
    pub fn resize_x(&self, dx: f64) -> f64 {
        let (from, to) = self.xspans();
        resize(dx, from, to)
    }

    /// Vertical length in coordinates to pixels.
    pub fn resize_y(&self, dy: f64) -> f64 {
        let (from, to) = self.yspans();
        resize(dy, from, to)
    }

    pub fn map_point(&self, p: Point) -> Point {
        dvec2(self.rescale_x(p.x), self.rescale_y(p.y))
    }

    /// Map a coordinate rect to a normalised pixel rect.
    pub fn map_rect(&self, r: Rect) -> Rect {
        Rect::from_corners(self.map_point(dvec2(r.x0, r.y0)), self.map_point(dvec2(r.x1, r.y1)))
            .normalized()
    }

    /// Derive the context a child with placement `spec` renders in.
    pub fn map(&self, spec: &Spec) -> Context {
        let outer = self.map_rect(spec.rect.unwrap_or(self.coord));
        let size = embed_size(outer.size(), spec.fit());
        let prect = align_rect(outer, size, spec.align.as_vec());
        let rotation = (spec.rotate != 0.0).then(|| Rotation {
            degrees: spec.rotate,
            center: prect.center(),
        });
        Context {
            prect,
            coord: spec.coord.unwrap_or(self.coord),
            prec: self.prec,
            debug: self.debug,
            rotation,
        }
    }

    /// The pixel area the element actually covers once rotated.
    pub fn occupied(&self) -> Rect {
        match self.rotation {
            Some(rot) => cbox_rect(self.prect.center(), rotated_size(self.prect.size(), rot.degrees)),
            None => self.prect,
        }
    }

    /// The SVG `transform` attribute value, if this context rotates.
    pub fn transform(&self) -> Option<String> {
        self.rotation.map(|rot| {
            format!(
                "rotate({}, {}, {})",
                format_num(rot.degrees, self.prec),
                format_num(rot.center.x, self.prec),
                format_num(rot.center.y, self.prec)
            )
        })
    }
}
