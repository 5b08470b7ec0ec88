//! Leaf shape types
//!
//! Each shape is its own type that knows how to:
//! - Report its intrinsic aspect ratio, if it has one
//! - Report the bounds of any positions it carries in data coordinates
//! - Produce its geometric SVG attributes for a resolved context

use std::fmt::Write as _;

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use crate::text::{FontSpec, GlyphBox};
use crate::types::{Extent, Point, Rect};

use super::context::Context;
use super::defaults;
use super::geometry::points_rect;
use super::svg::{Attrs, escape_text, format_num, format_points};

/// Common behavior for all leaf shapes
#[enum_dispatch]
pub trait Shape {
    /// SVG element name
    fn tag(&self) -> &'static str;

    /// Geometric attributes for the box `ctx` resolved to.
    fn props(&self, ctx: &Context) -> Attrs;

    /// Element content, or `None` for a self-closing element.
    fn inner(&self, _ctx: &Context) -> Option<String> {
        None
    }

    /// Styling applied unless the node overrides it.
    fn default_attrs(&self) -> Attrs {
        Attrs::new()
    }

    /// Width/height ratio the shape wants, if any.
    fn aspect(&self) -> Option<f64> {
        None
    }

    /// Bounding box of positions given in data coordinates.
    fn data_bounds(&self) -> Option<Rect> {
        None
    }

    /// Whether the shape produces any markup.
    fn is_visible(&self) -> bool {
        true
    }

    /// Meta elements are emitted verbatim and take no part in layout.
    fn is_meta(&self) -> bool {
        false
    }
}

fn stroked() -> Attrs {
    Attrs::new()
        .with("stroke", defaults::STROKE)
        .with("stroke_width", defaults::STROKE_WIDTH)
        .with("fill", defaults::FILL)
}

// ============================================================================
// Shape Types
// ============================================================================

/// Takes up space and renders nothing.
#[derive(Debug, Clone, Default)]
pub struct Spacer;

impl Shape for Spacer {
    fn tag(&self) -> &'static str {
        "g"
    }

    fn props(&self, _ctx: &Context) -> Attrs {
        Attrs::new()
    }

    fn is_visible(&self) -> bool {
        false
    }
}

/// A rectangle filling its box, optionally with rounded corners.
#[derive(Debug, Clone, Default)]
pub struct RectShape {
    /// Corner radius as a fraction of the box size.
    pub rounded: Option<Extent>,
}

impl Shape for RectShape {
    fn tag(&self) -> &'static str {
        "rect"
    }

    fn props(&self, ctx: &Context) -> Attrs {
        let r = ctx.prect;
        let mut attrs = Attrs::new()
            .with("x", r.x0)
            .with("y", r.y0)
            .with("width", r.width())
            .with("height", r.height());
        if let Some(rounded) = self.rounded {
            let frac = rounded.pair();
            attrs.set("rx", frac.x * r.width());
            attrs.set("ry", frac.y * r.height());
        }
        attrs
    }

    fn default_attrs(&self) -> Attrs {
        stroked()
    }
}

/// An ellipse inscribed in its box.
#[derive(Debug, Clone, Default)]
pub struct EllipseShape;

impl Shape for EllipseShape {
    fn tag(&self) -> &'static str {
        "ellipse"
    }

    fn props(&self, ctx: &Context) -> Attrs {
        let c = ctx.prect.center();
        Attrs::new()
            .with("cx", c.x)
            .with("cy", c.y)
            .with("rx", ctx.prect.width() / 2.0)
            .with("ry", ctx.prect.height() / 2.0)
    }

    fn default_attrs(&self) -> Attrs {
        stroked()
    }
}

/// Where a line sits in its coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    /// Between two points in coordinates.
    Segment(Point, Point),
    /// Across the full coordinate width at a fixed y.
    Horizontal(f64),
    /// Across the full coordinate height at a fixed x.
    Vertical(f64),
}

#[derive(Debug, Clone)]
pub struct LineShape {
    pub kind: LineKind,
}

impl LineShape {
    fn endpoints(&self, coord: Rect) -> (Point, Point) {
        match self.kind {
            LineKind::Segment(a, b) => (a, b),
            LineKind::Horizontal(y) => (dvec2(coord.x0, y), dvec2(coord.x1, y)),
            LineKind::Vertical(x) => (dvec2(x, coord.y0), dvec2(x, coord.y1)),
        }
    }
}

impl Shape for LineShape {
    fn tag(&self) -> &'static str {
        "line"
    }

    fn props(&self, ctx: &Context) -> Attrs {
        let (a, b) = self.endpoints(ctx.coord);
        let (a, b) = (ctx.map_point(a), ctx.map_point(b));
        Attrs::new()
            .with("x1", a.x)
            .with("y1", a.y)
            .with("x2", b.x)
            .with("y2", b.y)
    }

    fn default_attrs(&self) -> Attrs {
        stroked()
    }

    fn data_bounds(&self) -> Option<Rect> {
        match self.kind {
            LineKind::Segment(a, b) => points_rect([a, b]),
            _ => None,
        }
    }
}

/// An open polyline or a closed polygon through coordinate points.
#[derive(Debug, Clone)]
pub struct PolyShape {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Shape for PolyShape {
    fn tag(&self) -> &'static str {
        if self.closed { "polygon" } else { "polyline" }
    }

    fn props(&self, ctx: &Context) -> Attrs {
        let mapped: Vec<DVec2> = self.points.iter().map(|p| ctx.map_point(*p)).collect();
        Attrs::new().with("points", format_points(&mapped, ctx.prec))
    }

    fn default_attrs(&self) -> Attrs {
        stroked()
    }

    fn data_bounds(&self) -> Option<Rect> {
        points_rect(self.points.iter().copied())
    }
}

/// One path command, positions in coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    Move(Point),
    Line(Point),
    Arc {
        radius: DVec2,
        rotation: f64,
        large: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

impl PathCmd {
    fn target(&self) -> Option<Point> {
        match *self {
            PathCmd::Move(p) | PathCmd::Line(p) => Some(p),
            PathCmd::Arc { to, .. } => Some(to),
            PathCmd::Close => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathShape {
    pub commands: Vec<PathCmd>,
}

impl PathShape {
    /// One `M ... L ...` subpath per run, optionally closed.
    pub fn from_runs(runs: &[Vec<Point>], closed: bool) -> Self {
        let mut commands = Vec::new();
        for run in runs.iter().filter(|r| !r.is_empty()) {
            commands.push(PathCmd::Move(run[0]));
            commands.extend(run[1..].iter().map(|p| PathCmd::Line(*p)));
            if closed {
                commands.push(PathCmd::Close);
            }
        }
        PathShape { commands }
    }

    /// The `d` attribute for `ctx`.
    pub fn path_data(&self, ctx: &Context) -> String {
        let n = |v: f64| format_num(v, ctx.prec);
        let mut d = String::new();
        for cmd in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            // writing into a String cannot fail
            let _ = match *cmd {
                PathCmd::Move(p) => {
                    let p = ctx.map_point(p);
                    write!(d, "M {} {}", n(p.x), n(p.y))
                }
                PathCmd::Line(p) => {
                    let p = ctx.map_point(p);
                    write!(d, "L {} {}", n(p.x), n(p.y))
                }
                PathCmd::Arc {
                    radius,
                    rotation,
                    large,
                    sweep,
                    to,
                } => {
                    let to = ctx.map_point(to);
                    write!(
                        d,
                        "A {} {} {} {} {} {} {}",
                        n(ctx.resize_x(radius.x)),
                        n(ctx.resize_y(radius.y)),
                        n(rotation),
                        large as u8,
                        sweep as u8,
                        n(to.x),
                        n(to.y)
                    )
                }
                PathCmd::Close => write!(d, "Z"),
            };
        }
        d
    }
}

impl Shape for PathShape {
    fn tag(&self) -> &'static str {
        "path"
    }

    fn props(&self, ctx: &Context) -> Attrs {
        Attrs::new().with("d", self.path_data(ctx))
    }

    fn default_attrs(&self) -> Attrs {
        stroked()
    }

    fn data_bounds(&self) -> Option<Rect> {
        points_rect(self.commands.iter().filter_map(PathCmd::target))
    }
}

/// A single line of text scaled to fill its box.
#[derive(Debug, Clone)]
pub struct TextShape {
    pub text: String,
    pub font: FontSpec,
    /// Measured ink box; `None` when no metrics were available.
    pub glyph: Option<GlyphBox>,
}

impl Shape for TextShape {
    fn tag(&self) -> &'static str {
        "text"
    }

    fn props(&self, ctx: &Context) -> Attrs {
        let r = ctx.prect;
        let (x, y, font_size) = match self.glyph {
            Some(g) if g.height > 0.0 => {
                let k = r.height() / g.height;
                (r.x0 - g.x * k, r.y0 - g.y * k, self.font.size * k)
            }
            _ => (r.x0, r.y1, r.height()),
        };
        Attrs::new()
            .with("x", x)
            .with("y", y)
            .with("font_family", self.font.family.as_str())
            .with("font_weight", self.font.weight.as_str())
            .with("font_size", font_size)
    }

    fn inner(&self, _ctx: &Context) -> Option<String> {
        Some(escape_text(&self.text))
    }

    fn default_attrs(&self) -> Attrs {
        Attrs::new().with("stroke", "none").with("fill", defaults::STROKE)
    }

    fn aspect(&self) -> Option<f64> {
        self.glyph.and_then(|g| g.aspect())
    }
}

/// An external raster or vector image stretched over its box.
#[derive(Debug, Clone)]
pub struct ImageShape {
    pub href: String,
    pub aspect: Option<f64>,
}

impl Shape for ImageShape {
    fn tag(&self) -> &'static str {
        "image"
    }

    fn props(&self, ctx: &Context) -> Attrs {
        let r = ctx.prect;
        Attrs::new()
            .with("href", self.href.as_str())
            .with("x", r.x0)
            .with("y", r.y0)
            .with("width", r.width())
            .with("height", r.height())
            .with("preserveAspectRatio", "none")
    }

    fn aspect(&self) -> Option<f64> {
        self.aspect
    }
}

/// Kinds of verbatim meta element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Style,
    Defs,
    Filter,
}

/// Verbatim `<style>`, `<defs>` or `<filter>` content.
#[derive(Debug, Clone)]
pub struct MetaShape {
    pub kind: MetaKind,
    pub content: String,
}

impl Shape for MetaShape {
    fn tag(&self) -> &'static str {
        match self.kind {
            MetaKind::Style => "style",
            MetaKind::Defs => "defs",
            MetaKind::Filter => "filter",
        }
    }

    fn props(&self, _ctx: &Context) -> Attrs {
        Attrs::new()
    }

    fn inner(&self, _ctx: &Context) -> Option<String> {
        Some(self.content.clone())
    }

    fn is_meta(&self) -> bool {
        true
    }
}

/// All leaf shapes, dispatched statically.
#[enum_dispatch(Shape)]
#[derive(Debug, Clone)]
pub enum Primitive {
    Spacer(Spacer),
    Rect(RectShape),
    Ellipse(EllipseShape),
    Line(LineShape),
    Poly(PolyShape),
    Path(PathShape),
    Text(TextShape),
    Image(ImageShape),
    Meta(MetaShape),
}

// ============================================================================
// Tests
// ============================================================================
