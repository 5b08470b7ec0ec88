//! SVG rendering of a finished scene
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes and settings
//! - `geometry`: Rect algebra and rotation-aware fitting
//! - `context`: The coordinate-to-pixel mapping passed down the tree
//! - `shapes`: Leaf shape types
//! - `svg`: Attribute maps and element emission
//!
//! Rendering never mutates the scene. The whole document is built in memory
//! and only returned once every node has rendered, so a failing tree produces
//! no output at all.

pub mod context;
pub mod defaults;
pub mod geometry;
pub mod shapes;
pub mod svg;

use glam::{DVec2, dvec2};

pub use context::Context;

use crate::errors::{LayoutError, Result};
use crate::log::{debug, trace};
use crate::scene::{Element, NodeId, Scene};
use crate::types::{Extent, Rect, check_positive};
use shapes::Shape;
use svg::{Attrs, format_num, write_element};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Output settings for [`Scene::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// A width (height follows the root aspect) or an explicit width and height.
    pub size: Extent,
    /// Decimal places kept in numeric attributes.
    pub prec: usize,
    /// Tag elements with their node kind and pixel rect.
    pub debug: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            size: Extent::Scalar(defaults::SIZE),
            prec: defaults::PRECISION,
            debug: false,
        }
    }
}

impl RenderOptions {
    pub fn with_size(mut self, size: impl Into<Extent>) -> Self {
        self.size = size.into();
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
}

/// Pixel size of the document for a root of the given aspect.
///
/// A single width is divided by the aspect to get the height; a square
/// document is produced when the root has no aspect.
pub fn root_size(size: Extent, aspect: Option<f64>) -> Result<DVec2> {
    let size = match size {
        Extent::Scalar(w) => dvec2(w, w / aspect.unwrap_or(1.0)),
        Extent::Pair(w, h) => dvec2(w, h),
        Extent::Quad(..) => {
            return Err(LayoutError::bounds("document size takes one or two values"));
        }
    };
    check_positive(size.x).map_err(|e| LayoutError::number("width", e))?;
    check_positive(size.y).map_err(|e| LayoutError::number("height", e))?;
    Ok(size)
}

impl Scene {
    /// Render `root` as a complete SVG document.
    pub fn render(&self, root: NodeId, options: &RenderOptions) -> Result<String> {
        let entry = self.get(root)?;
        let size = root_size(options.size, entry.spec.aspect)?;
        debug!(width = size.x, height = size.y, "render");

        let ctx = Context::new(Rect::new(0.0, 0.0, size.x, size.y))
            .with_precision(options.prec)
            .with_debug(options.debug);
        let mut body = String::new();
        self.render_node(root, &ctx.map(&entry.spec), &mut body)?;

        let (w, h) = (format_num(size.x, options.prec), format_num(size.y, options.prec));
        let attrs = Attrs::new()
            .with("xmlns", SVG_NS)
            .with("width", w.as_str())
            .with("height", h.as_str())
            .with("viewBox", format!("0 0 {w} {h}"));
        let mut out = String::new();
        write_element(&mut out, "svg", &attrs, Some(&body), options.prec);
        Ok(out)
    }

    /// Render one node into `out`, given the context its parent mapped it to.
    pub fn render_node(&self, id: NodeId, ctx: &Context, out: &mut String) -> Result<()> {
        let entry = self.get(id)?;
        trace!(node = %id, kind = entry.kind, prect = %ctx.prect, "render node");

        let mut attrs = match &entry.element {
            Element::Shape(shape) if shape.is_meta() => {
                let inner = shape.inner(ctx);
                write_element(out, shape.tag(), &entry.attrs, inner.as_deref(), ctx.prec);
                return Ok(());
            }
            Element::Shape(shape) if !shape.is_visible() => return Ok(()),
            Element::Shape(shape) => shape
                .default_attrs()
                .merge(&entry.attrs)
                .merge(&shape.props(ctx)),
            Element::Group(_) => entry.attrs.clone(),
        };
        attrs.set_opt("transform", ctx.transform());
        if ctx.debug {
            attrs.set("data_node", entry.kind);
            let r = ctx.prect;
            let prect = [r.x0, r.y0, r.x1, r.y1]
                .map(|v| format_num(v, ctx.prec))
                .join(",");
            attrs.set("data_prect", prect);
        }

        match &entry.element {
            Element::Shape(shape) => {
                let inner = shape.inner(ctx);
                write_element(out, shape.tag(), &attrs, inner.as_deref(), ctx.prec);
            }
            Element::Group(group) => {
                // children rotate on their own; the group's rotation is its transform
                let base = Context {
                    rotation: None,
                    ..*ctx
                };
                let mut inner = String::new();
                for &child in &group.children {
                    let child_ctx = base.map(&self.get(child)?.spec);
                    self.render_node(child, &child_ctx, &mut inner)
                        .map_err(|e| e.within(entry.kind))?;
                }
                write_element(out, "g", &attrs, Some(&inner), ctx.prec);
            }
        }
        Ok(())
    }
}
