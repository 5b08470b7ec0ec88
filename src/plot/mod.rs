//! Data plots
//!
//! This module is organized into submodules:
//! - `graph`: A data coordinate system inferred from the children
//! - `axis`: Ticks, scales with labels, and mesh lines
//!
//! A plot wraps its children in a graph and surrounds it with axes, mesh
//! lines and titles. Everything is laid out in plot units, where the graph
//! box is `[0, 0, A, 1]`; the plot's own aspect is that of the union of all
//! the pieces.

pub mod axis;
pub mod graph;

pub use axis::{AxisBox, AxisStyle, Ticks, linspace};
pub use graph::GraphOptions;

use crate::errors::{LayoutError, Result};
use crate::log::debug;
use crate::layout::attach_rect;
use crate::render::defaults;
use crate::render::geometry::merge_rects;
use crate::scene::{AspectRule, NodeId, Placement, Scene};
use crate::spec::{Side, Spec};
use crate::text::FontSpec;
use crate::types::{Extent, Rect, check_positive};

use graph::check_range;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Horizontal data range; inferred from the children when `None`.
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xticks: Ticks,
    pub yticks: Ticks,
    /// Mesh lines on both axes, unless overridden per axis.
    pub grid: bool,
    pub xgrid: Option<bool>,
    pub ygrid: Option<bool>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub title: Option<String>,
    /// Aspect of the graph box; the domain's when `None`.
    pub aspect: Option<f64>,
    /// Room around an inferred domain, as a fraction of its range.
    pub padding: Extent,
    pub axis: AxisStyle,
    pub label_size: f64,
    pub label_offset: f64,
    pub title_size: f64,
    pub title_offset: f64,
    pub font: FontSpec,
    /// Decimal places in tick labels.
    pub prec: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            xlim: None,
            ylim: None,
            xticks: Ticks::default(),
            yticks: Ticks::default(),
            grid: false,
            xgrid: None,
            ygrid: None,
            xlabel: None,
            ylabel: None,
            title: None,
            aspect: None,
            padding: Extent::Scalar(0.0),
            axis: AxisStyle::default(),
            label_size: defaults::AXIS_LABEL_SIZE,
            label_offset: defaults::AXIS_LABEL_OFFSET,
            title_size: defaults::TITLE_SIZE,
            title_offset: defaults::TITLE_OFFSET,
            font: FontSpec::default(),
            prec: defaults::PRECISION,
        }
    }
}

/// Where the pieces of a plot went, in plot units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    /// Data domain, y up.
    pub domain: Rect,
    /// The graph box `[0, 0, A, 1]`.
    pub graph: Rect,
    /// Union of everything drawn.
    pub extent: Rect,
}

impl Scene {
    /// Plot `children` with axes and labels.
    pub fn plot(&mut self, children: Vec<NodeId>, options: &PlotOptions, spec: Spec) -> Result<NodeId> {
        self.plot_with_layout(children, options, spec).map(|(id, _)| id)
    }

    /// [`Scene::plot`], also returning the solved layout.
    pub fn plot_with_layout(
        &mut self,
        children: Vec<NodeId>,
        options: &PlotOptions,
        spec: Spec,
    ) -> Result<(NodeId, PlotLayout)> {
        let wrap = |e: LayoutError| e.within("plot");
        // both come from the decorations
        if let Some(aspect) = spec.aspect {
            return Err(wrap(LayoutError::bounds(format!(
                "plot aspect {aspect} is set by its decorations; use PlotOptions::aspect for the graph box"
            ))));
        }
        if spec.coord.is_some() {
            return Err(wrap(LayoutError::bounds("plot coordinates are set by its decorations")));
        }

        let inferred = GraphOptions {
            padding: options.padding,
            ..GraphOptions::default()
        };
        let mut domain = self.graph_domain(&children, &inferred).map_err(wrap)?;
        if let Some(xlim) = options.xlim {
            let (x0, x1) = check_range("xlim", xlim).map_err(wrap)?;
            domain = Rect::new(x0, domain.y0, x1, domain.y1);
        }
        if let Some(ylim) = options.ylim {
            let (y0, y1) = check_range("ylim", ylim).map_err(wrap)?;
            domain = Rect::new(domain.x0, y0, domain.x1, y1);
        }
        let xrange = (domain.x0, domain.x1);
        let yrange = (domain.y0, domain.y1);

        let aspect = match options.aspect {
            Some(a) => check_positive(a).map_err(|e| wrap(LayoutError::number("plot aspect", e)))?,
            None => domain
                .aspect()
                .ok_or_else(|| wrap(LayoutError::bounds(format!("domain {domain} is degenerate"))))?,
        };
        let graph_box = Rect::new(0.0, 0.0, aspect, 1.0);

        let xticks = options.xticks.resolve(xrange, options.prec).map_err(|e| wrap(e.within("xticks")))?;
        let yticks = options.yticks.resolve(yrange, options.prec).map_err(|e| wrap(e.within("yticks")))?;

        // mesh goes first so the data draws over it
        let mut inner = Vec::new();
        if options.xgrid.unwrap_or(options.grid) {
            let xs: Vec<f64> = xticks.iter().map(|(v, _)| *v).collect();
            inner.extend(self.mesh(&xs, true).map_err(wrap)?);
        }
        if options.ygrid.unwrap_or(options.grid) {
            let ys: Vec<f64> = yticks.iter().map(|(v, _)| *v).collect();
            inner.extend(self.mesh(&ys, false).map_err(wrap)?);
        }
        inner.extend(children);

        let graph_options = GraphOptions {
            coord: Some(domain),
            ..GraphOptions::default()
        };
        let graph = self
            .graph(inner, &graph_options, Spec::at(graph_box).with_aspect(Some(aspect)))
            .map_err(wrap)?;

        let xaxis = self.x_axis(xrange, &xticks, aspect, &options.axis).map_err(wrap)?;
        let yaxis = self.y_axis(yrange, &yticks, &options.axis).map_err(wrap)?;
        let mut extent = merge_rects([graph_box, xaxis.extent, yaxis.extent])
            .unwrap_or(graph_box);
        let mut parts = vec![graph, xaxis.node, yaxis.node];

        let titles = [
            (&options.xlabel, Side::Bottom, options.label_offset, options.label_size, 0.0),
            (&options.ylabel, Side::Left, options.label_offset, options.label_size, -90.0),
            (&options.title, Side::Top, options.title_offset, options.title_size, 0.0),
        ];
        for (text, side, offset, size, rotate) in titles {
            let Some(text) = text else { continue };
            let rect = attach_rect(extent, side, offset, size);
            let spec = Spec::at(rect).with_rotate(rotate);
            parts.push(self.text(text.clone(), options.font.clone(), spec).map_err(wrap)?);
            extent = merge_rects([extent, rect]).unwrap_or(extent);
        }
        debug!(domain = %domain, extent = %extent, "plot");

        let spec = Spec {
            coord: Some(extent),
            aspect: None,
            ..spec
        };
        let parts = parts.into_iter().map(|p| (p, Placement::KEEP)).collect();
        let id = self.composite("plot", parts, spec, AspectRule::Fixed(extent.aspect()))?;
        Ok((
            id,
            PlotLayout {
                domain,
                graph: graph_box,
                extent,
            },
        ))
    }
}
