//! Node arena and group aspect inference.
//!
//! Nodes live in a [`Scene`] and are addressed by [`NodeId`]. Construction is
//! the first pass: every node computes its aspect bottom-up as it is created,
//! and a parent writes each child's placement exactly once when it adopts it.
//! Rendering (see [`crate::render`]) is a second, read-only pass.

use std::fmt;
use std::sync::Arc;

use crate::errors::{LayoutError, Result};
use crate::log::debug;
use crate::render::context::Context;
use crate::render::geometry::merge_rects;
use crate::render::shapes::{
    EllipseShape, ImageShape, LineKind, LineShape, MetaKind, MetaShape, PathCmd, PathShape,
    PolyShape, Primitive, RectShape, Shape, Spacer, TextShape,
};
use crate::render::svg::Attrs;
use crate::render::defaults;
use crate::spec::{Align, Spec};
use crate::text::{FontSpec, ProportionalMeasurer, TextMeasurer};
use crate::types::{Extent, Point, Rect, check_finite, check_positive};

/// Index of a node in its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A composite node's children in paint order.
#[derive(Debug, Clone, Default)]
pub struct GroupData {
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub enum Element {
    Shape(Primitive),
    Group(GroupData),
}

#[derive(Debug, Clone)]
pub struct NodeEntry {
    /// Node kind, used in diagnostics and debug output.
    pub kind: &'static str,
    pub element: Element,
    /// Rendering attributes; never read by layout.
    pub attrs: Attrs,
    /// Placement, with `aspect` holding the resolved aspect of the node.
    pub spec: Spec,
    /// Extent of the node's own positions in data coordinates.
    pub bounds: Option<Rect>,
    pub adopted: bool,
}

/// What a parent writes into a child's spec when adopting it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    pub rect: Option<Rect>,
    pub align: Option<Align>,
}

impl Placement {
    /// Keep the child's own placement.
    pub const KEEP: Placement = Placement {
        rect: None,
        align: None,
    };

    pub fn at(rect: Rect) -> Self {
        Placement {
            rect: Some(rect),
            align: None,
        }
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    fn apply(self, spec: &mut Spec) {
        if let Some(rect) = self.rect {
            spec.rect = Some(rect);
        }
        if let Some(align) = self.align {
            spec.align = align;
        }
    }
}

/// How a composite decides its aspect when the spec does not fix one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum AspectRule {
    /// From the union of the children's occupied rects.
    Infer,
    /// Computed by a layout solver; `None` leaves the node unconstrained.
    Fixed(Option<f64>),
}

/// Arena of nodes plus the text-metrics collaborator used to size text.
pub struct Scene {
    nodes: Vec<NodeEntry>,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene").field("nodes", &self.nodes.len()).finish()
    }
}

pub(crate) fn validate_spec(spec: &Spec) -> Result<()> {
    if let Some(aspect) = spec.aspect {
        check_positive(aspect).map_err(|e| LayoutError::number("aspect", e))?;
    }
    check_finite(spec.rotate).map_err(|e| LayoutError::number("rotate", e))?;
    for (what, rect) in [("rect", spec.rect), ("coord", spec.coord)] {
        if let Some(r) = rect {
            if !r.is_finite() {
                return Err(LayoutError::bounds(format!("{what} {r} is not finite")));
            }
        }
    }
    if let Some(c) = spec.coord {
        if c.dx() == 0.0 || c.dy() == 0.0 {
            return Err(LayoutError::bounds(format!("coord {c} has zero extent")));
        }
    }
    Ok(())
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            nodes: Vec::new(),
            measurer: Arc::new(ProportionalMeasurer),
        }
    }

    /// A scene that sizes text with `measurer`.
    pub fn with_measurer(measurer: impl TextMeasurer + Send + Sync + 'static) -> Self {
        Scene {
            nodes: Vec::new(),
            measurer: Arc::new(measurer),
        }
    }

    pub fn measurer(&self) -> &(dyn TextMeasurer + Send + Sync) {
        self.measurer.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Result<&NodeEntry> {
        self.nodes.get(id.0).ok_or(LayoutError::UnknownNode { id })
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry> {
        self.nodes.get_mut(id.0).ok_or(LayoutError::UnknownNode { id })
    }

    /// Children of a composite; empty for a leaf.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(match &self.get(id)?.element {
            Element::Group(group) => &group.children,
            Element::Shape(_) => &[],
        })
    }

    /// Resolved aspect of a node.
    pub fn aspect(&self, id: NodeId) -> Result<Option<f64>> {
        Ok(self.get(id)?.spec.aspect)
    }

    pub fn spec(&self, id: NodeId) -> Result<&Spec> {
        Ok(&self.get(id)?.spec)
    }

    /// Extent of the node in data coordinates: its own positions, or the
    /// rect it was placed at.
    pub fn data_bounds(&self, id: NodeId) -> Result<Option<Rect>> {
        let entry = self.get(id)?;
        Ok(entry.bounds.or(entry.spec.rect))
    }

    /// Overlay rendering attributes on a node and hand it back.
    pub fn styled(&mut self, id: NodeId, attrs: Attrs) -> Result<NodeId> {
        let entry = self.get_mut(id)?;
        entry.attrs = std::mem::take(&mut entry.attrs).merge(&attrs);
        Ok(id)
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> Result<&mut Attrs> {
        Ok(&mut self.get_mut(id)?.attrs)
    }

    fn push(&mut self, entry: NodeEntry) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(entry);
        id
    }

    // ------------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------------

    /// Add a leaf shape. The spec's aspect wins over the shape's own.
    pub fn shape(&mut self, kind: &'static str, shape: impl Into<Primitive>, spec: Spec) -> Result<NodeId> {
        validate_spec(&spec).map_err(|e| e.within(kind))?;
        let shape = shape.into();
        let mut spec = spec;
        spec.aspect = spec.aspect.or_else(|| shape.aspect());
        let bounds = shape.data_bounds();
        Ok(self.push(NodeEntry {
            kind,
            element: Element::Shape(shape),
            attrs: Attrs::new(),
            spec,
            bounds,
            adopted: false,
        }))
    }

    pub fn spacer(&mut self, spec: Spec) -> Result<NodeId> {
        self.shape("spacer", Spacer, spec)
    }

    pub fn rect(&mut self, spec: Spec) -> Result<NodeId> {
        self.shape("rect", RectShape::default(), spec)
    }

    /// A rect with corners rounded by a fraction of its size.
    pub fn rounded_rect(&mut self, rounded: impl Into<Extent>, spec: Spec) -> Result<NodeId> {
        let rounded = rounded
            .into()
            .try_finite()
            .map_err(|e| LayoutError::number("rounded", e))?;
        self.shape(
            "rect",
            RectShape {
                rounded: Some(rounded),
            },
            spec,
        )
    }

    pub fn square(&mut self, spec: Spec) -> Result<NodeId> {
        self.shape("square", RectShape::default(), spec.with_aspect(Some(1.0)))
    }

    pub fn ellipse(&mut self, spec: Spec) -> Result<NodeId> {
        self.shape("ellipse", EllipseShape, spec)
    }

    pub fn circle(&mut self, spec: Spec) -> Result<NodeId> {
        self.shape("circle", EllipseShape, spec.with_aspect(Some(1.0)))
    }

    /// A filled circle.
    pub fn dot(&mut self, spec: Spec) -> Result<NodeId> {
        let id = self.shape("dot", EllipseShape, spec.with_aspect(Some(1.0)))?;
        self.styled(id, Attrs::new().with("fill", defaults::STROKE).with("stroke", "none"))
    }

    fn line_kind(&mut self, kind: &'static str, line: LineKind, spec: Spec) -> Result<NodeId> {
        let finite = match line {
            LineKind::Segment(a, b) => a.is_finite() && b.is_finite(),
            LineKind::Horizontal(v) | LineKind::Vertical(v) => v.is_finite(),
        };
        if !finite {
            return Err(LayoutError::bounds("line position is not finite").within(kind));
        }
        self.shape(kind, LineShape { kind: line }, spec)
    }

    /// A segment between two points in the inherited coordinates.
    pub fn line(&mut self, a: Point, b: Point, spec: Spec) -> Result<NodeId> {
        self.line_kind("line", LineKind::Segment(a, b), spec)
    }

    /// A line across the whole coordinate width at height `y`.
    pub fn hline(&mut self, y: f64, spec: Spec) -> Result<NodeId> {
        self.line_kind("hline", LineKind::Horizontal(y), spec)
    }

    /// A line across the whole coordinate height at `x`.
    pub fn vline(&mut self, x: f64, spec: Spec) -> Result<NodeId> {
        self.line_kind("vline", LineKind::Vertical(x), spec)
    }

    fn poly(&mut self, kind: &'static str, points: Vec<Point>, closed: bool, spec: Spec) -> Result<NodeId> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(LayoutError::bounds("point is not finite").within(kind));
        }
        self.shape(kind, PolyShape { points, closed }, spec)
    }

    pub fn polyline(&mut self, points: Vec<Point>, spec: Spec) -> Result<NodeId> {
        self.poly("polyline", points, false, spec)
    }

    pub fn polygon(&mut self, points: Vec<Point>, spec: Spec) -> Result<NodeId> {
        self.poly("polygon", points, true, spec)
    }

    pub fn path(&mut self, commands: Vec<PathCmd>, spec: Spec) -> Result<NodeId> {
        self.shape("path", PathShape { commands }, spec)
    }

    /// A single line of text; its aspect comes from the scene's measurer.
    pub fn text(&mut self, text: impl Into<String>, font: FontSpec, spec: Spec) -> Result<NodeId> {
        check_positive(font.size)
            .map_err(|e| LayoutError::number("font size", e).within("text"))?;
        let text = text.into();
        let glyph = self.measurer.measure(&text, &font);
        if glyph.is_none() {
            debug!(text = %text, "text could not be measured");
        }
        self.shape("text", TextShape { text, font, glyph }, spec)
    }

    pub fn image(&mut self, href: impl Into<String>, aspect: Option<f64>, spec: Spec) -> Result<NodeId> {
        self.shape(
            "image",
            ImageShape {
                href: href.into(),
                aspect,
            },
            spec,
        )
    }

    /// Verbatim `<style>`, `<defs>` or `<filter>` content.
    pub fn meta(&mut self, kind: MetaKind, content: impl Into<String>) -> Result<NodeId> {
        self.shape(
            "meta",
            MetaShape {
                kind,
                content: content.into(),
            },
            Spec::default(),
        )
    }

    // ------------------------------------------------------------------------
    // Composites
    // ------------------------------------------------------------------------

    /// A plain group. Unless `spec` fixes an aspect it is inferred from the
    /// children as laid out on their own.
    ///
    /// A group without a `coord` whose children carry positions (a rect, or
    /// data points) is transparent instead: it takes no aspect and its
    /// children land exactly where they would without it, e.g. inside a Graph.
    pub fn group(&mut self, children: Vec<NodeId>, spec: Spec) -> Result<NodeId> {
        let children = children.into_iter().map(|c| (c, Placement::KEEP)).collect();
        self.composite("group", children, spec, AspectRule::Infer)
    }

    /// Adopt `children` with their placements and add the composite node.
    ///
    /// Nothing is adopted unless every child is valid and unowned.
    pub(crate) fn composite(
        &mut self,
        kind: &'static str,
        children: Vec<(NodeId, Placement)>,
        spec: Spec,
        rule: AspectRule,
    ) -> Result<NodeId> {
        validate_spec(&spec).map_err(|e| e.within(kind))?;
        let mut seen = vec![false; self.nodes.len()];
        for &(id, _) in &children {
            let entry = self.get(id).map_err(|e| e.within(kind))?;
            if entry.adopted || std::mem::replace(&mut seen[id.0], true) {
                return Err(LayoutError::AlreadyAdopted { id }.within(kind));
            }
        }

        let mut ids = Vec::with_capacity(children.len());
        for (id, placement) in children {
            let entry = &mut self.nodes[id.0];
            placement.apply(&mut entry.spec);
            entry.adopted = true;
            ids.push(id);
        }

        let coord = spec.coord;
        // a group that keeps its parent's coordinates reports its children's data
        let bounds = match coord {
            None => merge_rects(ids.iter().filter_map(|id| self.data_bounds(*id).ok().flatten())),
            Some(_) => None,
        };
        let mut spec = spec;
        if spec.aspect.is_none() {
            spec.aspect = match rule {
                // positions in the parent's coordinates must fill the parent's box
                AspectRule::Infer if bounds.is_some() => None,
                AspectRule::Infer => self.infer_aspect(&ids, coord.unwrap_or(Rect::UNIT)),
                AspectRule::Fixed(aspect) => aspect,
            };
        }
        debug!(kind, children = ids.len(), aspect = ?spec.aspect, "composite");

        Ok(self.push(NodeEntry {
            kind,
            element: Element::Group(GroupData { children: ids }),
            attrs: Attrs::new(),
            spec,
            bounds,
            adopted: false,
        }))
    }

    /// Aspect of the union of the children's occupied rects, each child
    /// mapped alone into the unit square spanning `coord`.
    pub fn infer_aspect(&self, children: &[NodeId], coord: Rect) -> Option<f64> {
        self.children_extent(children, coord).and_then(|r| r.aspect())
    }

    /// Union of the children's occupied rects in a neutral context.
    pub fn children_extent(&self, children: &[NodeId], coord: Rect) -> Option<Rect> {
        let neutral = Context::new(Rect::UNIT).with_coord(coord);
        merge_rects(children.iter().filter_map(|id| {
            let entry = self.nodes.get(id.0)?;
            if let Element::Shape(shape) = &entry.element {
                if shape.is_meta() {
                    return None;
                }
            }
            let occupied = neutral.map(&entry.spec).occupied();
            occupied.is_finite().then_some(occupied)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::svg::AttrValue;
    use glam::dvec2;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn empty_group_has_no_aspect() {
        let mut scene = Scene::new();
        let g = scene.group(vec![], Spec::default()).unwrap();
        assert_eq!(scene.aspect(g).unwrap(), None);

        let g = scene.group(vec![], Spec::new().with_aspect(Some(3.0))).unwrap();
        assert_eq!(scene.aspect(g).unwrap(), Some(3.0));
    }

    #[test]
    fn group_infers_from_child_rects() {
        let mut scene = Scene::new();
        let a = scene.rect(Spec::at(Rect::new(0.0, 0.0, 0.5, 0.5))).unwrap();
        let b = scene.rect(Spec::at(Rect::new(0.5, 0.0, 1.0, 0.5))).unwrap();
        let coord = Spec::new().with_coord(Rect::UNIT);
        let g = scene.group(vec![a, b], coord).unwrap();
        assert_close(scene.aspect(g).unwrap().unwrap(), 2.0);
    }

    #[test]
    fn group_of_positioned_children_is_transparent() {
        let mut scene = Scene::new();
        let a = scene.line(dvec2(0.0, 0.0), dvec2(3.0, 0.0), Spec::default()).unwrap();
        let b = scene.line(dvec2(0.0, 1.0), dvec2(3.0, 1.0), Spec::default()).unwrap();
        let g = scene.group(vec![a, b], Spec::default()).unwrap();
        assert_eq!(scene.aspect(g).unwrap(), None);
        assert_eq!(scene.data_bounds(g).unwrap(), Some(Rect::new(0.0, 0.0, 3.0, 1.0)));

        // an explicit aspect still wins
        let c = scene.line(dvec2(0.0, 0.0), dvec2(1.0, 1.0), Spec::default()).unwrap();
        let g = scene.group(vec![c], Spec::new().with_aspect(Some(2.0))).unwrap();
        assert_eq!(scene.aspect(g).unwrap(), Some(2.0));
    }

    #[test]
    fn group_inference_respects_child_aspect() {
        let mut scene = Scene::new();
        let r = scene.rect(Spec::new().with_aspect(Some(2.0))).unwrap();
        let g = scene.group(vec![r], Spec::default()).unwrap();
        assert_close(scene.aspect(g).unwrap().unwrap(), 2.0);
    }

    #[test]
    fn rotated_child_widens_inferred_aspect() {
        let mut scene = Scene::new();
        let r = scene
            .rect(Spec::new().with_aspect(Some(0.5)).with_rotate(90.0).with_invar(true))
            .unwrap();
        let g = scene.group(vec![r], Spec::default()).unwrap();
        assert_close(scene.aspect(g).unwrap().unwrap(), 2.0);
    }

    #[test]
    fn meta_children_do_not_affect_inference() {
        let mut scene = Scene::new();
        let m = scene.meta(MetaKind::Style, "rect { fill: red }").unwrap();
        let r = scene.rect(Spec::at(Rect::new(0.0, 0.0, 1.0, 0.25))).unwrap();
        let g = scene.group(vec![m, r], Spec::new().with_coord(Rect::UNIT)).unwrap();
        assert_close(scene.aspect(g).unwrap().unwrap(), 4.0);
    }

    #[test]
    fn adopting_twice_fails() {
        let mut scene = Scene::new();
        let r = scene.rect(Spec::default()).unwrap();
        scene.group(vec![r], Spec::default()).unwrap();
        let err = scene.group(vec![r], Spec::default()).unwrap_err();
        let LayoutError::InNode { node, source } = err else {
            panic!("expected context");
        };
        assert_eq!(node, "group");
        assert!(matches!(*source, LayoutError::AlreadyAdopted { id } if id == r));
    }

    #[test]
    fn duplicate_child_in_one_list_fails_without_adopting() {
        let mut scene = Scene::new();
        let r = scene.rect(Spec::default()).unwrap();
        assert!(scene.group(vec![r, r], Spec::default()).is_err());
        assert!(!scene.get(r).unwrap().adopted);
    }

    #[test]
    fn unknown_node_is_reported() {
        let mut scene = Scene::new();
        let mut other = Scene::new();
        for _ in 0..3 {
            other.spacer(Spec::default()).unwrap();
        }
        let foreign = other.spacer(Spec::default()).unwrap();
        assert!(matches!(
            scene.group(vec![foreign], Spec::default()),
            Err(LayoutError::InNode { .. })
        ));
        assert!(matches!(scene.get(foreign), Err(LayoutError::UnknownNode { .. })));
    }

    #[test]
    fn invalid_spec_is_rejected() {
        let mut scene = Scene::new();
        assert!(scene.rect(Spec::new().with_aspect(Some(0.0))).is_err());
        assert!(scene.rect(Spec::new().with_rotate(f64::NAN)).is_err());
        assert!(scene
            .group(vec![], Spec::new().with_coord(Rect::new(0.0, 0.0, 0.0, 1.0)))
            .is_err());
    }

    #[test]
    fn plain_group_reports_child_data_bounds() {
        let mut scene = Scene::new();
        let l = scene.line(dvec2(0.0, 0.0), dvec2(2.0, 1.0), Spec::default()).unwrap();
        let r = scene.rect(Spec::at(Rect::new(3.0, 3.0, 4.0, 5.0))).unwrap();
        let g = scene.group(vec![l, r], Spec::default()).unwrap();
        assert_eq!(scene.data_bounds(g).unwrap(), Some(Rect::new(0.0, 0.0, 4.0, 5.0)));
    }

    #[test]
    fn text_takes_measured_aspect() {
        let mut scene = Scene::new();
        let t = scene.text("hello", FontSpec::default(), Spec::default()).unwrap();
        assert!(scene.aspect(t).unwrap().unwrap() > 1.0);

        let mut blind = Scene::with_measurer(crate::text::NullMeasurer);
        let t = blind.text("hello", FontSpec::default(), Spec::default()).unwrap();
        assert_eq!(blind.aspect(t).unwrap(), None);
    }

    #[test]
    fn styled_overlays_attributes() {
        let mut scene = Scene::new();
        let d = scene.dot(Spec::default()).unwrap();
        scene.styled(d, Attrs::new().with("fill", "red")).unwrap();
        let attrs = &scene.get(d).unwrap().attrs;
        assert_eq!(attrs.get("fill"), Some(&AttrValue::from("red")));
        assert_eq!(attrs.get("stroke"), Some(&AttrValue::from("none")));
    }
}
