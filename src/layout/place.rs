//! Explicit placement: Place, Anchor, Attach and Points.

use glam::DVec2;

use crate::errors::{LayoutError, Result};
use crate::render::defaults;
use crate::render::geometry::radial_rect;
use crate::scene::{AspectRule, NodeId, Placement, Scene};
use crate::spec::{Align, Side, Spec};
use crate::types::{Extent, NumericError, Point, Rect, check_finite, check_positive};

use super::{pinned, single_child};

/// Rect flush with `side` of the unit box, `size` deep.
pub fn anchor_rect(side: Side, size: f64) -> Rect {
    match side {
        Side::Left => Rect::new(0.0, 0.0, size, 1.0),
        Side::Right => Rect::new(1.0 - size, 0.0, 1.0, 1.0),
        Side::Top => Rect::new(0.0, 0.0, 1.0, size),
        Side::Bottom => Rect::new(0.0, 1.0 - size, 1.0, 1.0),
    }
}

/// Rect outside `base` on `side`, separated by `offset` and `size` deep,
/// spanning the whole base along the side.
pub fn attach_rect(base: Rect, side: Side, offset: f64, size: f64) -> Rect {
    let b = base.normalized();
    match side {
        Side::Left => Rect::new(b.x0 - offset - size, b.y0, b.x0 - offset, b.y1),
        Side::Right => Rect::new(b.x1 + offset, b.y0, b.x1 + offset + size, b.y1),
        Side::Top => Rect::new(b.x0, b.y0 - offset - size, b.x1, b.y0 - offset),
        Side::Bottom => Rect::new(b.x0, b.y1 + offset, b.x1, b.y1 + offset + size),
    }
}

fn opposite(side: Side) -> Side {
    match side {
        Side::Left => Side::Right,
        Side::Right => Side::Left,
        Side::Top => Side::Bottom,
        Side::Bottom => Side::Top,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachOptions {
    pub side: Side,
    /// Gap between the box and the attached child.
    pub offset: f64,
    /// Depth of the attached child.
    pub size: f64,
}

impl Default for AttachOptions {
    fn default() -> Self {
        AttachOptions {
            side: Side::Bottom,
            offset: 0.0,
            size: 1.0,
        }
    }
}

/// How a set of points is drawn.
pub struct PointsOptions {
    /// Radius used where a point has none of its own.
    pub radius: f64,
    /// Builds the marker for each point; `None` draws filled dots.
    pub shape: Option<Box<dyn Fn(&mut Scene) -> Result<NodeId>>>,
}

impl Default for PointsOptions {
    fn default() -> Self {
        PointsOptions {
            radius: defaults::POINT_RADIUS,
            shape: None,
        }
    }
}

impl std::fmt::Debug for PointsOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointsOptions")
            .field("radius", &self.radius)
            .field("shape", &self.shape.as_ref().map(|_| ".."))
            .finish()
    }
}

fn fraction(what: &'static str, v: f64) -> Result<f64> {
    let v = check_finite(v).map_err(|e| LayoutError::number(what, e))?;
    if v < 0.0 {
        return Err(LayoutError::number(what, NumericError::Negative));
    }
    Ok(v)
}

impl Scene {
    /// Center one child at `pos` with half-size `radius`, in the inherited
    /// coordinates.
    pub fn place(&mut self, children: Vec<NodeId>, pos: Point, radius: impl Into<Extent>, spec: Spec) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("place");
        let child = single_child("place", &children).map_err(wrap)?;
        let radius = radius
            .into()
            .try_finite()
            .map_err(|e| LayoutError::number("radius", e).within("place"))?
            .pair();
        if !pos.is_finite() {
            return Err(LayoutError::bounds("position is not finite").within("place"));
        }
        let rect = radial_rect(pos, radius);
        self.composite("place", vec![(child, Placement::at(rect))], spec, AspectRule::Fixed(None))
    }

    /// Pin one child flush to `side`, `size` deep (the whole box when `None`).
    pub fn anchor(&mut self, children: Vec<NodeId>, side: Side, size: Option<f64>, spec: Spec) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("anchor");
        let child = single_child("anchor", &children).map_err(wrap)?;
        let size = fraction("anchor size", size.unwrap_or(1.0)).map_err(wrap)?;
        let placement = Placement::at(anchor_rect(side, size)).with_align(Align::toward(side));
        self.composite("anchor", vec![(child, placement)], pinned(spec), AspectRule::Fixed(None))
    }

    /// Put one child outside the box, hugging the given side.
    pub fn attach(&mut self, children: Vec<NodeId>, options: &AttachOptions, spec: Spec) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("attach");
        let child = single_child("attach", &children).map_err(wrap)?;
        let offset = fraction("attach offset", options.offset).map_err(wrap)?;
        let size = fraction("attach size", options.size).map_err(wrap)?;
        let rect = attach_rect(Rect::UNIT, options.side, offset, size);
        let placement = Placement::at(rect).with_align(Align::toward(opposite(options.side)));
        self.composite("attach", vec![(child, placement)], pinned(spec), AspectRule::Fixed(None))
    }

    /// One marker per point, each centered on it. A point may carry its own
    /// radius.
    pub fn points(&mut self, points: &[(Point, Option<f64>)], options: &PointsOptions, spec: Spec) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("points");
        check_positive(options.radius).map_err(|e| wrap(LayoutError::number("radius", e)))?;

        let mut children = Vec::with_capacity(points.len());
        for &(pos, radius) in points {
            if !pos.is_finite() {
                return Err(wrap(LayoutError::bounds("point is not finite")));
            }
            let radius = match radius {
                Some(r) => check_positive(r).map_err(|e| wrap(LayoutError::number("radius", e)))?,
                None => options.radius,
            };
            let marker = match &options.shape {
                Some(make) => make(self).map_err(wrap)?,
                None => self.dot(Spec::default())?,
            };
            children.push((marker, Placement::at(radial_rect(pos, DVec2::splat(radius)))));
        }
        self.composite("points", children, spec, AspectRule::Fixed(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn anchor_rect_is_flush() {
        assert_eq!(anchor_rect(Side::Left, 0.25), Rect::new(0.0, 0.0, 0.25, 1.0));
        assert_eq!(anchor_rect(Side::Bottom, 0.25), Rect::new(0.0, 0.75, 1.0, 1.0));
    }

    #[test]
    fn attach_rect_sits_outside() {
        let base = Rect::new(0.0, 0.0, 2.0, 1.0);
        assert_eq!(attach_rect(base, Side::Bottom, 0.1, 0.2), Rect::new(0.0, 1.1, 2.0, 1.3));
        assert_eq!(attach_rect(base, Side::Left, 0.5, 0.5), Rect::new(-1.0, 0.0, -0.5, 1.0));
        assert_eq!(attach_rect(base, Side::Top, 0.0, 1.0), Rect::new(0.0, -1.0, 2.0, 0.0));
        assert_eq!(attach_rect(base, Side::Right, 0.0, 1.0), Rect::new(2.0, 0.0, 3.0, 1.0));
    }

    #[test]
    fn place_centers_on_position() {
        let mut scene = Scene::new();
        let c = scene.circle(Spec::default()).unwrap();
        let p = scene.place(vec![c], dvec2(0.5, 0.25), (0.1, 0.2), Spec::default()).unwrap();
        let rect = scene.spec(c).unwrap().rect.unwrap();
        assert!((rect.x0 - 0.4).abs() < 1e-12 && (rect.y1 - 0.45).abs() < 1e-12);
        assert_eq!(scene.aspect(p).unwrap(), None);
        assert_eq!(scene.spec(p).unwrap().coord, None);
    }

    #[test]
    fn anchor_aligns_toward_side() {
        let mut scene = Scene::new();
        let s = scene.square(Spec::default()).unwrap();
        scene.anchor(vec![s], Side::Right, Some(0.5), Spec::default()).unwrap();
        let spec = scene.spec(s).unwrap();
        assert_eq!(spec.align, Align::new(1.0, 0.5));
        assert_eq!(spec.rect, Some(Rect::new(0.5, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn attach_aligns_toward_the_box() {
        let mut scene = Scene::new();
        let t = scene.rect(Spec::new().with_aspect(Some(4.0))).unwrap();
        let options = AttachOptions {
            side: Side::Bottom,
            offset: 0.1,
            size: 0.2,
        };
        let a = scene.attach(vec![t], &options, Spec::default()).unwrap();
        let spec = scene.spec(t).unwrap();
        assert_eq!(spec.align, Align::new(0.5, 0.0));
        assert_eq!(spec.rect, Some(Rect::new(0.0, 1.1, 1.0, 1.3)));
        assert_eq!(scene.aspect(a).unwrap(), None);
    }

    #[test]
    fn single_child_nodes_reject_wrong_counts() {
        let mut scene = Scene::new();
        let a = scene.rect(Spec::default()).unwrap();
        let b = scene.rect(Spec::default()).unwrap();
        assert!(scene.anchor(vec![], Side::Left, None, Spec::default()).is_err());
        assert!(scene.attach(vec![a, b], &AttachOptions::default(), Spec::default()).is_err());
        assert!(scene.place(vec![], dvec2(0.0, 0.0), 0.1, Spec::default()).is_err());
    }

    #[test]
    fn points_build_one_marker_each() {
        let mut scene = Scene::new();
        let pts = [(dvec2(0.0, 0.0), None), (dvec2(2.0, 1.0), Some(0.5))];
        let p = scene.points(&pts, &PointsOptions::default(), Spec::default()).unwrap();
        let bounds = scene.data_bounds(p).unwrap().unwrap();
        let r = defaults::POINT_RADIUS;
        assert_eq!(bounds, Rect::new(-r, -r, 2.5, 1.5));
        assert_eq!(scene.aspect(p).unwrap(), None);
    }

    #[test]
    fn points_use_custom_marker() {
        let mut scene = Scene::new();
        let options = PointsOptions {
            shape: Some(Box::new(|scene: &mut Scene| scene.square(Spec::default()))),
            ..PointsOptions::default()
        };
        let p = scene
            .points(&[(dvec2(0.5, 0.5), None)], &options, Spec::default())
            .unwrap();
        let crate::scene::Element::Group(group) = &scene.get(p).unwrap().element else {
            panic!("points is a group");
        };
        assert_eq!(scene.get(group.children[0]).unwrap().kind, "square");
    }
}
