//! Frame: padding, margin and an optional border around one child.

use glam::DVec2;

use crate::errors::{LayoutError, Result};
use crate::log::debug;
use crate::render::defaults;
use crate::render::svg::Attrs;
use crate::scene::{AspectRule, NodeId, Placement, Scene};
use crate::spec::Spec;
use crate::types::{Extent, NumericError, Rect};

use super::{pinned, single_child};

#[derive(Debug, Clone, PartialEq)]
pub struct FrameOptions {
    /// Space between the border and the child, as fractions of the child box.
    pub padding: Extent,
    /// Space outside the border.
    pub margin: Extent,
    /// Border stroke width; `None` draws no border.
    pub border: Option<f64>,
    pub border_stroke: Option<String>,
    /// Background fill inside the border.
    pub fill: Option<String>,
    /// Corner rounding of the border.
    pub rounded: Option<Extent>,
    /// Scale padding and margin so that a scalar looks even on a non-square child.
    pub adjust: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        FrameOptions {
            padding: Extent::Scalar(0.0),
            margin: Extent::Scalar(0.0),
            border: None,
            border_stroke: None,
            fill: None,
            rounded: None,
            adjust: true,
        }
    }
}

impl FrameOptions {
    fn has_border(&self) -> bool {
        self.border.is_some() || self.fill.is_some()
    }
}

/// Solved frame geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    /// Padding per side `[left, top, right, bottom]` after aspect adjustment.
    pub padding: [f64; 4],
    pub margin: [f64; 4],
    pub aspect: Option<f64>,
    /// Where the child goes.
    pub inner: Rect,
    /// Where the border goes.
    pub border: Rect,
}

impl FrameLayout {
    /// Total horizontal and vertical padding.
    pub fn padding_pair(&self) -> DVec2 {
        let [l, t, r, b] = self.padding;
        DVec2::new(l + r, t + b)
    }
}

fn adjusted(quad: [f64; 4], scale: DVec2) -> [f64; 4] {
    let [l, t, r, b] = quad;
    [l * scale.x, t * scale.y, r * scale.x, b * scale.y]
}

/// Solve a frame around a child of `child_aspect`.
///
/// With `adjust`, horizontal sides are divided and vertical sides multiplied
/// by the square root of the aspect, which makes a scalar padding the same
/// absolute size on every side.
pub fn frame_layout(child_aspect: Option<f64>, padding: Extent, margin: Extent, adjust: bool) -> FrameLayout {
    let scale = match child_aspect {
        Some(a) if adjust => {
            let root = a.sqrt();
            DVec2::new(1.0 / root, root)
        }
        _ => DVec2::ONE,
    };
    let [pl, pt, pr, pb] = adjusted(padding.quad(), scale);
    let [ml, mt, mr, mb] = adjusted(margin.quad(), scale);

    let tw = 1.0 + pl + pr + ml + mr;
    let th = 1.0 + pt + pb + mt + mb;
    let inner = Rect::new(
        (ml + pl) / tw,
        (mt + pt) / th,
        1.0 - (mr + pr) / tw,
        1.0 - (mb + pb) / th,
    );
    let border = Rect::new(ml / tw, mt / th, 1.0 - mr / tw, 1.0 - mb / th);

    FrameLayout {
        padding: [pl, pt, pr, pb],
        margin: [ml, mt, mr, mb],
        aspect: child_aspect.map(|a| a * tw / th),
        inner,
        border,
    }
}

fn check_extent(what: &'static str, e: Extent) -> Result<Extent> {
    let e = e.try_finite().map_err(|err| LayoutError::number(what, err))?;
    if e.quad().iter().any(|v| *v < 0.0) {
        return Err(LayoutError::number(what, NumericError::Negative));
    }
    Ok(e)
}

impl Scene {
    /// Wrap exactly one child in a frame.
    pub fn frame(&mut self, children: Vec<NodeId>, options: &FrameOptions, spec: Spec) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("frame");
        let child = single_child("frame", &children).map_err(wrap)?;
        let padding = check_extent("padding", options.padding).map_err(wrap)?;
        let margin = check_extent("margin", options.margin).map_err(wrap)?;

        let layout = frame_layout(self.aspect(child).map_err(wrap)?, padding, margin, options.adjust);
        debug!(inner = %layout.inner, aspect = ?layout.aspect, "frame");

        let mut nodes = Vec::with_capacity(2);
        if options.has_border() {
            let border = match options.rounded {
                Some(r) => self.rounded_rect(r, Spec::default())?,
                None => self.rect(Spec::default())?,
            };
            let mut attrs = Attrs::new();
            attrs.set_opt("stroke_width", options.border);
            attrs.set_opt("stroke", options.border_stroke.clone());
            attrs.set_opt("fill", options.fill.clone());
            if options.border.is_none() {
                attrs.set("stroke", "none");
            }
            self.styled(border, attrs)?;
            nodes.push((border, Placement::at(layout.border)));
        }
        nodes.push((child, Placement::at(layout.inner)));

        self.composite("frame", nodes, pinned(spec), AspectRule::Fixed(layout.aspect))
    }

    /// A frame with a one-pixel border and the given padding.
    pub fn bordered(&mut self, child: NodeId, padding: impl Into<Extent>) -> Result<NodeId> {
        let options = FrameOptions {
            padding: padding.into(),
            border: Some(defaults::STROKE_WIDTH),
            ..FrameOptions::default()
        };
        self.frame(vec![child], &options, Spec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn square_child_keeps_uniform_padding() {
        let layout = frame_layout(Some(1.0), Extent::Scalar(0.1), Extent::Scalar(0.0), true);
        assert_eq!(layout.padding, [0.1; 4]);
        assert_close(layout.aspect.unwrap(), 1.0);
        assert_close(layout.inner.x0, 0.1 / 1.2);
        assert_eq!(layout.border, Rect::UNIT);
    }

    #[test]
    fn wide_child_scales_padding_by_root_aspect() {
        let layout = frame_layout(Some(2.0), Extent::Scalar(0.1), Extent::Scalar(0.0), true);
        let p = layout.padding_pair();
        assert_close(p.x, 0.2 / 2f64.sqrt());
        assert_close(p.y, 0.2 * 2f64.sqrt());
        assert_close(p.y / p.x, 2.0);
        // equal in absolute terms: horizontal fractions are of a box twice as wide
        assert_close(layout.padding[0] * 2.0, layout.padding[1]);
    }

    #[test]
    fn unadjusted_padding_is_raw() {
        let layout = frame_layout(Some(2.0), Extent::Scalar(0.1), Extent::Scalar(0.0), false);
        assert_eq!(layout.padding, [0.1; 4]);
        assert_close(layout.aspect.unwrap(), 2.0);
    }

    #[test]
    fn margin_sits_outside_border() {
        let layout = frame_layout(None, Extent::Scalar(0.1), Extent::Scalar(0.1), true);
        assert_eq!(layout.aspect, None);
        assert_close(layout.border.x0, 0.1 / 1.4);
        assert_close(layout.inner.x0, 0.2 / 1.4);
        assert!(layout.border.x0 < layout.inner.x0);
    }

    #[test]
    fn frame_needs_exactly_one_child() {
        let mut scene = Scene::new();
        let a = scene.rect(Spec::default()).unwrap();
        let b = scene.rect(Spec::default()).unwrap();
        for children in [vec![], vec![a, b]] {
            let err = scene
                .frame(children, &FrameOptions::default(), Spec::default())
                .unwrap_err();
            let LayoutError::InNode { source, .. } = err else {
                panic!("expected context");
            };
            assert!(matches!(*source, LayoutError::ChildCount { expected: 1, .. }));
        }
    }

    #[test]
    fn frame_places_border_then_child() {
        let mut scene = Scene::new();
        let r = scene.rect(Spec::new().with_aspect(Some(2.0))).unwrap();
        let f = scene
            .frame(
                vec![r],
                &FrameOptions {
                    padding: Extent::Scalar(0.1),
                    border: Some(2.0),
                    ..FrameOptions::default()
                },
                Spec::default(),
            )
            .unwrap();
        let entry = scene.get(f).unwrap();
        let crate::scene::Element::Group(group) = &entry.element else {
            panic!("frame is a group");
        };
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[1], r);
        assert_eq!(entry.spec.coord, Some(Rect::UNIT));
        assert!(scene.aspect(f).unwrap().unwrap() < 2.0);
    }

    #[test]
    fn negative_padding_is_rejected() {
        let mut scene = Scene::new();
        let r = scene.rect(Spec::default()).unwrap();
        let options = FrameOptions {
            padding: Extent::Scalar(-0.1),
            ..FrameOptions::default()
        };
        assert!(scene.frame(vec![r], &options, Spec::default()).is_err());
    }
}
