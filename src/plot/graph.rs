//! Graph: a data coordinate system for its children.

use crate::errors::{LayoutError, Result};
use crate::log::{debug, warn};
use crate::render::geometry::{merge_rects, pad_rect};
use crate::scene::{AspectRule, NodeId, Placement, Scene};
use crate::spec::Spec;
use crate::types::{Extent, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct GraphOptions {
    /// Data domain `[xmin, ymin, xmax, ymax]`; inferred from the children when `None`.
    pub coord: Option<Rect>,
    /// Extra room around an inferred domain, as a fraction of its range.
    pub padding: Extent,
    /// Make y grow upwards.
    pub flip: bool,
    /// Do not force the domain's aspect on the graph.
    pub flex: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        GraphOptions {
            coord: None,
            padding: Extent::Scalar(0.0),
            flip: true,
            flex: false,
        }
    }
}

/// Widen a zero-extent axis so the domain can be mapped.
fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) }
}

/// Ensure a user-supplied range is finite and increasing.
pub(crate) fn check_range(what: &str, (lo, hi): (f64, f64)) -> Result<(f64, f64)> {
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Err(LayoutError::bounds(format!("{what} ({lo}, {hi}) must be finite and increasing")));
    }
    Ok((lo, hi))
}

impl Scene {
    /// Data domain a graph over `children` would use, y up.
    pub fn graph_domain(&self, children: &[NodeId], options: &GraphOptions) -> Result<Rect> {
        if let Some(coord) = options.coord {
            let c = coord.normalized();
            check_range("graph x range", (c.x0, c.x1))?;
            check_range("graph y range", (c.y0, c.y1))?;
            return Ok(c);
        }

        let bounds = children
            .iter()
            .map(|id| self.data_bounds(*id))
            .collect::<Result<Vec<_>>>()?;
        let union = match merge_rects(bounds.into_iter().flatten()) {
            Some(r) if r.is_finite() => r,
            Some(r) => return Err(LayoutError::bounds(format!("data bounds {r} are not finite"))),
            None => {
                warn!("graph children report no data bounds, using the unit square");
                Rect::UNIT
            }
        };
        let padding = options
            .padding
            .try_finite()
            .map_err(|e| LayoutError::number("graph padding", e))?;
        let padded = pad_rect(union, padding.pair());
        let (x0, x1) = widen(padded.x0, padded.x1);
        let (y0, y1) = widen(padded.y0, padded.y1);
        Ok(Rect::new(x0, y0, x1, y1))
    }

    /// Children positioned in data coordinates.
    ///
    /// The graph's aspect is the domain's unless `flex` is set or the spec
    /// gives one.
    pub fn graph(&mut self, children: Vec<NodeId>, options: &GraphOptions, spec: Spec) -> Result<NodeId> {
        let domain = self
            .graph_domain(&children, options)
            .map_err(|e| e.within("graph"))?;
        let coord = if options.flip { domain.flip_y() } else { domain };
        debug!(domain = %domain, "graph");

        let aspect = if options.flex { None } else { domain.aspect() };
        let children = children.into_iter().map(|c| (c, Placement::KEEP)).collect();
        self.composite(
            "graph",
            children,
            Spec {
                coord: Some(coord),
                ..spec
            },
            AspectRule::Fixed(aspect),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn domain_is_union_of_child_bounds() {
        let mut scene = Scene::new();
        let a = scene.rect(Spec::at(Rect::new(0.0, 0.0, 1.0, 1.0))).unwrap();
        let b = scene.rect(Spec::at(Rect::new(2.0, 2.0, 3.0, 3.0))).unwrap();
        let domain = scene.graph_domain(&[a, b], &GraphOptions::default()).unwrap();
        assert_eq!(domain, Rect::new(0.0, 0.0, 3.0, 3.0));

        let g = scene.graph(vec![a, b], &GraphOptions::default(), Spec::default()).unwrap();
        let spec = scene.spec(g).unwrap();
        assert_eq!(spec.coord, Some(Rect::new(0.0, 3.0, 3.0, 0.0)));
        assert_eq!(spec.aspect, Some(1.0));
    }

    #[test]
    fn padding_grows_the_domain() {
        let mut scene = Scene::new();
        let l = scene.line(dvec2(0.0, 0.0), dvec2(10.0, 2.0), Spec::default()).unwrap();
        let options = GraphOptions {
            padding: Extent::Scalar(0.1),
            ..GraphOptions::default()
        };
        let d = scene.graph_domain(&[l], &options).unwrap();
        assert!((d.x0 + 1.0).abs() < 1e-12 && (d.x1 - 11.0).abs() < 1e-12);
        assert!((d.y0 + 0.2).abs() < 1e-12 && (d.y1 - 2.2).abs() < 1e-12);
    }

    #[test]
    fn flat_data_is_widened() {
        let mut scene = Scene::new();
        let l = scene.line(dvec2(0.0, 1.0), dvec2(4.0, 1.0), Spec::default()).unwrap();
        let d = scene.graph_domain(&[l], &GraphOptions::default()).unwrap();
        assert_eq!(d, Rect::new(0.0, 0.5, 4.0, 1.5));
    }

    #[test]
    fn explicit_coord_and_flex() {
        let mut scene = Scene::new();
        let options = GraphOptions {
            coord: Some(Rect::new(0.0, 0.0, 4.0, 1.0)),
            flip: false,
            flex: true,
            ..GraphOptions::default()
        };
        let g = scene.graph(vec![], &options, Spec::default()).unwrap();
        let spec = scene.spec(g).unwrap();
        assert_eq!(spec.coord, Some(Rect::new(0.0, 0.0, 4.0, 1.0)));
        assert_eq!(spec.aspect, None);

        let bad = GraphOptions {
            coord: Some(Rect::new(1.0, 0.0, 1.0, 1.0)),
            ..GraphOptions::default()
        };
        assert!(scene.graph(vec![], &bad, Spec::default()).is_err());
    }

    #[test]
    fn empty_graph_uses_unit_domain() {
        let mut scene = Scene::new();
        let g = scene.graph(vec![], &GraphOptions::default(), Spec::default()).unwrap();
        assert_eq!(scene.spec(g).unwrap().coord, Some(Rect::new(0.0, 1.0, 1.0, 0.0)));
    }
}
