//! Stack: children laid out along one axis, sharing the cross axis.
//!
//! Sizes are fractions of the main axis. Every child falls in one of three
//! groups:
//! - sized and with an aspect: fixes the main-axis length of the whole stack
//! - aspect only (expand): gets the length its aspect needs at full cross size
//! - neither (flex): shares whatever is left
//!
//! A horizontal stack is a vertical one with every aspect inverted.

use crate::errors::{LayoutError, Result};
use crate::log::debug;
use crate::scene::{AspectRule, NodeId, Placement, Scene};
use crate::spec::{Direction, Spec};
use crate::types::{NumericError, Rect, check_finite};

use super::pinned;

/// A stack child with an optional main-axis size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackItem {
    pub node: NodeId,
    pub size: Option<f64>,
}

impl StackItem {
    pub fn sized(node: NodeId, size: f64) -> Self {
        StackItem {
            node,
            size: Some(size),
        }
    }
}

impl From<NodeId> for StackItem {
    fn from(node: NodeId) -> Self {
        StackItem { node, size: None }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StackOptions {
    pub direction: Direction,
    /// Gap between neighbours as a fraction of the main axis.
    pub spacing: f64,
}

/// Solved stack geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayout {
    /// Main-axis fractions, excluding spacing.
    pub sizes: Vec<f64>,
    /// `(start, end)` of each child along the main axis.
    pub intervals: Vec<(f64, f64)>,
    pub aspect: Option<f64>,
}

impl StackLayout {
    /// Placement rect of child `i`.
    pub fn rect(&self, i: usize, direction: Direction) -> Option<Rect> {
        let (lo, hi) = *self.intervals.get(i)?;
        Some(match direction {
            Direction::Vertical => Rect::new(0.0, lo, 1.0, hi),
            Direction::Horizontal => Rect::new(lo, 0.0, hi, 1.0),
        })
    }
}

/// Solve the main-axis sizes and the stack aspect.
///
/// `sizes` and `aspects` are per child; aspects are width over height in
/// either direction.
pub fn solve_stack(
    sizes: &[Option<f64>],
    aspects: &[Option<f64>],
    direction: Direction,
    spacing: f64,
) -> Result<StackLayout> {
    let n = sizes.len();
    if aspects.len() != n {
        return Err(LayoutError::bounds(format!(
            "{} sizes for {} aspects",
            n,
            aspects.len()
        )));
    }
    for size in sizes.iter().flatten() {
        check_finite(*size).map_err(|e| LayoutError::number("stack size", e))?;
        if *size < 0.0 {
            return Err(LayoutError::number("stack size", NumericError::Negative));
        }
    }
    check_finite(spacing).map_err(|e| LayoutError::number("spacing", e))?;
    let shrink = 1.0 - spacing * n.saturating_sub(1) as f64;
    if spacing < 0.0 || shrink <= 0.0 {
        return Err(LayoutError::bounds(format!(
            "spacing {spacing} leaves no room for {n} children"
        )));
    }

    // main-axis length per unit of cross axis, in the vertical frame
    let inv: Vec<Option<f64>> = aspects
        .iter()
        .map(|a| match direction {
            Direction::Vertical => a.map(|a| 1.0 / a),
            Direction::Horizontal => *a,
        })
        .collect();

    let total: f64 = sizes.iter().flatten().sum();
    let anchor = sizes
        .iter()
        .zip(&inv)
        .filter_map(|(s, l)| match (s, l) {
            (Some(s), Some(l)) if *s > 0.0 => Some(l / s),
            _ => None,
        })
        .reduce(f64::max);

    let mut out = vec![0.0; n];
    let length: Option<f64>;
    if total >= 1.0 || (total > 0.0 && sizes.iter().all(Option::is_some)) {
        // declared sizes fill the axis on their own
        for (o, s) in out.iter_mut().zip(sizes) {
            *o = s.unwrap_or(0.0) / total;
        }
        length = anchor.map(|l| l * total);
    } else {
        let rest = 1.0 - total;
        let expand: Vec<usize> = (0..n).filter(|&i| sizes[i].is_none() && inv[i].is_some()).collect();
        let flex: Vec<usize> = (0..n).filter(|&i| sizes[i].is_none() && inv[i].is_none()).collect();
        let need: f64 = expand.iter().filter_map(|&i| inv[i]).sum();

        let len = match (anchor, flex.is_empty()) {
            (_, true) if need > 0.0 => Some(need / rest),
            (Some(l), _) => Some(if need / l > rest { need / rest } else { l }),
            (None, false) if need > 0.0 => {
                // flex children count as an average expand child
                let mean = need / expand.len() as f64;
                Some((need + mean * flex.len() as f64) / rest)
            }
            (a, _) => a,
        };

        for (i, s) in sizes.iter().enumerate() {
            if let Some(s) = s {
                out[i] = *s;
            }
        }
        let mut used = total;
        if let Some(len) = len {
            for &i in &expand {
                out[i] = inv[i].unwrap_or(0.0) / len;
                used += out[i];
            }
        }
        if !flex.is_empty() {
            let share = (1.0 - used).max(0.0) / flex.len() as f64;
            for &i in &flex {
                out[i] = share;
            }
        }
        length = len;
    }

    let mut intervals = Vec::with_capacity(n);
    let mut cursor = 0.0;
    for s in &mut out {
        *s *= shrink;
        intervals.push((cursor, cursor + *s));
        cursor += *s + spacing;
    }

    let aspect = length.filter(|l| *l > 0.0).map(|l| {
        let l = l / shrink;
        match direction {
            Direction::Vertical => 1.0 / l,
            Direction::Horizontal => l,
        }
    });
    debug!(?out, ?aspect, "stack");

    Ok(StackLayout {
        sizes: out,
        intervals,
        aspect,
    })
}

impl Scene {
    pub fn stack(&mut self, items: Vec<StackItem>, options: &StackOptions, spec: Spec) -> Result<NodeId> {
        let wrap = |e: LayoutError| e.within("stack");
        let sizes: Vec<Option<f64>> = items.iter().map(|item| item.size).collect();
        let aspects = items
            .iter()
            .map(|item| self.aspect(item.node))
            .collect::<Result<Vec<_>>>()
            .map_err(wrap)?;
        let layout = solve_stack(&sizes, &aspects, options.direction, options.spacing).map_err(wrap)?;

        let children = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let rect = layout.rect(i, options.direction).unwrap_or(Rect::UNIT);
                (item.node, Placement::at(rect))
            })
            .collect();
        self.composite("stack", children, pinned(spec), AspectRule::Fixed(layout.aspect))
    }

    /// Children top to bottom.
    pub fn vstack(&mut self, items: Vec<StackItem>, spacing: f64) -> Result<NodeId> {
        let options = StackOptions {
            direction: Direction::Vertical,
            spacing,
        };
        self.stack(items, &options, Spec::default())
    }

    /// Children left to right.
    pub fn hstack(&mut self, items: Vec<StackItem>, spacing: f64) -> Result<NodeId> {
        let options = StackOptions {
            direction: Direction::Horizontal,
            spacing,
        };
        self.stack(items, &options, Spec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    fn assert_sums_to_one(layout: &StackLayout) {
        assert_close(layout.sizes.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn flex_children_share_the_rest() {
        let layout = solve_stack(&[None, Some(0.5), None], &[None; 3], Direction::Horizontal, 0.0).unwrap();
        assert_eq!(layout.sizes, vec![0.25, 0.5, 0.25]);
        assert_eq!(layout.intervals, vec![(0.0, 0.25), (0.25, 0.75), (0.75, 1.0)]);
        assert_eq!(layout.aspect, None);
    }

    #[test]
    fn oversized_declarations_are_renormalized() {
        let layout = solve_stack(
            &[Some(1.0), Some(1.0), None],
            &[Some(1.0), None, Some(2.0)],
            Direction::Vertical,
            0.0,
        )
        .unwrap();
        assert_eq!(layout.sizes, vec![0.5, 0.5, 0.0]);
        // the square child needs one unit of height for half the stack
        assert_close(layout.aspect.unwrap(), 0.5);
    }

    #[test]
    fn expand_children_fill_the_cross_axis() {
        let layout = solve_stack(&[None, None], &[Some(1.0), Some(1.0)], Direction::Vertical, 0.0).unwrap();
        assert_eq!(layout.sizes, vec![0.5, 0.5]);
        assert_close(layout.aspect.unwrap(), 0.5);

        let layout = solve_stack(&[None, None], &[Some(1.0), Some(2.0)], Direction::Horizontal, 0.0).unwrap();
        assert_close(layout.sizes[0], 1.0 / 3.0);
        assert_close(layout.sizes[1], 2.0 / 3.0);
        assert_close(layout.aspect.unwrap(), 3.0);
    }

    #[test]
    fn anchor_fixes_length_and_flex_takes_remainder() {
        // a 2:1 child asked to take 0.25 of the height fixes the stack at 2 units tall
        let layout = solve_stack(
            &[Some(0.25), None, None],
            &[Some(2.0), Some(1.0), None],
            Direction::Vertical,
            0.0,
        )
        .unwrap();
        assert_close(layout.aspect.unwrap(), 0.5);
        assert_close(layout.sizes[1], 0.5);
        assert_close(layout.sizes[2], 0.25);
        assert_sums_to_one(&layout);
    }

    #[test]
    fn expand_children_take_the_rest_over_an_anchor() {
        // the expand child's need sets the length, not the anchored child
        let layout = solve_stack(&[Some(0.25), None], &[Some(2.0), Some(1.0)], Direction::Vertical, 0.0).unwrap();
        assert_close(layout.sizes[0], 0.25);
        assert_close(layout.sizes[1], 0.75);
        assert_close(layout.aspect.unwrap(), 0.75);

        let layout = solve_stack(&[Some(0.25), None], &[Some(2.0), Some(1.0)], Direction::Horizontal, 0.0).unwrap();
        assert_close(layout.sizes[1], 0.75);
        assert_close(layout.aspect.unwrap(), 4.0 / 3.0);
    }

    #[test]
    fn flex_with_expand_counts_as_average() {
        let layout = solve_stack(&[None, None], &[Some(1.0), None], Direction::Vertical, 0.0).unwrap();
        assert_eq!(layout.sizes, vec![0.5, 0.5]);
        assert_close(layout.aspect.unwrap(), 0.5);
    }

    #[test]
    fn sizes_always_sum_to_one() {
        let cases: Vec<(Vec<Option<f64>>, Vec<Option<f64>>)> = vec![
            (vec![Some(0.2), None, None], vec![None, Some(3.0), Some(0.5)]),
            (vec![Some(0.3), Some(0.3)], vec![None, Some(1.0)]),
            (vec![Some(2.0), Some(0.5), None], vec![Some(1.0), None, Some(1.0)]),
            (vec![None, None, None], vec![Some(1.0), None, Some(4.0)]),
            (vec![Some(0.1), None], vec![Some(1.0), Some(1.0)]),
            (vec![Some(0.25), None], vec![Some(2.0), Some(1.0)]),
        ];
        for (sizes, aspects) in cases {
            for direction in [Direction::Vertical, Direction::Horizontal] {
                let layout = solve_stack(&sizes, &aspects, direction, 0.0).unwrap();
                assert_sums_to_one(&layout);
            }
        }
    }

    #[test]
    fn spacing_inserts_gaps_and_corrects_aspect() {
        let layout = solve_stack(&[None, None], &[Some(1.0), Some(1.0)], Direction::Horizontal, 0.1).unwrap();
        assert_close(layout.sizes[0], 0.45);
        assert_close(layout.intervals[1].0, 0.55);
        assert_close(layout.intervals[1].1, 1.0);
        // two unit squares plus a gap of 0.1 of the total width
        assert_close(layout.aspect.unwrap(), 2.0 / 0.9);
    }

    #[test]
    fn spacing_that_eats_the_axis_is_rejected() {
        assert!(solve_stack(&[None, None, None], &[None; 3], Direction::Vertical, 0.5).is_err());
        assert!(solve_stack(&[Some(f64::NAN)], &[None], Direction::Vertical, 0.0).is_err());
    }

    #[test]
    fn empty_stack_keeps_declared_aspect() {
        let mut scene = Scene::new();
        let s = scene.stack(vec![], &StackOptions::default(), Spec::new().with_aspect(Some(2.0))).unwrap();
        assert_eq!(scene.aspect(s).unwrap(), Some(2.0));
        let s = scene.vstack(vec![], 0.0).unwrap();
        assert_eq!(scene.aspect(s).unwrap(), None);
    }

    #[test]
    fn stack_assigns_intervals_as_rects() {
        let mut scene = Scene::new();
        let a = scene.square(Spec::default()).unwrap();
        let b = scene.square(Spec::default()).unwrap();
        let s = scene.hstack(vec![a.into(), b.into()], 0.0).unwrap();
        assert_close(scene.aspect(s).unwrap().unwrap(), 2.0);
        assert_eq!(scene.spec(b).unwrap().rect, Some(Rect::new(0.5, 0.0, 1.0, 1.0)));
    }
}
