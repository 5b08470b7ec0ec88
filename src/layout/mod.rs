//! Layout solvers
//!
//! Each solver turns the aspects of its children into placement rects and
//! an aspect for itself, then adopts the children as a composite node:
//! - `frame`: padding, margin and border around a single child
//! - `stack`: children along one axis, sharing the cross axis
//! - `grid`: rows and columns balanced in log-aspect space
//! - `place`: explicit positions, edge anchoring, attachment outside the box

pub mod frame;
pub mod grid;
pub mod place;
pub mod stack;

pub use frame::{FrameLayout, FrameOptions, frame_layout};
pub use grid::{GridLayout, GridOptions, solve_grid};
pub use place::{AttachOptions, PointsOptions, anchor_rect, attach_rect};
pub use stack::{StackItem, StackLayout, StackOptions, solve_stack};

use crate::errors::{LayoutError, Result};
use crate::spec::Spec;

/// Solver groups lay their children out in the unit square unless told otherwise.
pub(crate) fn pinned(spec: Spec) -> Spec {
    Spec {
        coord: spec.coord.or(Some(crate::types::Rect::UNIT)),
        ..spec
    }
}

pub(crate) fn single_child<T: Copy>(node: &'static str, children: &[T]) -> Result<T> {
    match children {
        [only] => Ok(*only),
        _ => Err(LayoutError::ChildCount {
            node,
            expected: 1,
            got: children.len(),
        }),
    }
}
