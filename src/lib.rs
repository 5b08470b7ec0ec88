//! A declarative layout engine that resolves trees of fractionally placed,
//! aspect-aware nodes into SVG.
//!
//! Build nodes in a [`Scene`], compose them with layout containers (stacks,
//! grids, frames, plots), then render the root:
//!
//! ```
//! use svgum::{RenderOptions, Scene, Spec, StackItem};
//!
//! let mut scene = Scene::new();
//! let a = scene.square(Spec::default())?;
//! let b = scene.circle(Spec::default())?;
//! let row = scene.hstack(vec![StackItem::from(a), StackItem::from(b)], 0.0)?;
//! let svg = scene.render(row, &RenderOptions::default().with_size(200.0))?;
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), svgum::LayoutError>(())
//! ```
//!
//! Every node carries a [`Spec`]: a rect in its parent's coordinates, an
//! optional aspect, an alignment for when the aspect does not fill the rect,
//! an optional rotation, and an optional coordinate system for its own
//! children. Layout containers compute their children's rects and their own
//! aspect when they are built; rendering only maps rects to pixels.

pub mod errors;
pub mod layout;
pub mod log;
pub mod plot;
pub mod render;
pub mod sample;
pub mod scene;
pub mod spec;
pub mod text;
pub mod types;

pub use errors::{LayoutError, Result};
pub use layout::{AttachOptions, FrameOptions, GridOptions, PointsOptions, StackItem, StackOptions};
pub use plot::{AxisStyle, GraphOptions, PlotOptions, Ticks};
pub use render::RenderOptions;
pub use render::shapes::{MetaKind, PathCmd};
pub use render::svg::{AttrValue, Attrs};
pub use sample::{SampleOptions, SampleSource};
pub use scene::{NodeId, Scene};
pub use spec::{Align, Direction, Side, Spec};
pub use text::{FontSpec, GlyphBox, NullMeasurer, ProportionalMeasurer, TextMeasurer};
pub use types::{Extent, Point, Rect};
