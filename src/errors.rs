//! Error types with diagnostics using miette
//!
//! Every error is raised synchronously during construction or render and
//! aborts the whole document; nothing is emitted for an invalid tree.

use miette::Diagnostic;
use thiserror::Error;

use crate::scene::NodeId;
use crate::types::NumericError;

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

/// Errors raised while building or rendering a scene
#[derive(Error, Diagnostic, Debug)]
pub enum LayoutError {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("unknown {kind} keyword: {keyword}")]
    #[diagnostic(code(svgum::config::unknown_keyword))]
    UnknownKeyword {
        kind: &'static str,
        keyword: String,
        #[help]
        expected: Option<String>,
    },

    #[error("{node} takes exactly {expected} child, got {got}")]
    #[diagnostic(code(svgum::config::child_count))]
    ChildCount {
        node: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid {what}: {source}")]
    #[diagnostic(code(svgum::config::invalid_number))]
    InvalidNumber {
        what: &'static str,
        #[source]
        source: NumericError,
    },

    #[error("invalid bounds: {reason}")]
    #[diagnostic(code(svgum::config::invalid_bounds))]
    InvalidBounds { reason: String },

    // ========================================================================
    // Sampling
    // ========================================================================
    #[error("sample arrays differ in length: {xs} x-values, {ys} y-values")]
    #[diagnostic(code(svgum::sample::length_mismatch))]
    SampleLengthMismatch { xs: usize, ys: usize },

    #[error("requested {requested} samples, limit is {limit}")]
    #[diagnostic(
        code(svgum::sample::too_many),
        help("reduce the sample count or split the curve into several paths")
    )]
    TooManySamples { requested: usize, limit: usize },

    // ========================================================================
    // Scene ownership
    // ========================================================================
    #[error("unknown node {id}")]
    #[diagnostic(code(svgum::scene::unknown_node))]
    UnknownNode { id: NodeId },

    #[error("node {id} already belongs to a parent")]
    #[diagnostic(
        code(svgum::scene::already_adopted),
        help("every node is owned by exactly one parent; build a fresh node instead")
    )]
    AlreadyAdopted { id: NodeId },

    // ========================================================================
    // Context
    // ========================================================================
    #[error("in {node}")]
    #[diagnostic(code(svgum::node))]
    InNode {
        node: String,
        #[source]
        source: Box<LayoutError>,
    },
}

impl LayoutError {
    pub(crate) fn number(what: &'static str, source: NumericError) -> Self {
        LayoutError::InvalidNumber { what, source }
    }

    pub(crate) fn bounds(reason: impl Into<String>) -> Self {
        LayoutError::InvalidBounds {
            reason: reason.into(),
        }
    }

    /// Attach the node or stage the error surfaced in.
    pub fn within(self, node: impl Into<String>) -> Self {
        LayoutError::InNode {
            node: node.into(),
            source: Box::new(self),
        }
    }

    /// The error underneath any node context.
    pub fn innermost(&self) -> &LayoutError {
        match self {
            LayoutError::InNode { source, .. } => source.innermost(),
            other => other,
        }
    }
}
