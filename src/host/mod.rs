//! Tree-editing host interface
//!
//! The formatting engine never touches a concrete DOM. Everything it needs from
//! the editable surface (the live selection, range surgery, native toggles and
//! geometry) goes through [`EditHost`]. The browser implementation lives in
//! `web::dom_host`, the headless one in `surface`.

use std::fmt;
use thiserror::Error;

use crate::models::{ActiveFormatState, BlockTag, CaretRect, FormatKind};

/// Errors raised by a host while reading or mutating the tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// A referenced node is no longer attached to the document
    #[error("node is detached from the document")]
    Detached,

    /// Offset past the end of its container
    #[error("boundary offset {offset} out of bounds (length {length})")]
    InvalidBoundary { offset: usize, length: usize },

    /// `surroundContents` refused a range that partially selects an element
    #[error("range partially selects a non-text node")]
    PartialOverlap,

    /// Insertion would create a cycle or target a text node as parent
    #[error("hierarchy request error: {0}")]
    Hierarchy(String),

    /// Operation needs an element but got another node type
    #[error("expected an element node")]
    NotAnElement,

    /// The host has no selection object at all
    #[error("no selection available")]
    NoSelection,

    #[error("markup error: {0}")]
    Markup(String),

    /// Failure reported by the platform (e.g. a JS exception)
    #[error("platform error: {0}")]
    Platform(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// A position in the tree: a node plus an offset into it
///
/// For text nodes the offset counts characters, for elements it counts children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Boundary<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// An ordered (start <= end) range between two boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRange<N> {
    pub start: Boundary<N>,
    pub end: Boundary<N>,
}

impl<N: Clone + PartialEq> HostRange<N> {
    pub fn new(start: Boundary<N>, end: Boundary<N>) -> Self {
        Self { start, end }
    }

    /// A caret at a single boundary
    pub fn collapsed(at: Boundary<N>) -> Self {
        Self {
            start: at.clone(),
            end: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Everything the formatting engine needs from an editable tree
pub trait EditHost {
    /// Handle to a node of the tree (cheap to clone, compared by identity)
    type Node: Clone + PartialEq + fmt::Debug;

    /// Detached content produced by [`EditHost::extract_range`]
    type Fragment;

    /// The editable surface element
    fn surface(&self) -> Self::Node;

    /// The first range of the live selection, `None` when there are zero ranges
    fn current_range(&self) -> Option<HostRange<Self::Node>>;

    /// Replace the live selection with `range`
    fn set_current_range(&mut self, range: &HostRange<Self::Node>) -> HostResult<()>;

    /// Select the full contents of `node`
    fn select_contents(&mut self, node: &Self::Node) -> HostResult<()>;

    fn focus_surface(&mut self) -> HostResult<()>;

    fn surface_has_focus(&self) -> bool;

    /// Inclusive containment: a node contains itself
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn common_ancestor(&self, range: &HostRange<Self::Node>) -> HostResult<Self::Node>;

    fn create_element(&mut self, tag: &str) -> HostResult<Self::Node>;

    fn create_text(&mut self, text: &str) -> HostResult<Self::Node>;

    fn set_style(&mut self, element: &Self::Node, property: &str, value: &str) -> HostResult<()>;

    fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> HostResult<()>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> HostResult<()>;

    /// Move the range contents into `wrapper` and put `wrapper` in their place
    ///
    /// Fails with [`HostError::PartialOverlap`] when an element is only partly
    /// inside the range.
    fn wrap_range(&mut self, range: &HostRange<Self::Node>, wrapper: &Self::Node) -> HostResult<()>;

    /// Remove the range contents from the tree
    ///
    /// Returns the detached content and the boundary the range collapsed to.
    fn extract_range(
        &mut self,
        range: &HostRange<Self::Node>,
    ) -> HostResult<(Self::Fragment, Boundary<Self::Node>)>;

    fn append_fragment(&mut self, parent: &Self::Node, fragment: Self::Fragment) -> HostResult<()>;

    /// Insert `node` at a boundary, splitting a text node if needed
    fn insert_at(&mut self, at: &Boundary<Self::Node>, node: &Self::Node) -> HostResult<()>;

    fn remove_node(&mut self, node: &Self::Node) -> HostResult<()>;

    /// Merge adjacent text nodes below `node`
    fn normalize(&mut self, node: &Self::Node) -> HostResult<()>;

    /// Native bold/italic/underline toggle over the live selection
    fn toggle_format(&mut self, kind: FormatKind) -> HostResult<()>;

    /// Native block reformatting of the blocks touched by the live selection
    fn format_block(&mut self, tag: BlockTag) -> HostResult<()>;

    /// Computed B / I / U state of the live selection
    fn query_formats(&self) -> ActiveFormatState;

    /// Native bounding rect of a range, `None` when the host reports nothing
    fn range_rect(&self, range: &HostRange<Self::Node>) -> Option<CaretRect>;

    fn node_rect(&self, node: &Self::Node) -> Option<CaretRect>;

    /// Serialized markup of the surface contents
    fn markup(&self) -> String;

    fn set_markup(&mut self, markup: &str) -> HostResult<()>;

    /// Keep at least one block element in the surface
    fn ensure_block(&mut self) -> HostResult<()>;

    fn in_surface(&self, node: &Self::Node) -> bool {
        self.contains(&self.surface(), node)
    }

    /// True when the range's common ancestor lies inside the surface
    fn range_in_surface(&self, range: &HostRange<Self::Node>) -> bool {
        match self.common_ancestor(range) {
            Ok(ancestor) => self.in_surface(&ancestor),
            Err(_) => false,
        }
    }
}
