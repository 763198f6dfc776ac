//! Headless editable surface
//!
//! An in-memory document with the same selection and range behavior the
//! formatting engine relies on in the browser. Used by the test suite and by
//! any embedding that has no DOM.
//!
//! The document holds two subtrees: a chrome strip (stands in for menus and
//! toolbars, so selections can move "outside" the editor) and the editable
//! root.
//!
//! ## Modules
//!
//! - `tree`: arena node storage
//! - `range`: extract / surround / insert range surgery
//! - `commands`: native-like bold/italic/underline and block formatting
//! - `layout`: monospace geometry
//! - `markup`: XHTML fragment parsing and serialization

pub mod commands;
pub mod layout;
pub mod markup;
pub mod range;
pub mod tree;

pub use layout::LayoutMetrics;
pub use markup::MarkupError;
pub use tree::{NodeId, NodeKind, Tree};

use crate::host::{Boundary, EditHost, HostError, HostRange, HostResult};
use crate::models::{ActiveFormatState, BlockTag, CaretRect, FormatKind};

const CHROME_LABEL: &str = "File Edit View Insert Format";

#[derive(Debug, Clone)]
pub struct Surface {
    tree: Tree,
    document: NodeId,
    chrome: NodeId,
    root: NodeId,
    selection: Option<HostRange<NodeId>>,
    focused: bool,
    metrics: LayoutMetrics,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// An empty surface holding the starter paragraph
    pub fn new() -> Self {
        let mut tree = Tree::new();
        let document = tree.create_document();
        let chrome = tree.create_element("div");
        let label = tree.create_text(CHROME_LABEL);
        let root = tree.create_element("div");

        let mut surface = Self {
            tree,
            document,
            chrome,
            root,
            selection: None,
            focused: false,
            metrics: LayoutMetrics::default(),
        };
        // Fresh nodes under a document node: none of these can fail
        let _ = surface.tree.append(document, chrome);
        let _ = surface.tree.append(chrome, label);
        let _ = surface.tree.append(document, root);
        let _ = surface.tree.set_attribute(root, "contenteditable", "true");
        let _ = surface.ensure_block();
        surface
    }

    pub fn with_markup(markup: &str) -> HostResult<Self> {
        let mut surface = Self::new();
        surface.set_markup(markup)?;
        surface.ensure_block()?;
        Ok(surface)
    }

    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn chrome(&self) -> NodeId {
        self.chrome
    }

    /// First text node of the editable root containing `needle`
    pub fn find_text(&self, needle: &str) -> Option<NodeId> {
        self.tree
            .text_nodes(self.root)
            .into_iter()
            .find(|t| self.tree.text(*t).map(|s| s.contains(needle)).unwrap_or(false))
    }

    /// Select characters `from..to` of a text node
    pub fn select_text(&mut self, text: NodeId, from: usize, to: usize) -> HostResult<()> {
        self.set_current_range(&HostRange::new(
            Boundary::new(text, from),
            Boundary::new(text, to),
        ))
    }

    /// Text covered by the live selection
    pub fn selected_text(&self) -> String {
        match &self.selection {
            Some(range) if self.tree.validate_range(self.document, range).is_ok() => {
                self.tree.range_text(self.document, range)
            }
            _ => String::new(),
        }
    }

    /// Pointer press on a toolbar control that does take focus: the selection
    /// moves into the chrome and the surface loses focus
    pub fn click_outside(&mut self) {
        self.selection = Some(HostRange::new(
            Boundary::new(self.chrome, 0),
            Boundary::new(self.chrome, self.tree.len(self.chrome)),
        ));
        self.focused = false;
    }

    /// Drop every range (`rangeCount == 0`)
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Keyboard input at the live selection, replacing selected content
    pub fn type_text(&mut self, text: &str) -> HostResult<()> {
        let range = self.selection.clone().ok_or(HostError::NoSelection)?;
        self.tree.validate_range(self.root, &range)?;

        let at = if range.is_collapsed() {
            range.start
        } else {
            let (_, at) = self.tree.extract_contents(&range)?;
            at
        };

        let typed = text.chars().count();
        let caret = if let Some(existing) = self.tree.text(at.node) {
            let byte = tree::byte_index(existing, at.offset);
            let mut updated = existing.to_string();
            updated.insert_str(byte, text);
            self.tree.set_text(at.node, updated);
            Boundary::new(at.node, at.offset + typed)
        } else {
            let node = self.tree.create_text(text);
            self.tree.insert_node(&at, node)?;
            Boundary::new(node, typed)
        };
        self.selection = Some(HostRange::collapsed(caret));
        Ok(())
    }

    pub fn text_content(&self) -> String {
        self.tree.text_content(self.root)
    }

    /// Line index and top-level block holding a boundary
    pub(crate) fn block_of(&self, boundary: &Boundary<NodeId>) -> Option<(usize, NodeId)> {
        let blocks = self.tree.children(self.root);
        if boundary.node == self.root {
            let last = blocks.len().checked_sub(1)?;
            let index = boundary.offset.min(last);
            return Some((index, blocks[index]));
        }
        let block = self.tree.child_containing(self.root, boundary.node)?;
        let index = self.tree.index_of(block)?;
        Some((index, block))
    }
}

impl EditHost for Surface {
    type Node = NodeId;
    type Fragment = Vec<NodeId>;

    fn surface(&self) -> NodeId {
        self.root
    }

    fn current_range(&self) -> Option<HostRange<NodeId>> {
        self.selection.clone()
    }

    fn set_current_range(&mut self, range: &HostRange<NodeId>) -> HostResult<()> {
        self.tree.validate_range(self.document, range)?;
        self.selection = Some(range.clone());
        Ok(())
    }

    fn select_contents(&mut self, node: &NodeId) -> HostResult<()> {
        let length = self.tree.len(*node);
        self.set_current_range(&HostRange::new(
            Boundary::new(*node, 0),
            Boundary::new(*node, length),
        ))
    }

    fn focus_surface(&mut self) -> HostResult<()> {
        self.focused = true;
        Ok(())
    }

    fn surface_has_focus(&self) -> bool {
        self.focused
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.tree.is_inclusive_ancestor(*ancestor, *node)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.parent(*node)
    }

    fn common_ancestor(&self, range: &HostRange<NodeId>) -> HostResult<NodeId> {
        self.tree
            .common_ancestor(range.start.node, range.end.node)
            .ok_or(HostError::Detached)
    }

    fn create_element(&mut self, tag: &str) -> HostResult<NodeId> {
        Ok(self.tree.create_element(tag))
    }

    fn create_text(&mut self, text: &str) -> HostResult<NodeId> {
        Ok(self.tree.create_text(text))
    }

    fn set_style(&mut self, element: &NodeId, property: &str, value: &str) -> HostResult<()> {
        self.tree.set_style(*element, property, value)
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> HostResult<()> {
        self.tree.set_attribute(*element, name, value)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> HostResult<()> {
        self.tree.append(*parent, *child)
    }

    fn wrap_range(&mut self, range: &HostRange<NodeId>, wrapper: &NodeId) -> HostResult<()> {
        self.tree.validate_range(self.document, range)?;
        self.tree.surround_contents(range, *wrapper).map(|_| ())
    }

    fn extract_range(
        &mut self,
        range: &HostRange<NodeId>,
    ) -> HostResult<(Vec<NodeId>, Boundary<NodeId>)> {
        self.tree.validate_range(self.document, range)?;
        self.tree.extract_contents(range)
    }

    fn append_fragment(&mut self, parent: &NodeId, fragment: Vec<NodeId>) -> HostResult<()> {
        for node in fragment {
            self.tree.append(*parent, node)?;
        }
        Ok(())
    }

    fn insert_at(&mut self, at: &Boundary<NodeId>, node: &NodeId) -> HostResult<()> {
        self.tree.validate_boundary(self.document, at)?;
        self.tree.insert_node(at, *node)
    }

    fn remove_node(&mut self, node: &NodeId) -> HostResult<()> {
        if self.tree.parent(*node).is_none() {
            return Err(HostError::Detached);
        }
        self.tree.detach(*node);
        Ok(())
    }

    fn normalize(&mut self, node: &NodeId) -> HostResult<()> {
        self.tree.merge_adjacent_text(*node);
        Ok(())
    }

    fn toggle_format(&mut self, kind: FormatKind) -> HostResult<()> {
        self.toggle_inline_format(kind)
    }

    fn format_block(&mut self, tag: BlockTag) -> HostResult<()> {
        self.reformat_blocks(tag)
    }

    fn query_formats(&self) -> ActiveFormatState {
        self.computed_formats()
    }

    fn range_rect(&self, range: &HostRange<NodeId>) -> Option<CaretRect> {
        self.layout_range_rect(range)
    }

    fn node_rect(&self, node: &NodeId) -> Option<CaretRect> {
        self.layout_node_rect(*node)
    }

    fn markup(&self) -> String {
        markup::serialize_children(&self.tree, self.root)
    }

    fn set_markup(&mut self, markup: &str) -> HostResult<()> {
        let nodes = markup::parse_fragment(&mut self.tree, markup)?;
        for child in self.tree.children(self.root).to_vec() {
            self.tree.detach(child);
        }
        for node in nodes {
            self.tree.append(self.root, node)?;
        }
        self.selection = None;
        Ok(())
    }

    fn ensure_block(&mut self) -> HostResult<()> {
        // Any block, even one under an inline wrapper, satisfies the invariant
        if !self.outermost_blocks(self.root).is_empty() {
            return Ok(());
        }

        let children = self.tree.children(self.root).to_vec();

        let blank = children
            .iter()
            .all(|c| self.tree.text(*c).map(|t| t.trim().is_empty()).unwrap_or(false));
        let paragraph = self.tree.create_element("p");
        if blank {
            for child in children {
                self.tree.detach(child);
            }
            let br = self.tree.create_element("br");
            self.tree.append(paragraph, br)?;
        } else {
            for child in children {
                self.tree.append(paragraph, child)?;
            }
        }
        self.tree.append(self.root, paragraph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormattingApplicator;
    use crate::models::InlineStyle;
    use crate::selection::RangeSnapshotStore;

    #[test]
    fn test_new_surface_has_starter_paragraph() {
        let surface = Surface::new();
        assert_eq!(surface.markup(), "<p><br/></p>");
        assert!(surface.current_range().is_none());
    }

    #[test]
    fn test_ensure_block_wraps_loose_inline_content() {
        let mut surface = Surface::with_markup("loose <b>text</b>").unwrap();
        surface.ensure_block().unwrap();
        assert_eq!(surface.markup(), "<p>loose <b>text</b></p>");
    }

    #[test]
    fn test_ensure_block_accepts_blocks_under_inline_wrapper() {
        let mut surface = Surface::with_markup("<p>ab</p><p>cd</p>").unwrap();
        let root = surface.root();
        surface
            .set_current_range(&HostRange::new(Boundary::new(root, 0), Boundary::new(root, 2)))
            .unwrap();
        let mut store = RangeSnapshotStore::new();
        store.capture(&surface);

        FormattingApplicator::new(&mut surface, &mut store)
            .apply_inline_style(&InlineStyle::font_size(20.0))
            .unwrap();
        surface.ensure_block().unwrap();

        assert_eq!(
            surface.markup(),
            r#"<span style="font-size: 20pt;"><p>ab</p><p>cd</p></span>"#
        );
    }

    #[test]
    fn test_ensure_block_on_emptied_surface() {
        let mut surface = Surface::with_markup("<p>x</p>").unwrap();
        let p = surface.tree().children(surface.root())[0];
        surface.remove_node(&p).unwrap();
        assert_eq!(surface.markup(), "");

        surface.ensure_block().unwrap();
        assert_eq!(surface.markup(), "<p><br/></p>");
    }

    #[test]
    fn test_type_text_at_caret() {
        let mut surface = Surface::with_markup("<p>Helo</p>").unwrap();
        let text = surface.find_text("Helo").unwrap();
        surface.select_text(text, 3, 3).unwrap();
        surface.type_text("l").unwrap();

        assert_eq!(surface.markup(), "<p>Hello</p>");
        assert_eq!(
            surface.current_range(),
            Some(HostRange::collapsed(Boundary::new(text, 4)))
        );
    }

    #[test]
    fn test_type_text_replaces_selection() {
        let mut surface = Surface::with_markup("<p>Hello world</p>").unwrap();
        let text = surface.find_text("world").unwrap();
        surface.select_text(text, 6, 11).unwrap();
        surface.type_text("there").unwrap();
        assert_eq!(surface.text_content(), "Hello there");
    }

    #[test]
    fn test_click_outside_moves_selection_into_chrome() {
        let mut surface = Surface::with_markup("<p>Hello</p>").unwrap();
        let text = surface.find_text("Hello").unwrap();
        surface.select_text(text, 0, 5).unwrap();
        surface.focus_surface().unwrap();

        surface.click_outside();
        let range = surface.current_range().unwrap();
        assert!(!surface.range_in_surface(&range));
        assert!(!surface.surface_has_focus());
        assert_eq!(surface.selected_text(), CHROME_LABEL);
    }

    #[test]
    fn test_set_markup_rejects_malformed_input() {
        let mut surface = Surface::with_markup("<p>keep</p>").unwrap();
        assert!(surface.set_markup("<p>broken").is_err());
        assert_eq!(surface.markup(), "<p>keep</p>");
    }
}
