//! Browser host over a contenteditable element
//!
//! Boundary offsets are the DOM's own: UTF-16 code units in text nodes, child
//! indices in elements. Bold / italic / underline and block styles go through
//! `document.execCommand` so they land in the browser's undo history.

use wasm_bindgen::JsCast;
use web_sys::{Document, DocumentFragment, Element, HtmlDocument, HtmlElement, Node, Range, Selection, Text};

use super::platform_error;
use crate::host::{Boundary, EditHost, HostError, HostRange, HostResult};
use crate::models::{ActiveFormatState, BlockTag, CaretRect, FormatKind};
use crate::surface::commands::block_selector;

pub struct DomHost {
    document: Document,
    surface: HtmlElement,
}

impl DomHost {
    pub fn new(surface: HtmlElement) -> HostResult<Self> {
        let document = surface.owner_document().ok_or(HostError::Detached)?;
        surface.set_content_editable("true");
        Ok(Self { document, surface })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.surface
    }

    fn surface_node(&self) -> &Node {
        self.surface.as_ref()
    }

    fn selection(&self) -> HostResult<Selection> {
        self.document
            .get_selection()
            .map_err(platform_error)?
            .ok_or(HostError::NoSelection)
    }

    fn html_document(&self) -> HostResult<&HtmlDocument> {
        self.document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| HostError::Platform("not an HTML document".to_string()))
    }

    fn to_dom_range(&self, range: &HostRange<Node>) -> HostResult<Range> {
        let dom_range = self.document.create_range().map_err(platform_error)?;
        dom_range
            .set_start(&range.start.node, range.start.offset as u32)
            .map_err(platform_error)?;
        dom_range
            .set_end(&range.end.node, range.end.offset as u32)
            .map_err(platform_error)?;
        Ok(dom_range)
    }

    fn element_of<'n>(&self, node: &'n Node) -> HostResult<&'n Element> {
        node.dyn_ref::<Element>().ok_or(HostError::NotAnElement)
    }
}

fn rect_of(rect: web_sys::DomRect) -> CaretRect {
    CaretRect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

impl EditHost for DomHost {
    type Node = Node;
    type Fragment = DocumentFragment;

    fn surface(&self) -> Node {
        self.surface_node().clone()
    }

    fn current_range(&self) -> Option<HostRange<Node>> {
        let selection = self.selection().ok()?;
        if selection.range_count() == 0 {
            return None;
        }
        let range = selection.get_range_at(0).ok()?;
        Some(HostRange::new(
            Boundary::new(range.start_container().ok()?, range.start_offset().ok()? as usize),
            Boundary::new(range.end_container().ok()?, range.end_offset().ok()? as usize),
        ))
    }

    fn set_current_range(&mut self, range: &HostRange<Node>) -> HostResult<()> {
        let dom_range = self.to_dom_range(range)?;
        let selection = self.selection()?;
        selection.remove_all_ranges().map_err(platform_error)?;
        selection.add_range(&dom_range).map_err(platform_error)
    }

    fn select_contents(&mut self, node: &Node) -> HostResult<()> {
        let dom_range = self.document.create_range().map_err(platform_error)?;
        dom_range.select_node_contents(node).map_err(platform_error)?;
        let selection = self.selection()?;
        selection.remove_all_ranges().map_err(platform_error)?;
        selection.add_range(&dom_range).map_err(platform_error)
    }

    fn focus_surface(&mut self) -> HostResult<()> {
        self.surface.focus().map_err(platform_error)
    }

    fn surface_has_focus(&self) -> bool {
        match self.document.active_element() {
            Some(active) => {
                let active: &Node = active.as_ref();
                active.is_same_node(Some(self.surface_node()))
            }
            None => false,
        }
    }

    fn contains(&self, ancestor: &Node, node: &Node) -> bool {
        ancestor.contains(Some(node))
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn common_ancestor(&self, range: &HostRange<Node>) -> HostResult<Node> {
        self.to_dom_range(range)?
            .common_ancestor_container()
            .map_err(platform_error)
    }

    fn create_element(&mut self, tag: &str) -> HostResult<Node> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(platform_error)
    }

    fn create_text(&mut self, text: &str) -> HostResult<Node> {
        Ok(Node::from(self.document.create_text_node(text)))
    }

    fn set_style(&mut self, element: &Node, property: &str, value: &str) -> HostResult<()> {
        element
            .dyn_ref::<HtmlElement>()
            .ok_or(HostError::NotAnElement)?
            .style()
            .set_property(property, value)
            .map_err(platform_error)
    }

    fn set_attribute(&mut self, element: &Node, name: &str, value: &str) -> HostResult<()> {
        self.element_of(element)?
            .set_attribute(name, value)
            .map_err(platform_error)
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> HostResult<()> {
        parent.append_child(child).map(|_| ()).map_err(platform_error)
    }

    fn wrap_range(&mut self, range: &HostRange<Node>, wrapper: &Node) -> HostResult<()> {
        self.to_dom_range(range)?
            .surround_contents(wrapper)
            .map_err(platform_error)
    }

    fn extract_range(
        &mut self,
        range: &HostRange<Node>,
    ) -> HostResult<(DocumentFragment, Boundary<Node>)> {
        let dom_range = self.to_dom_range(range)?;
        let fragment = dom_range.extract_contents().map_err(platform_error)?;
        // The live range collapses to where the contents were
        let at = Boundary::new(
            dom_range.start_container().map_err(platform_error)?,
            dom_range.start_offset().map_err(platform_error)? as usize,
        );
        Ok((fragment, at))
    }

    fn append_fragment(&mut self, parent: &Node, fragment: DocumentFragment) -> HostResult<()> {
        parent
            .append_child(fragment.as_ref())
            .map(|_| ())
            .map_err(platform_error)
    }

    fn insert_at(&mut self, at: &Boundary<Node>, node: &Node) -> HostResult<()> {
        if let Some(text) = at.node.dyn_ref::<Text>() {
            let parent = at.node.parent_node().ok_or(HostError::Detached)?;
            let length = text.length() as usize;
            let reference = if at.offset == 0 {
                Some(at.node.clone())
            } else if at.offset >= length {
                at.node.next_sibling()
            } else {
                let tail = text.split_text(at.offset as u32).map_err(platform_error)?;
                Some(Node::from(tail))
            };
            parent
                .insert_before(node, reference.as_ref())
                .map_err(platform_error)?;
        } else {
            let reference = at.node.child_nodes().item(at.offset as u32);
            at.node
                .insert_before(node, reference.as_ref())
                .map_err(platform_error)?;
        }
        Ok(())
    }

    fn remove_node(&mut self, node: &Node) -> HostResult<()> {
        let parent = node.parent_node().ok_or(HostError::Detached)?;
        parent.remove_child(node).map(|_| ()).map_err(platform_error)
    }

    fn normalize(&mut self, node: &Node) -> HostResult<()> {
        node.normalize();
        Ok(())
    }

    fn toggle_format(&mut self, kind: FormatKind) -> HostResult<()> {
        let handled = self
            .html_document()?
            .exec_command(kind.command_name())
            .map_err(platform_error)?;
        if !handled {
            log::debug!("execCommand('{}') was not handled", kind.command_name());
        }
        Ok(())
    }

    fn format_block(&mut self, tag: BlockTag) -> HostResult<()> {
        let value = format!("<{}>", tag.tag_name());
        self.html_document()?
            .exec_command_with_show_ui_and_value("formatBlock", false, &value)
            .map(|_| ())
            .map_err(platform_error)
    }

    fn query_formats(&self) -> ActiveFormatState {
        let mut state = ActiveFormatState::default();
        if let Ok(document) = self.html_document() {
            for kind in FormatKind::ALL {
                let active = document
                    .query_command_state(kind.command_name())
                    .unwrap_or(false);
                state.set(kind, active);
            }
        }
        state
    }

    fn range_rect(&self, range: &HostRange<Node>) -> Option<CaretRect> {
        let dom_range = self.to_dom_range(range).ok()?;
        Some(rect_of(dom_range.get_bounding_client_rect()))
    }

    fn node_rect(&self, node: &Node) -> Option<CaretRect> {
        let element = node.dyn_ref::<Element>()?;
        Some(rect_of(element.get_bounding_client_rect()))
    }

    fn markup(&self) -> String {
        self.surface.inner_html()
    }

    fn set_markup(&mut self, markup: &str) -> HostResult<()> {
        self.surface.set_inner_html(markup);
        Ok(())
    }

    fn ensure_block(&mut self) -> HostResult<()> {
        let children = self.surface.child_nodes();
        let mut nodes = Vec::new();
        for index in 0..children.length() {
            if let Some(child) = children.item(index) {
                nodes.push(child);
            }
        }

        // Any block, even one under an inline wrapper, satisfies the invariant
        let nested_block = self
            .surface
            .query_selector(&block_selector())
            .map_err(platform_error)?;
        if nested_block.is_some() {
            return Ok(());
        }

        let blank = self
            .surface
            .text_content()
            .map(|t| t.trim().is_empty())
            .unwrap_or(true);
        if blank {
            self.surface.set_inner_html("<p><br></p>");
            return Ok(());
        }

        let paragraph = self.create_element("p")?;
        for node in nodes {
            paragraph.append_child(&node).map_err(platform_error)?;
        }
        self.surface
            .append_child(&paragraph)
            .map(|_| ())
            .map_err(platform_error)
    }
}
