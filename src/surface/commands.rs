//! Native-like editing commands for the headless surface
//!
//! Mirrors what `document.execCommand` does for bold/italic/underline and
//! `formatBlock`, and what `queryCommandState` reports:
//!
//! - a format is active on a text node when the nearest ancestor that says
//!   anything about it (tag or inline style) turns it on;
//! - toggling on wraps each selected text node in `<b>`/`<i>`/`<u>`;
//! - toggling off lifts each selected text node out of the element carrying
//!   the format, splitting that element around it.

use super::markup::is_void_tag;
use super::tree::NodeId;
use super::Surface;
use crate::host::{Boundary, HostError, HostRange, HostResult};
use crate::models::{ActiveFormatState, BlockTag, FormatKind, ZERO_WIDTH_SPACE};

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "blockquote", "pre", "ul", "ol", "li",
];

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// CSS selector matching any block element
pub fn block_selector() -> String {
    BLOCK_TAGS.join(",")
}

fn is_bold_weight(weight: &str) -> bool {
    match weight {
        "bold" | "bolder" => true,
        other => other.parse::<u32>().map(|w| w >= 600).unwrap_or(false),
    }
}

/// Inline style that switches a format off
fn neutral_style(kind: FormatKind) -> (&'static str, &'static str) {
    match kind {
        FormatKind::Bold => ("font-weight", "normal"),
        FormatKind::Italic => ("font-style", "normal"),
        FormatKind::Underline => ("text-decoration", "none"),
    }
}

fn carrier_tags(kind: FormatKind) -> &'static [&'static str] {
    match kind {
        FormatKind::Bold => &["b", "strong"],
        FormatKind::Italic => &["i", "em"],
        FormatKind::Underline => &["u", "ins"],
    }
}

impl Surface {
    /// What `element` itself says about `kind`, if anything
    fn declares(&self, element: NodeId, kind: FormatKind) -> Option<bool> {
        let data = self.tree.element(element)?;
        let from_style = match kind {
            FormatKind::Bold => self.tree.style(element, "font-weight").map(is_bold_weight),
            FormatKind::Italic => self
                .tree
                .style(element, "font-style")
                .map(|s| s == "italic" || s == "oblique"),
            FormatKind::Underline => self
                .tree
                .style(element, "text-decoration-line")
                .or_else(|| self.tree.style(element, "text-decoration"))
                .map(|d| d.contains("underline")),
        };
        if from_style.is_some() {
            return from_style;
        }

        let tag = data.tag.as_str();
        if carrier_tags(kind).contains(&tag) {
            return Some(true);
        }
        // User-agent styles make headings bold
        if kind == FormatKind::Bold && matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
            return Some(true);
        }
        None
    }

    fn nearest_declaring(&self, node: NodeId, kind: FormatKind) -> Option<(NodeId, bool)> {
        self.tree
            .ancestors(node)
            .into_iter()
            .find_map(|id| self.declares(id, kind).map(|on| (id, on)))
    }

    /// Computed state of `kind` at `node`
    pub fn is_format_active(&self, node: NodeId, kind: FormatKind) -> bool {
        self.nearest_declaring(node, kind)
            .map(|(_, on)| on)
            .unwrap_or(false)
    }

    pub(crate) fn computed_formats(&self) -> ActiveFormatState {
        let mut state = ActiveFormatState::default();
        let range = match &self.selection {
            Some(range) if self.tree.validate_range(self.document, range).is_ok() => range,
            _ => return state,
        };

        let texts: Vec<NodeId> = if range.is_collapsed() {
            Vec::new()
        } else {
            self.tree
                .text_nodes(self.document)
                .into_iter()
                .filter(|t| self.tree.selected_span(*t, range).is_some())
                .collect()
        };

        for kind in FormatKind::ALL {
            let active = if texts.is_empty() {
                self.is_format_active(range.start.node, kind)
            } else {
                texts.iter().all(|t| self.is_format_active(*t, kind))
            };
            state.set(kind, active);
        }
        state
    }

    pub(crate) fn toggle_inline_format(&mut self, kind: FormatKind) -> HostResult<()> {
        let range = match self.selection.clone() {
            Some(range) => range,
            None => return Ok(()),
        };
        self.tree.validate_range(self.root, &range)?;

        if range.is_collapsed() {
            return self.toggle_at_caret(kind, &range.start);
        }

        let texts = self.split_selected_texts(&range)?;
        let (first, last) = match (texts.first(), texts.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(()),
        };

        let active = texts.iter().all(|t| self.is_format_active(*t, kind));
        for text in &texts {
            if active {
                self.lift_out_of_format(*text, kind)?;
            } else if !self.is_format_active(*text, kind) {
                let wrapper = self.tree.create_element(kind.tag_name());
                let parent = self.tree.parent(*text).ok_or(HostError::Detached)?;
                self.tree.insert_before(parent, wrapper, Some(*text))?;
                self.tree.append(wrapper, *text)?;
            }
        }

        self.selection = Some(HostRange::new(
            Boundary::new(first, 0),
            Boundary::new(last, self.tree.len(last)),
        ));
        Ok(())
    }

    /// Collapsed caret: open a pending format run, or step out of one
    fn toggle_at_caret(&mut self, kind: FormatKind, at: &Boundary<NodeId>) -> HostResult<()> {
        let active = self.is_format_active(at.node, kind);
        let placeholder = self.tree.create_text(ZERO_WIDTH_SPACE);

        if active {
            self.tree.insert_node(at, placeholder)?;
            self.lift_out_of_format(placeholder, kind)?;
        } else {
            let wrapper = self.tree.create_element(kind.tag_name());
            self.tree.append(wrapper, placeholder)?;
            self.tree.insert_node(at, wrapper)?;
        }

        self.selection = Some(HostRange::collapsed(Boundary::new(placeholder, 1)));
        Ok(())
    }

    /// Split text at the range edges and return the text nodes now fully
    /// inside the range
    fn split_selected_texts(&mut self, range: &HostRange<NodeId>) -> HostResult<Vec<NodeId>> {
        let mut start = range.start.clone();
        let mut end = range.end.clone();

        if self.tree.is_text(end.node) && end.offset > 0 && end.offset < self.tree.len(end.node) {
            self.tree.split_text(end.node, end.offset)?;
        }
        if self.tree.is_text(start.node)
            && start.offset > 0
            && start.offset < self.tree.len(start.node)
        {
            let tail = self.tree.split_text(start.node, start.offset)?;
            if end.node == start.node {
                end = Boundary::new(tail, end.offset - start.offset);
            }
            start = Boundary::new(tail, 0);
        }

        let range = HostRange::new(start, end);
        Ok(self
            .tree
            .text_nodes(self.root)
            .into_iter()
            .filter(|t| {
                let length = self.tree.len(*t);
                length > 0 && self.tree.selected_span(*t, &range) == Some((0, length))
            })
            .collect())
    }

    fn lift_out_of_format(&mut self, text: NodeId, kind: FormatKind) -> HostResult<()> {
        while let Some((carrier, true)) = self.nearest_declaring(text, kind) {
            let is_block = self.tree.tag(carrier).map(is_block_tag).unwrap_or(true);
            if is_block || !self.tree.is_inclusive_ancestor(self.root, carrier) || carrier == self.root
            {
                let (property, value) = neutral_style(kind);
                let span = self.tree.create_element("span");
                self.tree.set_style(span, property, value)?;
                let parent = self.tree.parent(text).ok_or(HostError::Detached)?;
                self.tree.insert_before(parent, span, Some(text))?;
                self.tree.append(span, text)?;
                return Ok(());
            }

            let middle = self.isolate(carrier, text)?;
            if self.is_plain_carrier(middle, kind) {
                self.unwrap(middle)?;
            } else {
                let (property, value) = neutral_style(kind);
                self.tree.set_style(middle, property, value)?;
            }
        }
        Ok(())
    }

    fn is_plain_carrier(&self, element: NodeId, kind: FormatKind) -> bool {
        match self.tree.element(element) {
            Some(data) => {
                carrier_tags(kind).contains(&data.tag.as_str())
                    && data.attributes.is_empty()
                    && data.style.is_empty()
            }
            None => false,
        }
    }

    /// Split `carrier` around `node`, returning the copy that holds only
    /// `node` (and the ancestors between them)
    fn isolate(&mut self, carrier: NodeId, node: NodeId) -> HostResult<NodeId> {
        let parent = self.tree.parent(node).ok_or(HostError::Detached)?;
        let index = self.tree.index_of(node).ok_or(HostError::Detached)?;
        let after = self.split_element_at(carrier, Boundary::new(parent, index + 1))?;

        let parent = self.tree.parent(node).ok_or(HostError::Detached)?;
        let index = self.tree.index_of(node).ok_or(HostError::Detached)?;
        let middle = self.split_element_at(carrier, Boundary::new(parent, index))?;

        self.prune_if_empty(carrier);
        self.prune_if_empty(after);
        Ok(middle)
    }

    /// Split `ancestor` at `point`: `ancestor` keeps what comes before, a
    /// shallow copy inserted after it receives the rest
    fn split_element_at(&mut self, ancestor: NodeId, point: Boundary<NodeId>) -> HostResult<NodeId> {
        let mut container = point.node;
        let mut offset = point.offset;
        loop {
            let copy = self.tree.clone_shallow(container);
            let children = self.tree.children(container);
            let moving = children[offset.min(children.len())..].to_vec();
            for child in moving {
                self.tree.append(copy, child)?;
            }
            let parent = self.tree.parent(container).ok_or(HostError::Detached)?;
            self.tree.insert_after(parent, copy, container)?;
            if container == ancestor {
                return Ok(copy);
            }
            offset = self.tree.index_of(container).ok_or(HostError::Detached)? + 1;
            container = parent;
        }
    }

    fn has_content(&self, node: NodeId) -> bool {
        if let Some(text) = self.tree.text(node) {
            return !text.is_empty();
        }
        if self.tree.tag(node).map(is_void_tag).unwrap_or(false) {
            return true;
        }
        self.tree.children(node).iter().any(|c| self.has_content(*c))
    }

    fn prune_if_empty(&mut self, node: NodeId) {
        if !self.has_content(node) {
            self.tree.detach(node);
        }
    }

    fn unwrap(&mut self, element: NodeId) -> HostResult<()> {
        let parent = self.tree.parent(element).ok_or(HostError::Detached)?;
        for child in self.tree.children(element).to_vec() {
            self.tree.insert_before(parent, child, Some(element))?;
        }
        self.tree.detach(element);
        Ok(())
    }

    pub(crate) fn reformat_blocks(&mut self, tag: BlockTag) -> HostResult<()> {
        let range = match self.selection.clone() {
            Some(range) => range,
            None => return Ok(()),
        };
        self.tree.validate_range(self.root, &range)?;

        let (first, _) = self.block_of(&range.start).ok_or(HostError::Detached)?;
        let (last, _) = self.block_of(&range.end).ok_or(HostError::Detached)?;
        let blocks = self.tree.children(self.root)[first..=last].to_vec();

        for block in blocks {
            if self.tree.tag(block).map(is_block_tag).unwrap_or(false) {
                self.tree.set_tag(block, tag.tag_name())?;
                continue;
            }
            // Inline wrapper around whole blocks, e.g. a span over a select-all
            let inner = self.outermost_blocks(block);
            if !inner.is_empty() {
                for inner_block in inner {
                    self.tree.set_tag(inner_block, tag.tag_name())?;
                }
            } else {
                let wrapper = self.tree.create_element(tag.tag_name());
                self.tree.insert_before(self.root, wrapper, Some(block))?;
                self.tree.append(wrapper, block)?;
            }
        }
        Ok(())
    }

    /// Block elements under `node` that have no block ancestor below it
    pub(crate) fn outermost_blocks(&self, node: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        for &child in self.tree.children(node) {
            if self.tree.tag(child).map(is_block_tag).unwrap_or(false) {
                found.push(child);
            } else {
                found.extend(self.outermost_blocks(child));
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EditHost;

    #[test]
    fn test_query_reads_tags_and_styles() {
        let surface = Surface::with_markup(
            r#"<p><b>bold</b><span style="font-style: italic">it</span><u>under</u></p>"#,
        )
        .unwrap();
        let bold = surface.find_text("bold").unwrap();
        let it = surface.find_text("it").unwrap();
        let under = surface.find_text("under").unwrap();

        assert!(surface.is_format_active(bold, FormatKind::Bold));
        assert!(!surface.is_format_active(bold, FormatKind::Italic));
        assert!(surface.is_format_active(it, FormatKind::Italic));
        assert!(surface.is_format_active(under, FormatKind::Underline));
    }

    #[test]
    fn test_inline_style_overrides_tag() {
        let surface =
            Surface::with_markup(r#"<p><b><span style="font-weight: 400">plain</span></b></p>"#)
                .unwrap();
        let text = surface.find_text("plain").unwrap();
        assert!(!surface.is_format_active(text, FormatKind::Bold));
    }

    #[test]
    fn test_headings_are_bold() {
        let surface = Surface::with_markup("<h1>Title</h1>").unwrap();
        let text = surface.find_text("Title").unwrap();
        assert!(surface.is_format_active(text, FormatKind::Bold));
    }

    #[test]
    fn test_toggle_bold_wraps_selected_text() {
        let mut surface = Surface::with_markup("<p>Hello world</p>").unwrap();
        let text = surface.find_text("world").unwrap();
        surface.select_text(text, 6, 11).unwrap();
        surface.toggle_format(FormatKind::Bold).unwrap();

        assert_eq!(surface.markup(), "<p>Hello <b>world</b></p>");
        assert_eq!(surface.selected_text(), "world");
        assert!(surface.query_formats().bold);
    }

    #[test]
    fn test_toggle_off_splits_carrier() {
        let mut surface = Surface::with_markup("<p><b>Hello world</b></p>").unwrap();
        let text = surface.find_text("Hello").unwrap();
        surface.select_text(text, 2, 5).unwrap();
        surface.toggle_format(FormatKind::Bold).unwrap();

        assert_eq!(surface.markup(), "<p><b>He</b>llo<b> world</b></p>");
        assert_eq!(surface.selected_text(), "llo");
        assert!(!surface.query_formats().bold);
    }

    #[test]
    fn test_toggle_off_keeps_other_styles_on_carrier() {
        let mut surface = Surface::with_markup(
            r#"<p><span style="font-weight: bold; color: red">Hi</span></p>"#,
        )
        .unwrap();
        let text = surface.find_text("Hi").unwrap();
        surface.select_text(text, 0, 2).unwrap();
        surface.toggle_format(FormatKind::Bold).unwrap();

        assert_eq!(
            surface.markup(),
            r#"<p><span style="font-weight: normal; color: red;">Hi</span></p>"#
        );
    }

    #[test]
    fn test_toggle_off_inside_heading_uses_neutral_span() {
        let mut surface = Surface::with_markup("<h2>Title</h2>").unwrap();
        let text = surface.find_text("Title").unwrap();
        surface.select_text(text, 0, 5).unwrap();
        surface.toggle_format(FormatKind::Bold).unwrap();

        assert_eq!(
            surface.markup(),
            r#"<h2><span style="font-weight: normal;">Title</span></h2>"#
        );
        assert!(!surface.query_formats().bold);
    }

    #[test]
    fn test_mixed_selection_turns_format_on_everywhere() {
        let mut surface = Surface::with_markup("<p><i>ab</i>cd</p>").unwrap();
        let ab = surface.find_text("ab").unwrap();
        let cd = surface.find_text("cd").unwrap();
        surface
            .set_current_range(&HostRange::new(Boundary::new(ab, 0), Boundary::new(cd, 2)))
            .unwrap();
        surface.toggle_format(FormatKind::Italic).unwrap();

        assert_eq!(surface.markup(), "<p><i>ab</i><i>cd</i></p>");
        assert!(surface.query_formats().italic);
    }

    #[test]
    fn test_toggle_at_caret_opens_and_closes_run() {
        let mut surface = Surface::with_markup("<p>ab</p>").unwrap();
        let text = surface.find_text("ab").unwrap();
        surface.select_text(text, 1, 1).unwrap();

        surface.toggle_format(FormatKind::Underline).unwrap();
        assert!(surface.query_formats().underline);

        surface.toggle_format(FormatKind::Underline).unwrap();
        assert!(!surface.query_formats().underline);
        assert_eq!(surface.text_content().replace(ZERO_WIDTH_SPACE, ""), "ab");
    }

    #[test]
    fn test_format_block_renames_touched_blocks() {
        let mut surface = Surface::with_markup("<p>one</p><p>two</p><p>three</p>").unwrap();
        let one = surface.find_text("one").unwrap();
        let two = surface.find_text("two").unwrap();
        surface
            .set_current_range(&HostRange::new(Boundary::new(one, 1), Boundary::new(two, 1)))
            .unwrap();
        surface.format_block(BlockTag::Heading2).unwrap();

        assert_eq!(surface.markup(), "<h2>one</h2><h2>two</h2><p>three</p>");
        // Same nodes, so the selection survives
        assert_eq!(surface.selected_text(), "net");
    }

    #[test]
    fn test_format_block_renames_blocks_inside_inline_wrapper() {
        let mut surface = Surface::with_markup("<span><p>ab</p><p>cd</p></span>").unwrap();
        let ab = surface.find_text("ab").unwrap();
        let cd = surface.find_text("cd").unwrap();
        surface
            .set_current_range(&HostRange::new(Boundary::new(ab, 0), Boundary::new(cd, 2)))
            .unwrap();
        surface.format_block(BlockTag::Heading1).unwrap();

        assert_eq!(surface.markup(), "<span><h1>ab</h1><h1>cd</h1></span>");
    }

    #[test]
    fn test_block_selector_lists_block_tags() {
        let selector = block_selector();
        assert!(selector.starts_with("p,h1,"));
        assert!(selector.split(',').all(is_block_tag));
    }
}
