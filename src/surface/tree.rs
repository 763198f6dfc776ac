//! Arena tree backing the headless surface
//!
//! Nodes live in a flat vector and refer to each other by [`NodeId`]. Removing
//! a node only detaches it, so stale ids stay valid handles that simply fail
//! the "attached" checks.

use std::cmp::Ordering;

use crate::host::{Boundary, HostError, HostResult};

/// Handle to a node in a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    /// Attributes other than `style`, in insertion order
    pub attributes: Vec<(String, String)>,
    /// Parsed `style` declarations, in insertion order
    pub style: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

/// Byte index of the `offset`-th character (clamped to the end)
pub(crate) fn byte_index(s: &str, offset: usize) -> usize {
    s.char_indices().nth(offset).map(|(i, _)| i).unwrap_or(s.len())
}

impl Tree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn create_document(&mut self) -> NodeId {
        self.alloc(NodeKind::Document)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> HostResult<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(HostError::NotAnElement),
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn set_tag(&mut self, id: NodeId, tag: &str) -> HostResult<()> {
        self.element_mut(id)?.tag = tag.to_ascii_lowercase();
        Ok(())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    pub fn set_text(&mut self, id: NodeId, value: String) {
        if let NodeKind::Text(text) = &mut self.nodes[id.0].kind {
            *text = value;
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Boundary length: characters for text, children for everything else
    pub fn len(&self, id: NodeId) -> usize {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.chars().count(),
            _ => self.nodes[id.0].children.len(),
        }
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?
            .style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> HostResult<()> {
        let element = self.element_mut(id)?;
        match element.style.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => element.style.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> HostResult<()> {
        let element = self.element_mut(id)?;
        match element.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => element.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Remove a node from its parent (no-op for detached nodes)
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Insert `child` into `parent` before `reference` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> HostResult<()> {
        if self.is_text(parent) {
            return Err(HostError::Hierarchy("text nodes cannot have children".to_string()));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(HostError::Hierarchy("node would become its own ancestor".to_string()));
        }
        if reference == Some(child) {
            return Ok(());
        }

        self.detach(child);
        let position = match reference {
            Some(reference) => self
                .children(parent)
                .iter()
                .position(|c| *c == reference)
                .ok_or_else(|| {
                    HostError::Hierarchy("reference is not a child of parent".to_string())
                })?,
            None => self.children(parent).len(),
        };
        self.nodes[parent.0].children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) -> HostResult<()> {
        self.insert_before(parent, child, None)
    }

    pub fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> HostResult<()> {
        let next = self.next_sibling(reference);
        self.insert_before(parent, child, next)
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// `node`, its parent, its grandparent, ... up to the tree root
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let chain = self.ancestors(a);
        self.ancestors(b).into_iter().find(|id| chain.contains(id))
    }

    /// The child of `ancestor` that contains `node`
    pub fn child_containing(&self, ancestor: NodeId, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        loop {
            let parent = self.parent(current)?;
            if parent == ancestor {
                return Some(current);
            }
            current = parent;
        }
    }

    fn path(&self, node: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = node;
        while let Some(index) = self.index_of(current) {
            path.push(index);
            // index_of succeeded, so the parent exists
            current = self.nodes[current.0].parent.unwrap_or(current);
        }
        path.reverse();
        path
    }

    /// Sort key giving document order of boundary points
    pub fn boundary_key(&self, boundary: &Boundary<NodeId>) -> Vec<usize> {
        let mut key = self.path(boundary.node);
        key.push(boundary.offset);
        key
    }

    pub fn compare(&self, a: &Boundary<NodeId>, b: &Boundary<NodeId>) -> Ordering {
        self.boundary_key(a).cmp(&self.boundary_key(b))
    }

    /// Copy of a node without its children
    pub fn clone_shallow(&mut self, id: NodeId) -> NodeId {
        let kind = self.nodes[id.0].kind.clone();
        self.alloc(kind)
    }

    /// Split a text node at `offset`; the original keeps the head, the
    /// returned node (inserted right after it) holds the tail
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> HostResult<NodeId> {
        let text = self.text(id).ok_or(HostError::NotAnElement)?.to_string();
        let length = text.chars().count();
        if offset > length {
            return Err(HostError::InvalidBoundary { offset, length });
        }
        let at = byte_index(&text, offset);
        let tail = self.create_text(&text[at..]);
        self.set_text(id, text[..at].to_string());
        if let Some(parent) = self.parent(id) {
            self.insert_after(parent, tail, id)?;
        }
        Ok(tail)
    }

    /// Remove characters `from..to` from a text node and return them
    pub fn take_chars(&mut self, id: NodeId, from: usize, to: usize) -> String {
        let text = match self.text(id) {
            Some(text) => text.to_string(),
            None => return String::new(),
        };
        let start = byte_index(&text, from);
        let end = byte_index(&text, to.max(from));
        let taken = text[start..end].to_string();
        let mut remaining = String::with_capacity(text.len() - taken.len());
        remaining.push_str(&text[..start]);
        remaining.push_str(&text[end..]);
        self.set_text(id, remaining);
        taken
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.clone(),
            _ => self
                .children(id)
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    /// Text nodes at or below `id`, in document order
    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_text_nodes(id, &mut out);
        out
    }

    fn collect_text_nodes(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if self.is_text(id) {
            out.push(id);
            return;
        }
        for child in self.children(id) {
            self.collect_text_nodes(*child, out);
        }
    }

    /// Merge each run of adjacent non-empty text nodes into its first node
    ///
    /// Empty text nodes are left in place so boundaries pointing at them stay
    /// valid.
    pub fn merge_adjacent_text(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let mut previous: Option<NodeId> = None;
        for child in children {
            let non_empty_text = self.text(child).map(|t| !t.is_empty()).unwrap_or(false);
            if !non_empty_text {
                self.merge_adjacent_text(child);
                previous = None;
                continue;
            }
            match previous {
                Some(head) => {
                    let tail = self.text(child).unwrap_or_default().to_string();
                    let mut merged = self.text(head).unwrap_or_default().to_string();
                    merged.push_str(&tail);
                    self.set_text(head, merged);
                    self.detach(child);
                }
                None => previous = Some(child),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(tree: &mut Tree, text: &str) -> (NodeId, NodeId) {
        let p = tree.create_element("p");
        let t = tree.create_text(text);
        tree.append(p, t).unwrap();
        (p, t)
    }

    #[test]
    fn test_split_text_keeps_head_in_original() {
        let mut tree = Tree::new();
        let (p, t) = paragraph(&mut tree, "Hello");
        let tail = tree.split_text(t, 2).unwrap();

        assert_eq!(tree.text(t), Some("He"));
        assert_eq!(tree.text(tail), Some("llo"));
        assert_eq!(tree.children(p), &[t, tail]);
    }

    #[test]
    fn test_boundary_order() {
        let mut tree = Tree::new();
        let (p, t) = paragraph(&mut tree, "abc");

        let before_text = Boundary::new(p, 0);
        let inside = Boundary::new(t, 1);
        let after_text = Boundary::new(p, 1);

        assert_eq!(tree.compare(&before_text, &inside), Ordering::Less);
        assert_eq!(tree.compare(&inside, &after_text), Ordering::Less);
        assert_eq!(tree.compare(&Boundary::new(t, 3), &after_text), Ordering::Less);
    }

    #[test]
    fn test_insert_rejects_cycles() {
        let mut tree = Tree::new();
        let (p, t) = paragraph(&mut tree, "x");
        assert!(tree.append(t, p).is_err());
        assert!(tree.append(p, p).is_err());
    }

    #[test]
    fn test_merge_adjacent_text() {
        let mut tree = Tree::new();
        let (p, t) = paragraph(&mut tree, "abcd");
        tree.split_text(t, 2).unwrap();
        assert_eq!(tree.children(p).len(), 2);

        tree.merge_adjacent_text(p);
        assert_eq!(tree.children(p), &[t]);
        assert_eq!(tree.text(t), Some("abcd"));
    }

    #[test]
    fn test_take_chars_multibyte() {
        let mut tree = Tree::new();
        let (_, t) = paragraph(&mut tree, "héllo");
        assert_eq!(tree.take_chars(t, 1, 3), "él");
        assert_eq!(tree.text(t), Some("hlo"));
    }
}
