//! Range surgery on the arena tree
//!
//! Follows the DOM's `extractContents` / `surroundContents` / `insertNode`
//! behavior closely enough that the formatting engine sees the same outcomes
//! (including the failure of `surroundContents` on partially selected
//! elements) as it does in a browser.

use std::cmp::Ordering;

use super::tree::{NodeId, Tree};
use crate::host::{Boundary, HostError, HostRange, HostResult};

impl Tree {
    /// Check that a boundary's node is attached under `root` and its offset fits
    pub fn validate_boundary(&self, root: NodeId, boundary: &Boundary<NodeId>) -> HostResult<()> {
        if !self.is_inclusive_ancestor(root, boundary.node) {
            return Err(HostError::Detached);
        }
        let length = self.len(boundary.node);
        if boundary.offset > length {
            return Err(HostError::InvalidBoundary {
                offset: boundary.offset,
                length,
            });
        }
        Ok(())
    }

    pub fn validate_range(&self, root: NodeId, range: &HostRange<NodeId>) -> HostResult<()> {
        self.validate_boundary(root, &range.start)?;
        self.validate_boundary(root, &range.end)?;
        if self.compare(&range.start, &range.end) == Ordering::Greater {
            return Err(HostError::InvalidBoundary {
                offset: range.start.offset,
                length: range.end.offset,
            });
        }
        Ok(())
    }

    /// A node is contained when it starts after the range start and ends
    /// before the range end
    fn is_contained(&self, node: NodeId, range: &HostRange<NodeId>) -> bool {
        let start = Boundary::new(node, 0);
        let end = Boundary::new(node, self.len(node));
        self.compare(&start, &range.start) == Ordering::Greater
            && self.compare(&end, &range.end) == Ordering::Less
    }

    /// Character span `a..b` of text node `text` covered by `range`
    pub fn selected_span(&self, text: NodeId, range: &HostRange<NodeId>) -> Option<(usize, usize)> {
        let length = self.len(text);
        let from = if range.start.node == text {
            range.start.offset
        } else if self.compare(&Boundary::new(text, 0), &range.start) != Ordering::Less {
            0
        } else {
            length
        };
        let to = if range.end.node == text {
            range.end.offset
        } else if self.compare(&Boundary::new(text, length), &range.end) != Ordering::Greater {
            length
        } else {
            0
        };
        (from < to).then_some((from, to))
    }

    /// Text covered by `range`, in document order
    pub fn range_text(&self, scope: NodeId, range: &HostRange<NodeId>) -> String {
        let mut out = String::new();
        for text in self.text_nodes(scope) {
            if let Some((from, to)) = self.selected_span(text, range) {
                let value = self.text(text).unwrap_or_default();
                out.extend(value.chars().skip(from).take(to - from));
            }
        }
        out
    }

    /// Move the contents of `range` out of the tree
    ///
    /// Partially selected elements are cloned (shell only) into the fragment and
    /// keep their unselected part in place. Returns the fragment's top-level
    /// nodes and the boundary the range collapses to.
    pub fn extract_contents(
        &mut self,
        range: &HostRange<NodeId>,
    ) -> HostResult<(Vec<NodeId>, Boundary<NodeId>)> {
        let start = range.start.clone();
        let end = range.end.clone();

        if start == end {
            return Ok((Vec::new(), start));
        }

        if start.node == end.node && self.is_text(start.node) {
            let clone = self.clone_shallow(start.node);
            let data = self.take_chars(start.node, start.offset, end.offset);
            self.set_text(clone, data);
            return Ok((vec![clone], start));
        }

        let common = self
            .common_ancestor(start.node, end.node)
            .ok_or(HostError::Detached)?;

        let first_partial = if self.is_inclusive_ancestor(start.node, end.node) {
            None
        } else {
            self.child_containing(common, start.node)
        };
        let last_partial = if self.is_inclusive_ancestor(end.node, start.node) {
            None
        } else {
            self.child_containing(common, end.node)
        };
        let contained: Vec<NodeId> = self
            .children(common)
            .iter()
            .copied()
            .filter(|child| self.is_contained(*child, range))
            .collect();

        let collapse_to = if self.is_inclusive_ancestor(start.node, end.node) {
            start.clone()
        } else {
            let mut reference = start.node;
            while let Some(parent) = self.parent(reference) {
                if self.is_inclusive_ancestor(parent, end.node) {
                    break;
                }
                reference = parent;
            }
            let parent = self.parent(reference).ok_or(HostError::Detached)?;
            let index = self.index_of(reference).ok_or(HostError::Detached)?;
            Boundary::new(parent, index + 1)
        };

        let mut fragment = Vec::new();

        if let Some(first) = first_partial {
            if self.is_text(first) {
                let clone = self.clone_shallow(first);
                let length = self.len(first);
                let data = self.take_chars(first, start.offset, length);
                self.set_text(clone, data);
                fragment.push(clone);
            } else {
                let clone = self.clone_shallow(first);
                let sub = HostRange::new(start.clone(), Boundary::new(first, self.len(first)));
                let (nested, _) = self.extract_contents(&sub)?;
                for node in nested {
                    self.append(clone, node)?;
                }
                fragment.push(clone);
            }
        }

        for child in contained {
            self.detach(child);
            fragment.push(child);
        }

        if let Some(last) = last_partial {
            if self.is_text(last) {
                let clone = self.clone_shallow(last);
                let data = self.take_chars(last, 0, end.offset);
                self.set_text(clone, data);
                fragment.push(clone);
            } else {
                let clone = self.clone_shallow(last);
                let sub = HostRange::new(Boundary::new(last, 0), end.clone());
                let (nested, _) = self.extract_contents(&sub)?;
                for node in nested {
                    self.append(clone, node)?;
                }
                fragment.push(clone);
            }
        }

        Ok((fragment, collapse_to))
    }

    /// Insert `node` at a boundary, splitting a text node in the middle
    pub fn insert_node(&mut self, at: &Boundary<NodeId>, node: NodeId) -> HostResult<()> {
        if self.is_inclusive_ancestor(node, at.node) {
            return Err(HostError::Hierarchy("cannot insert a node inside itself".to_string()));
        }

        if self.is_text(at.node) {
            let parent = self.parent(at.node).ok_or(HostError::Detached)?;
            let length = self.len(at.node);
            if at.offset == 0 {
                self.insert_before(parent, node, Some(at.node))
            } else if at.offset >= length {
                self.insert_after(parent, node, at.node)
            } else {
                let tail = self.split_text(at.node, at.offset)?;
                self.insert_before(parent, node, Some(tail))
            }
        } else {
            let reference = self.children(at.node).get(at.offset).copied();
            self.insert_before(at.node, node, reference)
        }
    }

    /// Wrap the contents of `range` in `wrapper`
    ///
    /// Fails without touching the tree when an element is only partly inside
    /// the range. Returns the range selecting the wrapper.
    pub fn surround_contents(
        &mut self,
        range: &HostRange<NodeId>,
        wrapper: NodeId,
    ) -> HostResult<HostRange<NodeId>> {
        if self.is_text(wrapper) {
            return Err(HostError::NotAnElement);
        }
        let common = self
            .common_ancestor(range.start.node, range.end.node)
            .ok_or(HostError::Detached)?;

        for (from, other) in [
            (range.start.node, range.end.node),
            (range.end.node, range.start.node),
        ] {
            for node in self.ancestors(from) {
                if node == common {
                    break;
                }
                if !self.is_text(node) && !self.is_inclusive_ancestor(node, other) {
                    return Err(HostError::PartialOverlap);
                }
            }
        }

        let (fragment, at) = self.extract_contents(range)?;
        for child in self.children(wrapper).to_vec() {
            self.detach(child);
        }
        self.insert_node(&at, wrapper)?;
        for node in fragment {
            self.append(wrapper, node)?;
        }

        let parent = self.parent(wrapper).ok_or(HostError::Detached)?;
        let index = self.index_of(wrapper).ok_or(HostError::Detached)?;
        Ok(HostRange::new(
            Boundary::new(parent, index),
            Boundary::new(parent, index + 1),
        ))
    }
}
