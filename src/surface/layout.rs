//! Monospace line layout for the headless surface
//!
//! Every top-level block is one line; every visible character advances the
//! pen by a fixed width. Like a browser, a collapsed caret sitting at the very
//! start or end of a line has no rect of its own.

use serde::{Deserialize, Serialize};

use super::tree::NodeId;
use super::Surface;
use crate::host::{Boundary, HostRange};
use crate::models::{CaretRect, ZERO_WIDTH_CHAR};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutMetrics {
    pub origin_x: f64,
    pub origin_y: f64,
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            origin_x: 48.0,
            origin_y: 96.0,
            char_width: 8.0,
            line_height: 20.0,
        }
    }
}

fn visible_len<'a>(chars: impl Iterator<Item = &'a char>) -> usize {
    chars.filter(|c| **c != ZERO_WIDTH_CHAR).count()
}

impl Surface {
    fn x_at(&self, column: usize) -> f64 {
        self.metrics.origin_x + column as f64 * self.metrics.char_width
    }

    fn y_at(&self, line: usize) -> f64 {
        self.metrics.origin_y + line as f64 * self.metrics.line_height
    }

    /// Visible characters of a line
    fn line_width(&self, block: NodeId) -> usize {
        self.tree
            .text_nodes(block)
            .into_iter()
            .map(|t| {
                let chars: Vec<char> = self.tree.text(t).unwrap_or_default().chars().collect();
                visible_len(chars.iter())
            })
            .sum()
    }

    /// Visible characters of `block` that come before `boundary`
    fn column_of(&self, block: NodeId, boundary: &Boundary<NodeId>) -> usize {
        let key = self.tree.boundary_key(boundary);
        let mut column = 0;
        for t in self.tree.text_nodes(block) {
            let chars: Vec<char> = self.tree.text(t).unwrap_or_default().chars().collect();
            if t == boundary.node {
                column += visible_len(chars.iter().take(boundary.offset));
                break;
            }
            let end = Boundary::new(t, chars.len());
            if self.tree.boundary_key(&end) <= key {
                column += visible_len(chars.iter());
            } else {
                break;
            }
        }
        column
    }

    pub(crate) fn layout_range_rect(&self, range: &HostRange<NodeId>) -> Option<CaretRect> {
        self.tree.validate_range(self.root, range).ok()?;
        let (first_line, first_block) = self.block_of(&range.start)?;
        let start_col = self.column_of(first_block, &range.start);
        let line_height = self.metrics.line_height;

        if range.is_collapsed() {
            if start_col == 0 || start_col >= self.line_width(first_block) {
                return None;
            }
            return Some(CaretRect::new(
                self.x_at(start_col),
                self.y_at(first_line),
                0.0,
                line_height,
            ));
        }

        let (last_line, last_block) = self.block_of(&range.end)?;
        if first_line == last_line {
            let end_col = self.column_of(last_block, &range.end);
            return Some(CaretRect::new(
                self.x_at(start_col),
                self.y_at(first_line),
                end_col.saturating_sub(start_col) as f64 * self.metrics.char_width,
                line_height,
            ));
        }

        let blocks = self.tree.children(self.root);
        let widest = blocks[first_line..=last_line]
            .iter()
            .map(|b| self.line_width(*b))
            .max()
            .unwrap_or(0);
        Some(CaretRect::new(
            self.metrics.origin_x,
            self.y_at(first_line),
            widest as f64 * self.metrics.char_width,
            (last_line - first_line + 1) as f64 * line_height,
        ))
    }

    pub(crate) fn layout_node_rect(&self, node: NodeId) -> Option<CaretRect> {
        if node == self.root || !self.tree.is_inclusive_ancestor(self.root, node) {
            return None;
        }
        let (line, block) = self.block_of(&Boundary::new(node, 0))?;
        if node == block {
            return Some(CaretRect::new(
                self.metrics.origin_x,
                self.y_at(line),
                self.line_width(block) as f64 * self.metrics.char_width,
                self.metrics.line_height,
            ));
        }

        let parent = self.tree.parent(node)?;
        let index = self.tree.index_of(node)?;
        let start_col = self.column_of(block, &Boundary::new(parent, index));
        let end_col = self.column_of(block, &Boundary::new(parent, index + 1));
        Some(CaretRect::new(
            self.x_at(start_col),
            self.y_at(line),
            end_col.saturating_sub(start_col) as f64 * self.metrics.char_width,
            self.metrics.line_height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EditHost;

    #[test]
    fn test_selection_rect_on_one_line() {
        let mut surface = Surface::with_markup("<p>Hello world</p>").unwrap();
        let text = surface.find_text("Hello").unwrap();
        surface.select_text(text, 6, 11).unwrap();

        let range = surface.current_range().unwrap();
        let rect = surface.range_rect(&range).unwrap();
        assert_eq!(rect, CaretRect::new(48.0 + 48.0, 96.0, 40.0, 20.0));
    }

    #[test]
    fn test_collapsed_caret_at_line_edges_has_no_rect() {
        let mut surface = Surface::with_markup("<p>abc</p><p>def</p>").unwrap();
        let def = surface.find_text("def").unwrap();

        surface.select_text(def, 0, 0).unwrap();
        let range = surface.current_range().unwrap();
        assert!(surface.range_rect(&range).is_none());

        surface.select_text(def, 3, 3).unwrap();
        let range = surface.current_range().unwrap();
        assert!(surface.range_rect(&range).is_none());

        surface.select_text(def, 1, 1).unwrap();
        let range = surface.current_range().unwrap();
        assert_eq!(
            surface.range_rect(&range),
            Some(CaretRect::new(56.0, 116.0, 0.0, 20.0))
        );
    }

    #[test]
    fn test_zero_width_characters_take_no_space() {
        let surface = Surface::with_markup("<p>ab<span>\u{200B}</span>cd</p>").unwrap();
        let p = surface.tree().children(surface.root())[0];
        let span = surface.tree().children(p)[1];

        let rect = surface.node_rect(&span).unwrap();
        assert_eq!(rect, CaretRect::new(64.0, 96.0, 0.0, 20.0));
    }
}
