//! Selection-preserving formatting
//!
//! Continuous styles (size, color, font family) and links are applied by
//! wrapping the selection in a new element, or by inserting a typing span at a
//! collapsed caret. Bold / italic / underline and block styles are delegated to
//! the host's native commands.

use crate::host::{Boundary, EditHost, HostRange, HostResult};
use crate::models::{BlockTag, FormatKind, InlineStyle, ZERO_WIDTH_SPACE};
use crate::selection::{RangeSnapshotStore, SelectionTracker};

/// Why an action did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither the snapshot nor the live selection gave a range
    NoSelection,
    /// The selection's common ancestor is outside the editable surface
    OutsideSurface,
}

/// What an action did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The selection was wrapped directly
    Wrapped,
    /// Direct wrapping failed; the content was extracted into the container
    WrappedByExtraction,
    /// A styled zero-width span was inserted at the caret
    TypingSpan,
    Toggled,
    Reblocked,
    Linked,
    Skipped(SkipReason),
}

impl FormatOutcome {
    /// True when the document was changed and needs saving
    pub fn is_applied(&self) -> bool {
        !matches!(self, FormatOutcome::Skipped(_))
    }
}

pub struct FormattingApplicator<'a, H: EditHost> {
    host: &'a mut H,
    store: &'a mut RangeSnapshotStore<H::Node>,
}

impl<'a, H: EditHost> FormattingApplicator<'a, H> {
    pub fn new(host: &'a mut H, store: &'a mut RangeSnapshotStore<H::Node>) -> Self {
        Self { host, store }
    }

    /// Restore the snapshot and return the range to work on
    fn prepare(&mut self) -> Result<HostRange<H::Node>, SkipReason> {
        self.store.restore(&mut *self.host);

        let range = self.host.current_range().ok_or(SkipReason::NoSelection)?;
        if !self.host.range_in_surface(&range) {
            return Err(SkipReason::OutsideSurface);
        }
        Ok(range)
    }

    /// Wrap the selection in `wrapper`, falling back to extract and reinsert
    ///
    /// Returns true when the fallback was used.
    fn wrap_selection(&mut self, range: &HostRange<H::Node>, wrapper: &H::Node) -> HostResult<bool> {
        match self.host.wrap_range(range, wrapper) {
            Ok(()) => Ok(false),
            Err(e) => {
                log::debug!("direct wrap failed ({}), extracting instead", e);
                let (fragment, at) = self.host.extract_range(range)?;
                self.host.append_fragment(wrapper, fragment)?;
                self.host.insert_at(&at, wrapper)?;
                Ok(true)
            }
        }
    }

    fn recapture(&mut self) {
        self.store.capture(&*self.host);
    }

    /// Apply a continuous style to the selection or to text typed next
    pub fn apply_inline_style(&mut self, style: &InlineStyle) -> HostResult<FormatOutcome> {
        let range = match self.prepare() {
            Ok(range) => range,
            Err(reason) => return Ok(skipped(reason)),
        };

        let span = self.host.create_element("span")?;
        self.host.set_style(&span, style.css_name(), &style.value)?;

        let outcome = if range.is_collapsed() {
            let placeholder = self.host.create_text(ZERO_WIDTH_SPACE)?;
            self.host.append_child(&span, &placeholder)?;
            self.host.insert_at(&range.start, &span)?;
            self.host
                .set_current_range(&HostRange::collapsed(Boundary::new(placeholder, 1)))?;
            FormatOutcome::TypingSpan
        } else {
            let fell_back = self.wrap_selection(&range, &span)?;
            self.host.select_contents(&span)?;
            if fell_back {
                FormatOutcome::WrappedByExtraction
            } else {
                FormatOutcome::Wrapped
            }
        };

        log::debug!("applied {}: {} ({:?})", style.css_name(), style.value, outcome);
        self.recapture();
        Ok(outcome)
    }

    pub fn apply_font_family(&mut self, name: &str) -> HostResult<FormatOutcome> {
        self.apply_inline_style(&InlineStyle::font_family(name))
    }

    /// Reformat the blocks touched by the selection as `tag`
    pub fn apply_block_style(&mut self, tag: BlockTag) -> HostResult<FormatOutcome> {
        if let Err(reason) = self.prepare() {
            return Ok(skipped(reason));
        }
        self.host.format_block(tag)?;
        self.recapture();
        Ok(FormatOutcome::Reblocked)
    }

    /// Native bold / italic / underline toggle
    ///
    /// The toolbar state in `tracker` is refreshed from the new selection.
    pub fn apply_weight_or_decoration(
        &mut self,
        kind: FormatKind,
        tracker: &mut SelectionTracker,
    ) -> HostResult<FormatOutcome> {
        if let Err(reason) = self.prepare() {
            return Ok(skipped(reason));
        }
        self.host.focus_surface()?;
        self.host.toggle_format(kind)?;

        tracker.refresh(&*self.host);
        self.recapture();
        Ok(FormatOutcome::Toggled)
    }

    /// Link the selection to `url`, or insert `display_text` as a link at the
    /// caret
    ///
    /// A non-empty selection keeps its own text. No URL validation happens.
    pub fn apply_hyperlink(&mut self, display_text: &str, url: &str) -> HostResult<FormatOutcome> {
        let range = match self.prepare() {
            Ok(range) => range,
            Err(reason) => return Ok(skipped(reason)),
        };

        let link = self.host.create_element("a")?;
        self.host.set_attribute(&link, "href", url)?;

        if range.is_collapsed() {
            let label = if display_text.is_empty() { url } else { display_text };
            let text = self.host.create_text(label)?;
            self.host.append_child(&link, &text)?;
            self.host.insert_at(&range.start, &link)?;

            // Caret after the link text
            self.host.select_contents(&text)?;
            if let Some(selected) = self.host.current_range() {
                self.host.set_current_range(&HostRange::collapsed(selected.end))?;
            }
        } else {
            self.wrap_selection(&range, &link)?;
            self.host.select_contents(&link)?;
        }

        self.recapture();
        Ok(FormatOutcome::Linked)
    }
}

fn skipped(reason: SkipReason) -> FormatOutcome {
    log::debug!("formatting skipped: {:?}", reason);
    FormatOutcome::Skipped(reason)
}
