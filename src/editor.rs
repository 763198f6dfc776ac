//! Editor session
//!
//! Ties the pieces together for one editable surface: snapshot store,
//! tracker, applicator, caret geometry and debounced persistence. Generic over
//! the host, the storage and the timer so the same session runs in the
//! browser and headless.

use crate::format::{FormatOutcome, FormattingApplicator};
use crate::geometry::resolve_caret_rect;
use crate::host::{EditHost, HostResult};
use crate::models::{
    ActiveFormatState, BlockTag, CaretRect, DocumentRecord, EditorConfig, FormatKind, InlineStyle,
};
use crate::persistence::{
    KeyValueStorage, PersistenceBridge, PersistenceError, SaveDebouncer, SaveTimer, TimerHandle,
};
use crate::selection::{RangeSnapshotStore, SelectionTracker};
use crate::shortcuts::{format_for_chord, KeyChord};

pub struct Editor<H: EditHost, S, T> {
    host: H,
    store: RangeSnapshotStore<H::Node>,
    tracker: SelectionTracker,
    persistence: PersistenceBridge<S>,
    debouncer: SaveDebouncer<T>,
    config: EditorConfig,
    title: String,
}

impl<H, S, T> Editor<H, S, T>
where
    H: EditHost,
    S: KeyValueStorage,
    T: SaveTimer,
{
    /// Open the stored document (or the starter document) in `host`
    pub fn open(mut host: H, storage: S, timer: T, config: EditorConfig) -> Self {
        let persistence = PersistenceBridge::new(storage, config.storage_key.clone());
        let record = persistence.load_or_default(&config);

        if let Err(e) = host.set_markup(&record.body_markup) {
            log::warn!("stored markup could not be loaded ({}), using starter document", e);
            if let Err(e) = host.set_markup(&config.starter_html) {
                log::warn!("starter markup could not be loaded: {}", e);
            }
        }
        if let Err(e) = host.ensure_block() {
            log::warn!("could not add a block to the surface: {}", e);
        }
        log::info!("opened document '{}'", record.title);

        let debouncer = SaveDebouncer::new(timer, config.save_debounce_ms);
        Self {
            host,
            store: RangeSnapshotStore::new(),
            tracker: SelectionTracker::new(),
            persistence,
            debouncer,
            config,
            title: record.title,
        }
    }

    /// Pointer-up / key-up inside the surface
    pub fn selection_changed(&mut self) -> bool {
        self.tracker.on_selection_change(&self.host, &mut self.store)
    }

    fn applicator(&mut self) -> FormattingApplicator<'_, H> {
        FormattingApplicator::new(&mut self.host, &mut self.store)
    }

    fn after_format(&mut self, outcome: FormatOutcome) -> FormatOutcome {
        if outcome.is_applied() {
            self.content_changed();
        }
        outcome
    }

    /// Font size in points
    pub fn set_font_size(&mut self, points: f32) -> HostResult<FormatOutcome> {
        let outcome = self
            .applicator()
            .apply_inline_style(&InlineStyle::font_size(points))?;
        Ok(self.after_format(outcome))
    }

    /// Text color as a hex string
    pub fn set_color(&mut self, hex: &str) -> HostResult<FormatOutcome> {
        let outcome = self.applicator().apply_inline_style(&InlineStyle::color(hex))?;
        Ok(self.after_format(outcome))
    }

    pub fn set_font_family(&mut self, name: &str) -> HostResult<FormatOutcome> {
        let outcome = self.applicator().apply_font_family(name)?;
        Ok(self.after_format(outcome))
    }

    pub fn set_block_style(&mut self, tag: BlockTag) -> HostResult<FormatOutcome> {
        let outcome = self.applicator().apply_block_style(tag)?;
        Ok(self.after_format(outcome))
    }

    pub fn toggle_format(&mut self, kind: FormatKind) -> HostResult<FormatOutcome> {
        let outcome = FormattingApplicator::new(&mut self.host, &mut self.store)
            .apply_weight_or_decoration(kind, &mut self.tracker)?;
        Ok(self.after_format(outcome))
    }

    pub fn insert_link(&mut self, display_text: &str, url: &str) -> HostResult<FormatOutcome> {
        let outcome = self.applicator().apply_hyperlink(display_text, url)?;
        Ok(self.after_format(outcome))
    }

    pub fn caret_rect(&mut self) -> Option<CaretRect> {
        resolve_caret_rect(&mut self.host)
    }

    /// Handle a `keydown` on the surface
    ///
    /// Returns true when the chord was a formatting shortcut; the caller must
    /// then suppress the browser's default action.
    pub fn handle_key_down(&mut self, chord: &KeyChord) -> HostResult<bool> {
        if !self.host.surface_has_focus() {
            return Ok(false);
        }
        let kind = match format_for_chord(chord) {
            Some(kind) => kind,
            None => return Ok(false),
        };

        // The keyboard may have moved the selection since the last key-up
        self.selection_changed();
        self.toggle_format(kind)?;
        Ok(true)
    }

    /// The user edited the surface (typing, paste, deletion)
    pub fn content_changed(&mut self) {
        if let Err(e) = self.host.ensure_block() {
            log::warn!("could not add a block to the surface: {}", e);
        }
        self.debouncer.touch();
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.debouncer.touch();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn active_formats(&self) -> ActiveFormatState {
        self.tracker.active()
    }

    /// Current document as it would be saved
    pub fn record(&self) -> DocumentRecord {
        DocumentRecord::new(self.title.clone(), self.host.markup())
    }

    /// Write immediately, dropping any pending debounced write
    pub fn save_now(&mut self) -> Result<(), PersistenceError> {
        self.debouncer.cancel();
        let record = self.record();
        self.persistence.save(&record)
    }

    /// A save timer elapsed; returns true when it was current and the
    /// document was written
    pub fn on_save_timer(&mut self, handle: TimerHandle) -> Result<bool, PersistenceError> {
        if !self.debouncer.fire(handle) {
            return Ok(false);
        }
        let record = self.record();
        self.persistence.save(&record)?;
        Ok(true)
    }

    /// A save timer elapsed while the session was busy; reschedule the write
    pub fn defer_save(&mut self, handle: TimerHandle) -> bool {
        self.debouncer.defer(handle)
    }

    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
