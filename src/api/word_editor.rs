//! `WordEditor`: the editor session exposed to JavaScript
//!
//! One instance per contenteditable surface. Toolbar callbacks pass only the
//! semantic value (points, hex color, block tag, font name, link target).
//!
//! ```js
//! const editor = new WordEditor(document.getElementById('page'), { saveDebounceMs: 250 });
//! page.addEventListener('mouseup', () => editor.selectionChanged());
//! page.addEventListener('keydown', (e) => editor.handleKeyDown(e));
//! sizeBox.addEventListener('change', () => editor.setFontSize(Number(sizeBox.value)));
//! ```

use std::cell::{Cell, RefCell, RefMut};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, KeyboardEvent};

use super::helpers::{deserialize, js_error, serialize, validation_error};
use crate::editor::Editor;
use crate::format::FormatOutcome;
use crate::host::HostResult;
use crate::models::{BlockTag, EditorConfig, FormatKind};
use crate::persistence::TimerHandle;
use crate::shortcuts::KeyChord;
use crate::web::{DomHost, LocalStorage, TimeoutTimer};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

type DomEditor = Editor<DomHost, LocalStorage, TimeoutTimer>;

/// Save timer that elapsed while the editor was borrowed
type DeferredSave = Rc<Cell<Option<TimerHandle>>>;

#[wasm_bindgen]
pub struct WordEditor {
    inner: Rc<RefCell<DomEditor>>,
    deferred_save: DeferredSave,
}

/// Debounced save timer elapsed
fn save_elapsed(
    editor: &Weak<RefCell<DomEditor>>,
    deferred: &DeferredSave,
    handle: TimerHandle,
) {
    let editor = match editor.upgrade() {
        Some(editor) => editor,
        None => return,
    };
    let result = match editor.try_borrow_mut() {
        Ok(mut editor) => editor.on_save_timer(handle),
        Err(_) => {
            wasm_warn!("Editor busy, autosave deferred");
            deferred.set(Some(handle));
            return;
        }
    };
    match result {
        Ok(true) => wasm_log!("Document saved"),
        Ok(false) => {}
        Err(e) => wasm_error!("Autosave failed: {}", e),
    }
}

/// JS-facing result of a formatting call: true when the document changed
fn applied(result: HostResult<FormatOutcome>, context: &str) -> Result<bool, JsValue> {
    let outcome = result.map_err(|e| js_error(e, context))?;
    wasm_log!("{}: {:?}", context, outcome);
    Ok(outcome.is_applied())
}

impl WordEditor {
    /// execCommand dispatches `input` synchronously, so JS handlers can call
    /// back in while a formatting call still holds the editor
    fn editor(&self) -> Result<RefMut<'_, DomEditor>, JsValue> {
        let mut editor = self
            .inner
            .try_borrow_mut()
            .map_err(|_| validation_error("Editor is busy"))?;
        if let Some(handle) = self.deferred_save.take() {
            editor.defer_save(handle);
        }
        Ok(editor)
    }
}

#[wasm_bindgen]
impl WordEditor {
    /// Attach to `surface` and open the stored document
    #[wasm_bindgen(constructor)]
    pub fn new(surface: HtmlElement, options: JsValue) -> Result<WordEditor, JsValue> {
        let config: EditorConfig = if options.is_undefined() || options.is_null() {
            EditorConfig::default()
        } else {
            deserialize(options, "Invalid editor options")?
        };
        let window = web_sys::window().ok_or_else(|| validation_error("No window available"))?;
        let host = DomHost::new(surface).map_err(|e| js_error(e, "Cannot attach editor"))?;
        let storage = LocalStorage::new();

        let deferred_save = DeferredSave::default();
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<DomEditor>>| {
            let weak = weak.clone();
            let deferred = Rc::clone(&deferred_save);
            let timer = TimeoutTimer::new(window, move |handle| {
                save_elapsed(&weak, &deferred, handle)
            });
            RefCell::new(Editor::open(host, storage, timer, config))
        });
        wasm_info!("WordEditor attached");
        Ok(WordEditor {
            inner,
            deferred_save,
        })
    }

    /// Call on pointer-up and key-up inside the surface
    #[wasm_bindgen(js_name = selectionChanged)]
    pub fn selection_changed(&self) -> Result<bool, JsValue> {
        Ok(self.editor()?.selection_changed())
    }

    /// Current B / I / U toggle state as `{bold, italic, underline}`
    #[wasm_bindgen(js_name = activeFormats)]
    pub fn active_formats(&self) -> Result<JsValue, JsValue> {
        let state = self.editor()?.active_formats();
        serialize(&state, "Failed to serialize format state")
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&self, points: f32) -> Result<bool, JsValue> {
        if !points.is_finite() || points <= 0.0 {
            return Err(validation_error(format!("Invalid font size: {}", points)));
        }
        let result = self.editor()?.set_font_size(points);
        applied(result, "setFontSize")
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&self, hex: &str) -> Result<bool, JsValue> {
        let result = self.editor()?.set_color(hex);
        applied(result, "setColor")
    }

    #[wasm_bindgen(js_name = setFontFamily)]
    pub fn set_font_family(&self, name: &str) -> Result<bool, JsValue> {
        let result = self.editor()?.set_font_family(name);
        applied(result, "setFontFamily")
    }

    /// `tag` is one of `p`, `h1`..`h4` (angle brackets allowed)
    #[wasm_bindgen(js_name = setBlockStyle)]
    pub fn set_block_style(&self, tag: &str) -> Result<bool, JsValue> {
        let tag: BlockTag = tag.parse().map_err(validation_error)?;
        let result = self.editor()?.set_block_style(tag);
        applied(result, "setBlockStyle")
    }

    #[wasm_bindgen(js_name = toggleBold)]
    pub fn toggle_bold(&self) -> Result<bool, JsValue> {
        let result = self.editor()?.toggle_format(FormatKind::Bold);
        applied(result, "toggleBold")
    }

    #[wasm_bindgen(js_name = toggleItalic)]
    pub fn toggle_italic(&self) -> Result<bool, JsValue> {
        let result = self.editor()?.toggle_format(FormatKind::Italic);
        applied(result, "toggleItalic")
    }

    #[wasm_bindgen(js_name = toggleUnderline)]
    pub fn toggle_underline(&self) -> Result<bool, JsValue> {
        let result = self.editor()?.toggle_format(FormatKind::Underline);
        applied(result, "toggleUnderline")
    }

    #[wasm_bindgen(js_name = insertLink)]
    pub fn insert_link(&self, display_text: &str, url: &str) -> Result<bool, JsValue> {
        let result = self.editor()?.insert_link(display_text, url);
        applied(result, "insertLink")
    }

    /// Caret rect `{x, y, width, height}` in viewport pixels, or `null`
    #[wasm_bindgen(js_name = caretRect)]
    pub fn caret_rect(&self) -> Result<JsValue, JsValue> {
        match self.editor()?.caret_rect() {
            Some(rect) => serialize(&rect, "Failed to serialize caret rect"),
            None => Ok(JsValue::NULL),
        }
    }

    /// Ctrl/Cmd + B / I / U; prevents the browser default when handled
    #[wasm_bindgen(js_name = handleKeyDown)]
    pub fn handle_key_down(&self, event: &KeyboardEvent) -> Result<bool, JsValue> {
        let chord = KeyChord {
            key: event.key(),
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            shift: event.shift_key(),
            alt: event.alt_key(),
        };
        let handled = self
            .editor()?
            .handle_key_down(&chord)
            .map_err(|e| js_error(e, "handleKeyDown"))?;
        if handled {
            event.prevent_default();
        }
        Ok(handled)
    }

    /// Call on `input` events of the surface
    #[wasm_bindgen(js_name = contentChanged)]
    pub fn content_changed(&self) {
        match self.editor() {
            Ok(mut editor) => editor.content_changed(),
            // Raised by our own execCommand; the formatting call schedules the save
            Err(_) => wasm_log!("contentChanged during formatting ignored"),
        }
    }

    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&self, title: &str) -> Result<(), JsValue> {
        self.editor()?.set_title(title);
        Ok(())
    }

    pub fn title(&self) -> Result<String, JsValue> {
        Ok(self.editor()?.title().to_string())
    }

    /// Serialized markup of the surface
    pub fn html(&self) -> Result<String, JsValue> {
        Ok(self.editor()?.record().body_markup)
    }

    #[wasm_bindgen(js_name = saveNow)]
    pub fn save_now(&self) -> Result<(), JsValue> {
        self.editor()?
            .save_now()
            .map_err(|e| js_error(e, "Save failed"))
    }

    #[wasm_bindgen(js_name = hasPendingSave)]
    pub fn has_pending_save(&self) -> Result<bool, JsValue> {
        Ok(self.editor()?.has_pending_save())
    }
}
