// Selection is preserved across toolbar interactions

use doc_editor_wasm::{
    DocumentRecord, EditHost, Editor, EditorConfig, FormatKind, FormatOutcome, KeyValueStorage,
    ManualTimer, MemoryStorage, SkipReason, Surface,
};

type TestEditor = Editor<Surface, MemoryStorage, ManualTimer>;

fn open_with(markup: &str) -> TestEditor {
    let config = EditorConfig::default();
    let mut storage = MemoryStorage::new();
    let record = DocumentRecord::new("Test", markup);
    storage
        .set_item(&config.storage_key, &record.to_json().unwrap())
        .unwrap();
    Editor::open(Surface::new(), storage, ManualTimer::new(), config)
}

/// Select `from..to` of the first text node containing `needle` and report
/// the change the way pointer-up would
fn select(editor: &mut TestEditor, needle: &str, from: usize, to: usize) {
    let text = editor
        .host()
        .find_text(needle)
        .expect("text should be in the document");
    editor
        .host_mut()
        .select_text(text, from, to)
        .expect("selection should be valid");
    assert!(editor.selection_changed(), "selection inside the surface should be captured");
}

#[test]
fn test_five_toolbar_actions_apply_to_original_selection() {
    let mut editor = open_with("<p>Hello world</p>");
    select(&mut editor, "world", 6, 11);

    // Each toolbar click moves the live selection away from the text first
    editor.host_mut().click_outside();
    editor.set_font_size(14.0).unwrap();
    assert_eq!(editor.host().selected_text(), "world");

    editor.host_mut().click_outside();
    editor.set_color("#ff0000").unwrap();
    assert_eq!(editor.host().selected_text(), "world");

    editor.host_mut().click_outside();
    editor.set_font_family("Georgia").unwrap();
    assert_eq!(editor.host().selected_text(), "world");

    editor.host_mut().click_outside();
    editor.toggle_format(FormatKind::Bold).unwrap();
    assert_eq!(editor.host().selected_text(), "world");

    editor.host_mut().click_outside();
    editor.toggle_format(FormatKind::Italic).unwrap();
    assert_eq!(editor.host().selected_text(), "world");

    let markup = editor.host().markup();
    assert!(markup.starts_with("<p>Hello <span"), "unselected text must stay unstyled: {}", markup);
    for needle in ["font-size: 14pt", "color: #ff0000", "font-family: Georgia", "<b>", "<i>"] {
        assert!(markup.contains(needle), "missing {} in {}", needle, markup);
    }
    assert_eq!(editor.host().text_content(), "Hello world");

    let state = editor.active_formats();
    assert!(state.bold && state.italic && !state.underline);
}

#[test]
fn test_selection_outside_surface_does_not_replace_snapshot() {
    let mut editor = open_with("<p>keep this</p>");
    select(&mut editor, "keep", 0, 4);

    // Selecting menu text is not a change inside the surface
    editor.host_mut().click_outside();
    assert!(!editor.selection_changed());

    let outcome = editor.set_color("#00ff00").unwrap();
    assert_eq!(outcome, FormatOutcome::Wrapped);
    assert_eq!(
        editor.host().markup(),
        r##"<p><span style="color: #00ff00;">keep</span> this</p>"##
    );
}

#[test]
fn test_zero_ranges_keep_previous_snapshot() {
    let mut editor = open_with("<p>keep this</p>");
    select(&mut editor, "this", 5, 9);

    editor.host_mut().clear_selection();
    assert!(!editor.selection_changed());

    editor.set_font_size(20.0).unwrap();
    assert_eq!(editor.host().selected_text(), "this");
}

#[test]
fn test_action_without_any_selection_is_a_noop() {
    let mut editor = open_with("<p>untouched</p>");

    let outcome = editor.set_font_size(12.0).unwrap();
    assert_eq!(outcome, FormatOutcome::Skipped(SkipReason::NoSelection));
    assert_eq!(editor.host().markup(), "<p>untouched</p>");
    assert!(!editor.has_pending_save(), "a skipped action must not schedule a save");
}

#[test]
fn test_stale_snapshot_is_a_noop() {
    let mut editor = open_with("<p>one</p><p>two</p>");
    select(&mut editor, "two", 0, 3);

    // The paragraph holding the snapshot is deleted and focus moves to the menu
    let text = editor.host().find_text("two").unwrap();
    let paragraph = editor.host().parent(&text).unwrap();
    editor.host_mut().remove_node(&paragraph).unwrap();
    editor.host_mut().click_outside();

    let outcome = editor.set_color("#123456").unwrap();
    assert_eq!(outcome, FormatOutcome::Skipped(SkipReason::OutsideSurface));
    assert_eq!(editor.host().markup(), "<p>one</p>");
}
