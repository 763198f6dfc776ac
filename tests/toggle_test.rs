// Bold / italic / underline toggles and keyboard shortcuts

use doc_editor_wasm::{
    DocumentRecord, EditHost, Editor, EditorConfig, FormatKind, KeyChord, KeyValueStorage,
    ManualTimer, MemoryStorage, Surface,
};

type TestEditor = Editor<Surface, MemoryStorage, ManualTimer>;

fn open_with(markup: &str) -> TestEditor {
    let config = EditorConfig::default();
    let mut storage = MemoryStorage::new();
    let record = DocumentRecord::new("Toggles", markup);
    storage
        .set_item(&config.storage_key, &record.to_json().unwrap())
        .unwrap();
    Editor::open(Surface::new(), storage, ManualTimer::new(), config)
}

fn select(editor: &mut TestEditor, needle: &str, from: usize, to: usize) {
    let text = editor.host().find_text(needle).expect("text should exist");
    editor.host_mut().select_text(text, from, to).unwrap();
    editor.selection_changed();
}

#[test]
fn test_bold_twice_restores_plain_text() {
    let mut editor = open_with("<p>Hello world</p>");
    select(&mut editor, "world", 6, 11);
    assert!(!editor.active_formats().bold);

    editor.toggle_format(FormatKind::Bold).unwrap();
    assert!(editor.active_formats().bold);
    assert_eq!(editor.host().markup(), "<p>Hello <b>world</b></p>");

    editor.toggle_format(FormatKind::Bold).unwrap();
    assert!(!editor.active_formats().bold);
    assert_eq!(editor.host().markup(), "<p>Hello world</p>");
}

#[test]
fn test_bold_twice_restores_bold_text() {
    let mut editor = open_with("<p><b>strong words</b></p>");
    select(&mut editor, "strong", 0, 6);
    assert!(editor.active_formats().bold);

    editor.toggle_format(FormatKind::Bold).unwrap();
    assert!(!editor.active_formats().bold);

    editor.toggle_format(FormatKind::Bold).unwrap();
    assert!(editor.active_formats().bold);
    assert_eq!(editor.host().selected_text(), "strong");
}

#[test]
fn test_underline_and_italic_are_independent() {
    let mut editor = open_with("<p>styled</p>");
    select(&mut editor, "styled", 0, 6);

    editor.toggle_format(FormatKind::Underline).unwrap();
    editor.toggle_format(FormatKind::Italic).unwrap();

    let state = editor.active_formats();
    assert!(state.underline && state.italic && !state.bold);

    editor.toggle_format(FormatKind::Underline).unwrap();
    let state = editor.active_formats();
    assert!(!state.underline && state.italic);
}

#[test]
fn test_primary_modifier_shortcut_toggles_when_focused() {
    let mut editor = open_with("<p>shortcut</p>");
    select(&mut editor, "shortcut", 0, 8);
    editor.host_mut().focus_surface().unwrap();

    let handled = editor
        .handle_key_down(&KeyChord::new("b").with_ctrl())
        .unwrap();
    assert!(handled, "the caller should suppress the browser default");
    assert_eq!(editor.host().markup(), "<p><b>shortcut</b></p>");

    let handled = editor
        .handle_key_down(&KeyChord::new("U").with_meta())
        .unwrap();
    assert!(handled);
    assert!(editor.active_formats().underline);
}

#[test]
fn test_shortcuts_ignored_without_focus_or_modifier() {
    let mut editor = open_with("<p>plain</p>");
    select(&mut editor, "plain", 0, 5);

    assert!(!editor.handle_key_down(&KeyChord::new("b").with_ctrl()).unwrap());

    editor.host_mut().focus_surface().unwrap();
    assert!(!editor.handle_key_down(&KeyChord::new("b")).unwrap());
    assert!(!editor.handle_key_down(&KeyChord::new("x").with_ctrl()).unwrap());
    assert_eq!(editor.host().markup(), "<p>plain</p>");
}

#[test]
fn test_heading_block_style_keeps_selection() {
    let mut editor = open_with("<p>Title</p><p>Body</p>");
    select(&mut editor, "Title", 0, 5);
    editor.host_mut().click_outside();

    editor
        .set_block_style("h1".parse().unwrap())
        .unwrap();
    assert_eq!(editor.host().markup(), "<h1>Title</h1><p>Body</p>");
    assert_eq!(editor.host().selected_text(), "Title");
    assert!(editor.has_pending_save());
}
