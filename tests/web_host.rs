//! Browser host tests
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use doc_editor_wasm::web::{DomHost, LocalStorage};
use doc_editor_wasm::{
    resolve_caret_rect, EditHost, FormatKind, FormatOutcome, FormattingApplicator,
    KeyValueStorage, RangeSnapshotStore, SelectionTracker,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, Node};

wasm_bindgen_test_configure!(run_in_browser);

fn attach(markup: &str) -> DomHost {
    let document = web_sys::window().unwrap().document().unwrap();
    let element: HtmlElement = document
        .create_element("div")
        .unwrap()
        .dyn_into()
        .unwrap();
    element.set_inner_html(markup);
    document.body().unwrap().append_child(&element).unwrap();
    DomHost::new(element).unwrap()
}

fn first_text(host: &DomHost) -> Node {
    let mut node: Node = host.surface();
    while let Some(child) = node.first_child() {
        node = child;
    }
    node
}

fn select(host: &mut DomHost, from: usize, to: usize) {
    let text = first_text(host);
    host.focus_surface().unwrap();
    host.set_current_range(&doc_editor_wasm::HostRange::new(
        doc_editor_wasm::Boundary::new(text.clone(), from),
        doc_editor_wasm::Boundary::new(text, to),
    ))
    .unwrap();
}

#[wasm_bindgen_test]
fn test_inline_style_wraps_dom_selection() {
    let mut host = attach("<p>Hello world</p>");
    select(&mut host, 6, 11);
    let mut store = RangeSnapshotStore::new();
    store.capture(&host);

    let outcome = FormattingApplicator::new(&mut host, &mut store)
        .apply_inline_style(&doc_editor_wasm::InlineStyle::color("#ff0000"))
        .unwrap();

    assert_eq!(outcome, FormatOutcome::Wrapped);
    assert!(host.markup().contains("world</span>"));
}

#[wasm_bindgen_test]
fn test_native_bold_toggle() {
    let mut host = attach("<p>Hello</p>");
    select(&mut host, 0, 5);
    let mut store = RangeSnapshotStore::new();
    let mut tracker = SelectionTracker::new();
    store.capture(&host);

    FormattingApplicator::new(&mut host, &mut store)
        .apply_weight_or_decoration(FormatKind::Bold, &mut tracker)
        .unwrap();
    assert!(tracker.active().bold);
}

#[wasm_bindgen_test]
fn test_ensure_block_accepts_blocks_under_inline_wrapper() {
    let wrapped = r#"<span style="font-size: 20pt;"><p>ab</p><p>cd</p></span>"#;
    let mut host = attach(wrapped);
    host.ensure_block().unwrap();
    assert_eq!(host.markup(), wrapped);

    let mut loose = attach("loose <b>text</b>");
    loose.ensure_block().unwrap();
    assert_eq!(loose.markup(), "<p>loose <b>text</b></p>");
}

#[wasm_bindgen_test]
fn test_caret_rect_leaves_markup_untouched() {
    let mut host = attach("<p>abc</p>");
    select(&mut host, 0, 0);
    let before = host.markup();

    let first = resolve_caret_rect(&mut host);
    let second = resolve_caret_rect(&mut host);
    assert_eq!(first, second);
    assert_eq!(host.markup(), before);
}

#[wasm_bindgen_test]
fn test_local_storage_round_trip() {
    let mut storage = LocalStorage::new();
    storage.set_item("doc-editor.test", "value").unwrap();
    assert_eq!(
        storage.get_item("doc-editor.test").unwrap(),
        Some("value".to_string())
    );
    storage.remove_item("doc-editor.test").unwrap();
}
