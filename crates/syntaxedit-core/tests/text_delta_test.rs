use std::sync::{Arc, Mutex};
use syntaxedit_core::{
    Command, EditCommand, Editor, EditorConfig, FoldRegion, Position, StateChange,
    StateChangeType, StaticFoldClassifier,
};

fn record(editor: &mut Editor) -> Arc<Mutex<Vec<StateChange>>> {
    let changes: Arc<Mutex<Vec<StateChange>>> = Arc::new(Mutex::new(Vec::new()));
    let changes_cb = changes.clone();
    editor.subscribe(move |change| {
        changes_cb.lock().expect("lock").push(change.clone());
    });
    changes
}

fn types(changes: &Mutex<Vec<StateChange>>) -> Vec<StateChangeType> {
    changes
        .lock()
        .expect("lock")
        .iter()
        .map(|c| c.change_type)
        .collect()
}

#[test]
fn test_insert_produces_text_delta() {
    let mut editor = Editor::new("abc");
    let changes = record(&mut editor);

    editor
        .execute(Command::Edit(EditCommand::Insert {
            offset: 1,
            text: "X".to_string(),
        }))
        .unwrap();

    let changes = changes.lock().expect("lock");
    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.change_type, StateChangeType::DocumentModified);
    assert_eq!(change.new_version, change.old_version + 1);
    assert_eq!(change.affected_region, Some(1..2));

    let delta = change.text_delta.as_ref().expect("missing delta");
    assert_eq!(delta.before_char_count, 3);
    assert_eq!(delta.after_char_count, 4);
    assert_eq!(delta.edits.len(), 1);
    assert_eq!(delta.edits[0].start, 1);
    assert_eq!(delta.edits[0].deleted_text, "");
    assert_eq!(delta.edits[0].inserted_text, "X");
}

#[test]
fn test_auto_indent_newline_is_one_transaction() {
    let config = EditorConfig {
        auto_indent: true,
        ..EditorConfig::default()
    };
    let mut editor = Editor::with_config("  a\n  ", config).unwrap();
    editor.move_to(Position::new(1, 2), false);
    let changes = record(&mut editor);

    editor
        .execute(Command::Edit(EditCommand::InsertNewline))
        .unwrap();

    assert_eq!(editor.text(), "  a\n\n  ");
    let changes = changes.lock().expect("lock");
    let modified: Vec<&StateChange> = changes
        .iter()
        .filter(|c| c.change_type == StateChangeType::DocumentModified)
        .collect();
    assert_eq!(modified.len(), 1);
    let delta = modified[0].text_delta.as_ref().expect("missing delta");
    assert_eq!(delta.edits.len(), 3);
    assert_eq!(delta.before_char_count, 6);
    assert_eq!(delta.after_char_count, 7);
}

#[test]
fn test_document_change_is_reported_before_cursor_move() {
    let mut editor = Editor::new("abc");
    editor.move_to(Position::new(0, 3), false);
    let changes = record(&mut editor);

    editor.insert_text("d").unwrap();

    assert_eq!(
        types(&changes),
        vec![StateChangeType::DocumentModified, StateChangeType::CursorMoved]
    );
}

#[test]
fn test_selection_change_notifications() {
    let mut editor = Editor::new("hello world");
    let changes = record(&mut editor);

    editor.move_to(Position::new(0, 2), false);
    assert_eq!(types(&changes), vec![StateChangeType::CursorMoved]);

    editor.set_selection(Position::new(0, 0), Position::new(0, 5));
    assert_eq!(
        types(&changes),
        vec![
            StateChangeType::CursorMoved,
            StateChangeType::CursorMoved,
            StateChangeType::SelectionChanged,
        ]
    );
}

#[test]
fn test_no_op_edit_is_silent() {
    let mut editor = Editor::new("abc");
    let version = editor.version();
    let changes = record(&mut editor);

    editor.insert(1, "").unwrap();
    editor.delete_selection().unwrap();

    assert!(types(&changes).is_empty());
    assert_eq!(editor.version(), version);
}

#[test]
fn test_failed_edit_reports_error_without_change() {
    let mut editor = Editor::new("abc");
    let changes = record(&mut editor);

    let err = editor.delete(2, 5).unwrap_err();

    assert_eq!(
        err,
        syntaxedit_core::CommandError::InvalidRange { start: 2, end: 7 }
    );
    assert!(types(&changes).is_empty());
    assert_eq!(editor.text(), "abc");
}

#[test]
fn test_folding_changes_request_layout() {
    let mut editor = Editor::new("a\nb\nc\nd");
    editor.set_classifier(Box::new(StaticFoldClassifier::new([FoldRegion::new(0, 3)])));
    editor.take_redraw_request();
    let changes = record(&mut editor);

    editor.fold_line(0);

    assert!(types(&changes).contains(&StateChangeType::FoldingChanged));
    let redraw = editor.take_redraw_request();
    assert!(redraw.layout);
    assert!(redraw.line_margin);
    assert!(editor.take_redraw_request().is_empty());
}

#[test]
fn test_typing_on_a_line_requests_no_layout() {
    let mut editor = Editor::new("abc\ndef");
    editor.take_redraw_request();

    editor.insert_text("x").unwrap();
    let redraw = editor.take_redraw_request();
    assert!(redraw.viewport);
    assert!(!redraw.layout);

    editor.insert_newline().unwrap();
    assert!(editor.take_redraw_request().layout);
}
