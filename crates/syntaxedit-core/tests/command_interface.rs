use syntaxedit_core::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, Editor, Position,
    SearchCommand, SearchOptions, ViewCommand,
};

fn go_to(editor: &mut Editor, line: usize, column: usize) -> Position {
    match editor
        .execute(Command::Cursor(CursorCommand::GoToLine { line, column }))
        .unwrap()
    {
        CommandResult::Position(position) => position,
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_insert_and_move_cursor() {
    let mut editor = Editor::new("");

    editor
        .execute(Command::Edit(EditCommand::Insert {
            offset: 0,
            text: "fn main() {\n\tbody();\n}\n".to_string(),
        }))
        .unwrap();
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo {
            line: 1,
            column: 3,
        }))
        .unwrap();

    assert_eq!(editor.line_count(), 4);
    assert_eq!(editor.cursor().active, Position::new(1, 3));
}

#[test]
fn test_go_to_line_uses_one_based_visual_columns() {
    let mut editor = Editor::new("fn main() {\n\tbody();\n}");

    // Visual column 5 is the first character after the tab (tab width 4).
    assert_eq!(go_to(&mut editor, 2, 5), Position::new(1, 1));
    // Columns inside the tab round down to the tab itself.
    assert_eq!(go_to(&mut editor, 2, 3), Position::new(1, 0));
    assert_eq!(go_to(&mut editor, 2, 0), Position::new(1, 0));
    // Past the end of a line.
    assert_eq!(go_to(&mut editor, 3, 40), Position::new(2, 1));
}

#[test]
fn test_go_to_line_out_of_range() {
    let mut editor = Editor::new("one\ntwo");

    assert_eq!(go_to(&mut editor, 99, 1), Position::new(1, 3));
    assert_eq!(go_to(&mut editor, 0, 7), Position::new(0, 0));
}

#[test]
fn test_cut_lines_returns_removed_text() {
    let mut editor = Editor::new("a\nb\nc");
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 0 }))
        .unwrap();

    let result = editor
        .execute(Command::Edit(EditCommand::CutLines))
        .unwrap();

    assert!(matches!(result, CommandResult::Text(ref text) if text == "b\n"));
    assert_eq!(editor.text(), "a\nc");
}

#[test]
fn test_invalid_edits_are_rejected() {
    let mut editor = Editor::new("abc");

    let err = editor
        .execute(Command::Edit(EditCommand::Insert {
            offset: 100,
            text: "x".to_string(),
        }))
        .unwrap_err();
    assert_eq!(err, CommandError::InvalidOffset(100));

    let err = editor
        .execute(Command::Edit(EditCommand::Replace {
            start: 1,
            length: 10,
            text: "x".to_string(),
        }))
        .unwrap_err();
    assert_eq!(err, CommandError::InvalidRange { start: 1, end: 11 });

    assert_eq!(editor.text(), "abc");
}

#[test]
fn test_invalid_view_settings_are_rejected() {
    let mut editor = Editor::new("");

    assert_eq!(
        editor
            .execute(Command::View(ViewCommand::SetTabWidth { width: 0 }))
            .unwrap_err(),
        CommandError::InvalidTabWidth
    );
    assert_eq!(
        editor
            .execute(Command::View(ViewCommand::SetIndentWidth { width: 0 }))
            .unwrap_err(),
        CommandError::InvalidIndentWidth
    );
    assert_eq!(editor.config().tab_width, 4);
}

#[test]
fn test_invalid_regex_is_a_search_error() {
    let mut editor = Editor::new("abc");
    let options = SearchOptions {
        regex: true,
        ..SearchOptions::default()
    };

    let err = editor
        .execute(Command::Search(SearchCommand::SetLiveSearch {
            query: "(".to_string(),
            options,
        }))
        .unwrap_err();

    assert!(matches!(err, CommandError::Search(_)));
}

#[test]
fn test_batch_stops_at_first_error() {
    let mut editor = Editor::new("");

    let result = editor.execute_batch([
        Command::Edit(EditCommand::Insert {
            offset: 0,
            text: "a".to_string(),
        }),
        Command::Edit(EditCommand::Insert {
            offset: 5,
            text: "b".to_string(),
        }),
        Command::Edit(EditCommand::Insert {
            offset: 0,
            text: "c".to_string(),
        }),
    ]);

    assert_eq!(result.unwrap_err(), CommandError::InvalidOffset(5));
    assert_eq!(editor.text(), "a");
}

#[test]
fn test_find_next_selects_matches_without_wrapping() {
    let mut editor = Editor::new("foo bar foo");
    let find = Command::Cursor(CursorCommand::FindNext {
        query: "foo".to_string(),
        options: SearchOptions::default(),
    });

    let first = editor.execute(find.clone()).unwrap();
    assert!(matches!(first, CommandResult::SearchMatch { start: 0, end: 3 }));
    assert_eq!(editor.selected_text(), "foo");

    let second = editor.execute(find.clone()).unwrap();
    assert!(matches!(second, CommandResult::SearchMatch { start: 8, end: 11 }));
    assert_eq!(editor.cursor().anchor, Position::new(0, 8));

    let third = editor.execute(find).unwrap();
    assert!(matches!(third, CommandResult::SearchNotFound));
}

#[test]
fn test_find_prev_searches_before_selection() {
    let mut editor = Editor::new("foo bar foo");
    editor.move_to(Position::new(0, 11), false);
    let find = Command::Cursor(CursorCommand::FindPrev {
        query: "FOO".to_string(),
        options: SearchOptions {
            case_sensitive: false,
            ..SearchOptions::default()
        },
    });

    let first = editor.execute(find.clone()).unwrap();
    assert!(matches!(first, CommandResult::SearchMatch { start: 8, end: 11 }));
    let second = editor.execute(find).unwrap();
    assert!(matches!(second, CommandResult::SearchMatch { start: 0, end: 3 }));
}

#[test]
fn test_snapshot_command() {
    let mut editor = Editor::new("a\nb\nc");

    let result = editor
        .execute(Command::View(ViewCommand::GetSnapshot {
            first_row: 1,
            count: 5,
        }))
        .unwrap();

    let CommandResult::Snapshot(snapshot) = result else {
        panic!("expected a snapshot");
    };
    assert_eq!(snapshot.visible_rows, 3);
    let lines: Vec<&str> = snapshot.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(lines, vec!["b", "c"]);
}
