use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use syntaxedit_core::{
    Command, DecorationKind, Editor, EditorConfig, Position, SEARCH_MATCH_STYLE_ID,
    SearchCommand, SearchMatch, SearchOptions, StateChangeType,
};

fn plain() -> SearchOptions {
    SearchOptions::default()
}

fn search_ranges(editor: &Editor) -> Vec<(usize, usize)> {
    editor
        .decorations()
        .iter()
        .filter(|d| d.kind == DecorationKind::SearchMatch)
        .map(|d| (d.range.start, d.range.end))
        .collect()
}

#[test]
fn test_every_occurrence_is_highlighted() {
    let mut editor = Editor::new("cat concat cat");

    editor
        .execute(Command::Search(SearchCommand::SetLiveSearch {
            query: "cat".to_string(),
            options: plain(),
        }))
        .unwrap();

    assert_eq!(search_ranges(&editor), vec![(0, 3), (7, 10), (11, 14)]);
    assert!(
        editor
            .decorations()
            .iter()
            .all(|d| d.style_id == SEARCH_MATCH_STYLE_ID)
    );
    assert_eq!(
        editor.live_search().results(),
        &[
            SearchMatch::new(0, 3),
            SearchMatch::new(7, 10),
            SearchMatch::new(11, 14)
        ]
    );
}

#[test]
fn test_whole_word_and_case_options() {
    let mut editor = Editor::new("Cat concat CAT");
    let options = SearchOptions {
        case_sensitive: false,
        whole_word: true,
        regex: false,
    };

    editor.set_live_search("cat", options).unwrap();

    assert_eq!(search_ranges(&editor), vec![(0, 3), (11, 14)]);
}

#[test]
fn test_matches_follow_edits() {
    let mut editor = Editor::new("one cat");
    editor.set_live_search("cat", plain()).unwrap();
    assert_eq!(search_ranges(&editor), vec![(4, 7)]);

    editor.insert(0, "cat, ").unwrap();
    assert_eq!(search_ranges(&editor), vec![(0, 3), (9, 12)]);

    editor.delete(9, 3).unwrap();
    assert_eq!(search_ranges(&editor), vec![(0, 3)]);
}

#[test]
fn test_highlights_coexist_with_brace_match() {
    let config = EditorConfig {
        match_braces: true,
        ..EditorConfig::default()
    };
    let mut editor = Editor::with_config("(a) a", config).unwrap();

    editor.set_live_search("a", plain()).unwrap();

    let kinds: Vec<DecorationKind> = editor.decorations().iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DecorationKind::BraceMatch,
            DecorationKind::BraceMatch,
            DecorationKind::SearchMatch,
            DecorationKind::SearchMatch
        ]
    );
}

#[test]
fn test_invalid_regex_keeps_previous_results() {
    let mut editor = Editor::new("abc abc");
    editor.set_live_search("abc", plain()).unwrap();

    let regex = SearchOptions {
        regex: true,
        ..plain()
    };
    assert!(editor.set_live_search("a(", regex).is_err());

    assert_eq!(search_ranges(&editor), vec![(0, 3), (4, 7)]);
    assert_eq!(editor.live_search().query(), Some(("abc", plain())));
}

#[test]
fn test_empty_query_and_clear_remove_highlights() {
    let mut editor = Editor::new("abc");
    editor.set_live_search("b", plain()).unwrap();
    assert_eq!(search_ranges(&editor), vec![(1, 2)]);

    editor.set_live_search("", plain()).unwrap();
    assert!(search_ranges(&editor).is_empty());
    assert!(!editor.live_search().is_active());

    editor.set_live_search("b", plain()).unwrap();
    editor
        .execute(Command::Search(SearchCommand::ClearLiveSearch))
        .unwrap();
    assert!(search_ranges(&editor).is_empty());
}

#[test]
fn test_empty_matching_regex_terminates() {
    let mut editor = Editor::new("axxb");
    let regex = SearchOptions {
        regex: true,
        ..plain()
    };

    editor.set_live_search("x*", regex).unwrap();

    assert_eq!(search_ranges(&editor), vec![(1, 3)]);
}

#[test]
fn test_unicode_offsets_are_characters() {
    let mut editor = Editor::new("héllo wörld héllo");

    editor.set_live_search("héllo", plain()).unwrap();

    assert_eq!(search_ranges(&editor), vec![(0, 5), (12, 17)]);
}

#[test]
fn test_recompute_publishes_decoration_change() {
    let mut editor = Editor::new("ab");
    editor.set_live_search("b", plain()).unwrap();
    editor.move_to(Position::new(0, 2), false);

    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_cb = changes.clone();
    editor.subscribe(move |change| {
        changes_cb.lock().expect("lock").push(change.change_type);
    });

    editor.insert_text("b").unwrap();

    let changes = changes.lock().expect("lock");
    assert!(changes.contains(&StateChangeType::DecorationsChanged));
    assert!(changes.contains(&StateChangeType::DocumentModified));
    assert_eq!(search_ranges(&editor), vec![(1, 2), (2, 3)]);
}
