use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use syntaxedit_core::{
    BracketConfig, Command, EditCommand, Editor, EditorConfig, FoldRegion, Position,
    SearchOptions, StaticFoldClassifier, ViewCommand, find_next_brace,
};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    out.push_str("fn bench() {\n");
    for i in 0..line_count {
        out.push_str(&format!(
            "    let v{i:06} = call(\"the quick {{brown}} fox\", [{i}]); // lazy dog\n"
        ));
    }
    out.push('}');
    out
}

fn block_regions(line_count: usize) -> Vec<FoldRegion> {
    (1..line_count)
        .step_by(10)
        .map(|start| FoldRegion::new(start, start + 8))
        .collect()
}

fn bench_brace_match_whole_file(c: &mut Criterion) {
    let text = large_text(20_000);
    let lines: Vec<&str> = text.lines().collect();
    let brackets = BracketConfig::default();

    c.bench_function("brace_match/20k_lines", |b| {
        b.iter(|| {
            let found = find_next_brace(&lines[..], Position::new(0, 11), &brackets);
            black_box(found);
        })
    });
}

fn bench_live_search_recompute(c: &mut Criterion) {
    let text = large_text(20_000);
    c.bench_function("live_search/typing_with_highlights", |b| {
        b.iter_batched(
            || {
                let mut editor = Editor::new(&text);
                editor.set_live_search("fox", SearchOptions::default()).unwrap();
                editor
            },
            |mut editor| {
                for _ in 0..10 {
                    editor.insert(0, "x").unwrap();
                }
                black_box(editor.live_search().results().len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    let config = EditorConfig {
        match_braces: true,
        auto_indent: true,
        ..EditorConfig::default()
    };
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || {
                let mut editor = Editor::with_config(&text, config.clone()).unwrap();
                editor.move_to(Position::new(25_000, 4), false);
                editor
            },
            |mut editor| {
                for _ in 0..100 {
                    editor
                        .execute(Command::Edit(EditCommand::InsertText {
                            text: "x".to_string(),
                        }))
                        .unwrap();
                }
                black_box(editor.version());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_fold_all_and_snapshot(c: &mut Criterion) {
    let text = large_text(50_000);
    let mut editor = Editor::new(&text);
    editor.set_classifier(Box::new(StaticFoldClassifier::new(block_regions(50_000))));

    c.bench_function("fold_all/50k_lines", |b| {
        b.iter(|| {
            editor.fold_all();
            editor.unfold_all();
            black_box(editor.visible_line_count());
        })
    });

    editor.fold_all();
    c.bench_function("snapshot/60_rows_folded", |b| {
        b.iter(|| {
            let result = editor
                .execute(Command::View(ViewCommand::GetSnapshot {
                    first_row: 2_500,
                    count: 60,
                }))
                .unwrap();
            black_box(result);
        })
    });
}

criterion_group!(
    benches,
    bench_brace_match_whole_file,
    bench_live_search_recompute,
    bench_typing_in_middle,
    bench_fold_all_and_snapshot
);
criterion_main!(benches);
