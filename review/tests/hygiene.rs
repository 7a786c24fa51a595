//! Hygiene — enforces coding standards at test time
//!
//! These tests scan the review crate's `src/` for antipatterns. Each pattern
//! has a budget (ideally zero). If you must add one, fix an existing one
//! first — the budget never grows.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`. Sibling `*_test.rs` files are skipped.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Lines containing `pattern`, per file. Comment lines are ignored so docs
/// can mention a pattern without spending budget.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn check(pattern: &str, budget: usize, hint: &str) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");
    let found = hits(&files, pattern);
    let count: usize = found.iter().map(|(_, c)| c).sum();
    let listing = found
        .iter()
        .map(|(path, c)| format!("  {path}: {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(count <= budget, "`{pattern}` budget exceeded: found {count}, max {budget}. {hint}\n{listing}");
}

macro_rules! budget {
    ($name:ident, $pattern:expr, $max:expr, $hint:expr) => {
        #[test]
        fn $name() {
            check($pattern, $max, $hint);
        }
    };
}

// Panics — input handlers must absorb failures, never crash the page.
budget!(unwrap_budget, ".unwrap()", 0, "Propagate or log instead.");
budget!(expect_budget, ".expect(", 0, "Propagate or log instead.");
budget!(panic_budget, "panic!(", 0, "");
budget!(unreachable_budget, "unreachable!(", 0, "");
budget!(todo_budget, "todo!(", 0, "");
budget!(unimplemented_budget, "unimplemented!(", 0, "");

// Silent loss — discards errors without inspecting.
budget!(silent_discard_budget, "let _ =", 0, "Log the error with tracing.");
budget!(dot_ok_budget, ".ok()", 0, "Log the error with tracing.");

// Style / structure.
budget!(allow_dead_code_budget, "#[allow(dead_code)]", 0, "Delete the code instead.");

// Output — the crate logs through `tracing`, never straight to stdio.
budget!(println_budget, "println!(", 0, "Use tracing.");
budget!(dbg_budget, "dbg!(", 0, "Use tracing.");
