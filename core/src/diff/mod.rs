//! Line-oriented text diffing on top of `similar`.
//!
//! Texts are split with [`split_lines`], diffed with Myers, grouped into
//! hunks with three lines of context and rendered as a unified diff.

pub mod hunk;

pub use hunk::{DiffHunk, DiffLine, LineType};

use similar::{Algorithm, ChangeTag, DiffOp, DiffTag, TextDiff};
use std::time::Duration;

/// Unchanged lines kept around each change.
pub const CONTEXT_LINES: usize = 3;

/// Past this, `similar` settles for a valid but possibly non-minimal diff.
const DIFF_TIMEOUT: Duration = Duration::from_secs(1);

/// Split text into lines without their terminators.
///
/// Recognizes `\n`, `\r\n`, a bare `\r`, and the other Unicode line
/// boundaries (`\x0b`, `\x0c`, `\x1c`..`\x1e`, NEL, LS, PS). A trailing
/// terminator does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..idx]);
        start = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(next, '\n')) = chars.peek() {
                chars.next();
                start = next + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Diff two texts line by line into hunks with `context` lines around
/// each change. Identical texts (line-wise) give no hunks.
///
/// Within a run of changes removed lines come before added lines.
pub fn diff_hunks(old: &str, new: &str, context: usize) -> Vec<DiffHunk> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .timeout(DIFF_TIMEOUT)
        .diff_slices(old_lines.as_slice(), new_lines.as_slice());

    diff.grouped_ops(context)
        .iter()
        .filter(|group| group.iter().any(|op| op.tag() != DiffTag::Equal))
        .map(|group| build_hunk(&diff, group))
        .collect()
}

fn build_hunk(diff: &TextDiff<'_, '_, '_, str>, group: &[DiffOp]) -> DiffHunk {
    let old_begin = group.first().map_or(0, |op| op.old_range().start);
    let old_end = group.last().map_or(0, |op| op.old_range().end);
    let new_begin = group.first().map_or(0, |op| op.new_range().start);
    let new_end = group.last().map_or(0, |op| op.new_range().end);

    let mut lines = Vec::new();
    let mut pending_added: Vec<DiffLine> = Vec::new();
    for op in group {
        for change in diff.iter_changes(op) {
            let line = DiffLine {
                line_type: match change.tag() {
                    ChangeTag::Equal => LineType::Context,
                    ChangeTag::Delete => LineType::Removed,
                    ChangeTag::Insert => LineType::Added,
                },
                content: change.value().to_owned(),
                old_line_number: change.old_index().map(|i| i as u32 + 1),
                new_line_number: change.new_index().map(|i| i as u32 + 1),
            };
            match line.line_type {
                LineType::Added => pending_added.push(line),
                LineType::Removed => lines.push(line),
                LineType::Context => {
                    lines.append(&mut pending_added);
                    lines.push(line);
                }
            }
        }
    }
    lines.append(&mut pending_added);

    DiffHunk {
        old_start: header_start(old_begin, old_end),
        old_count: (old_end - old_begin) as u32,
        new_start: header_start(new_begin, new_end),
        new_count: (new_end - new_begin) as u32,
        lines,
    }
}

/// 1-based start line, or the preceding line for an empty range.
fn header_start(begin: usize, end: usize) -> u32 {
    if begin == end {
        begin as u32
    } else {
        begin as u32 + 1
    }
}

/// Unified diff from `old` to `new`, labelled `--- from_label` /
/// `+++ to_label`. Lines are joined with `\n` without a trailing newline.
/// Returns an empty string when there are no changed lines.
pub fn unified_diff(old: &str, new: &str, from_label: &str, to_label: &str) -> String {
    let hunks = diff_hunks(old, new, CONTEXT_LINES);
    if hunks.is_empty() {
        return String::new();
    }

    let mut out = vec![format!("--- {from_label}"), format!("+++ {to_label}")];
    for hunk in &hunks {
        out.push(hunk.header());
        out.extend(hunk.lines.iter().map(DiffLine::render));
    }
    out.join("\n")
}
