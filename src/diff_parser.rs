//! Unified-diff byte stream -> typed hunk records (spec §4.2).
//!
//! Operates on raw bytes throughout, splitting on `b'\n'`, so non-UTF-8
//! paths and content survive untouched until the Renderer (spec §9,
//! property 810: `café.txt`). Grounded on the retrieved `kimpers-stagent`
//! and `nsrosenqvist-nitpik` unified-diff parsers, generalized to operate on
//! `&[u8]` instead of `&str`.
use std::path::PathBuf;

use crate::model::{BodyLine, FileFlags, Hunk, HunkKind, LineRange, LineTag, View};

/// One file block's extended headers, before its hunks are parsed.
struct FileHeader {
    path: PathBuf,
    kind: HunkKind,
    file_flags: FileFlags,
    is_binary: bool,
    is_rename_or_mode_only: bool,
}

/// Parses a full unified-diff byte stream into hunk records for the given
/// `view`. Hashes are computed here since the stable-side anchor is a
/// function of `view` (spec §4.3).
pub fn parse(bytes: &[u8], view: View) -> Vec<Hunk> {
    let lines: Vec<&[u8]> = split_lines(bytes);
    let mut hunks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with(b"diff --git ") {
            let (header, next_i) = parse_file_header(&lines, i);
            i = next_i;

            if header.is_binary || header.is_rename_or_mode_only {
                // spec §3 invariant 5: binary/pure-rename/pure-mode diffs
                // never produce a hunk. Skip to the next file block.
                while i < lines.len() && !lines[i].starts_with(b"diff --git ") {
                    i += 1;
                }
                continue;
            }

            while i < lines.len() && lines[i].starts_with(b"@@ ") {
                let (hunk, next_i) = parse_hunk(&lines, i, &header, view);
                hunks.push(hunk);
                i = next_i;
            }
        } else {
            i += 1;
        }
    }

    hunks
}

/// Splits on `\n`, dropping the trailing empty element a terminating
/// newline would otherwise produce (`git diff` always ends its output with
/// one). Keeping it would append a phantom empty context line to the last
/// hunk of every diff stream (mirrors `untracked::split_lines`'s guard).
fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn parse_file_header(lines: &[&[u8]], start: usize) -> (FileHeader, usize) {
    let header_line = lines[start];
    let (a_path, b_path) = parse_diff_git_line(header_line);

    let mut i = start + 1;
    let mut kind = HunkKind::Modify;
    let mut new_file_mode = None;
    let mut deleted_file_mode = None;
    let mut is_binary = false;
    let mut is_rename = false;
    let mut saw_hunk_or_path_header = false;
    let mut path = b_path.clone();

    while i < lines.len() {
        let line = lines[i];
        if line.starts_with(b"diff --git ") || line.starts_with(b"@@ ") {
            break;
        }

        if let Some(rest) = strip_prefix(line, b"new file mode ") {
            kind = HunkKind::NewFile;
            new_file_mode = Some(lossy(rest));
        } else if let Some(rest) = strip_prefix(line, b"deleted file mode ") {
            kind = HunkKind::DeletedFile;
            deleted_file_mode = Some(lossy(rest));
        } else if line.starts_with(b"rename from ") || line.starts_with(b"rename to ") {
            is_rename = true;
        } else if line.starts_with(b"Binary files ") && line.ends_with(b" differ") {
            is_binary = true;
        } else if let Some(rest) = strip_prefix(line, b"+++ ") {
            if rest != b"/dev/null" {
                path = strip_ab_prefix(rest).to_vec();
            }
            saw_hunk_or_path_header = true;
        } else if let Some(rest) = strip_prefix(line, b"--- ") {
            if rest != b"/dev/null" && matches!(kind, HunkKind::DeletedFile) {
                path = strip_ab_prefix(rest).to_vec();
            }
            saw_hunk_or_path_header = true;
        }

        i += 1;
    }

    if !saw_hunk_or_path_header && path.is_empty() {
        path = a_path;
    }

    // A rename is "pure" (no content hunks follow) only when the block has
    // no `@@` header before the next file; that is enforced by the caller
    // skipping straight to the next `diff --git` when this flag is set and
    // no hunk line was present. We approximate by flagging rename here and
    // letting the caller's presence-of-`@@`-header check decide; a rename
    // *with* content changes still carries `@@` headers and those are
    // parsed normally because `is_rename_or_mode_only` only matters when
    // the loop never sees a `@@` line (handled below by checking ahead).
    let is_rename_or_mode_only = is_rename && !lines[i..].first().is_some_and(|l| l.starts_with(b"@@ "));

    (
        FileHeader {
            path: PathBuf::from(String::from_utf8_lossy(&path).into_owned()),
            kind,
            file_flags: FileFlags {
                new_file_mode,
                deleted_file_mode,
                executable: false,
            },
            is_binary,
            is_rename_or_mode_only,
        },
        i,
    )
}

fn parse_diff_git_line(line: &[u8]) -> (PathBuf, PathBuf) {
    let rest = strip_prefix(line, b"diff --git ").unwrap_or(line);
    // `a/path b/path`: find " b/" split point scanning from the start.
    if let Some(pos) = find_subslice(rest, b" b/") {
        let a = strip_ab_prefix(&rest[..pos]);
        let b = strip_ab_prefix(&rest[pos + 1..]);
        (
            PathBuf::from(String::from_utf8_lossy(a).into_owned()),
            PathBuf::from(String::from_utf8_lossy(b).into_owned()),
        )
    } else {
        (PathBuf::new(), PathBuf::new())
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
}

fn strip_ab_prefix(path: &[u8]) -> &[u8] {
    if let Some(rest) = strip_prefix(path, b"a/") {
        rest
    } else if let Some(rest) = strip_prefix(path, b"b/") {
        rest
    } else {
        path
    }
}

fn strip_prefix<'a>(s: &'a [u8], prefix: &[u8]) -> Option<&'a [u8]> {
    if s.starts_with(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn parse_hunk(lines: &[&[u8]], start: usize, header: &FileHeader, view: View) -> (Hunk, usize) {
    let header_line = lines[start];
    let (old_start, _old_count, new_start, _new_count, header_context) =
        parse_hunk_header(header_line);

    let mut body = Vec::new();
    let mut i = start + 1;

    while i < lines.len() {
        let line = lines[i];
        if line.starts_with(b"@@ ") || line.starts_with(b"diff --git ") {
            break;
        }

        if let Some(tag) = LineTag::from_prefix(line.first().map(|&b| b as char).unwrap_or(' ')) {
            let content = if line.is_empty() { &[][..] } else { &line[1..] };
            body.push(BodyLine::new(tag, content.to_vec()));
        } else if line.is_empty() {
            // A blank line in the body is an omitted-leading-space context line.
            body.push(BodyLine::new(LineTag::Context, Vec::new()));
        }
        // Anything else (shouldn't happen with well-formed git output) is skipped.

        i += 1;
    }

    let old_count = body
        .iter()
        .filter(|l| matches!(l.tag, LineTag::Context | LineTag::Del))
        .count();
    let new_count = body
        .iter()
        .filter(|l| matches!(l.tag, LineTag::Context | LineTag::Add))
        .count();

    let old_range = match header.kind {
        HunkKind::NewFile => LineRange { start: 0, count: 0 },
        _ => LineRange {
            start: old_start,
            count: old_count,
        },
    };
    let new_range = match header.kind {
        HunkKind::DeletedFile => LineRange { start: 0, count: 0 },
        _ => LineRange {
            start: new_start,
            count: new_count,
        },
    };

    let stable_start = Hunk::stable_start(view, old_range, new_range);
    let path_str = header.path.to_string_lossy().into_owned();
    let hash = crate::hasher::hunk_hash(&path_str, stable_start, &body);
    let stable_side = view.stable_side();

    let stable_count = match stable_side {
        crate::model::StableSide::New => new_range.count,
        crate::model::StableSide::Old => old_range.count,
    };
    let stable_range = if stable_start == 0 || stable_count == 0 {
        (0, 0)
    } else {
        (stable_start, stable_start + stable_count - 1)
    };

    let hunk = Hunk {
        path: header.path.clone(),
        kind: header.kind,
        old_range,
        new_range,
        body,
        header_context,
        file_flags: header.file_flags.clone(),
        view,
        hash,
        stable_side,
        stable_range,
    };

    (hunk, i)
}

/// Parses `@@ -a,b +c,d @@ context` (counts may be omitted, meaning 1).
fn parse_hunk_header(line: &[u8]) -> (usize, usize, usize, usize, String) {
    let text = String::from_utf8_lossy(line);
    let after_at = text.strip_prefix("@@ ").unwrap_or(&text);
    let end_at = after_at.find(" @@").unwrap_or(after_at.len());
    let range_part = &after_at[..end_at];
    let header_context = after_at
        .get(end_at + 3..)
        .unwrap_or("")
        .trim()
        .to_string();

    let mut parts = range_part.split_whitespace();
    let old_part = parts.next().unwrap_or("-0,0");
    let new_part = parts.next().unwrap_or("+0,0");

    let (old_start, old_count) = parse_range(old_part.trim_start_matches('-'));
    let (new_start, new_count) = parse_range(new_part.trim_start_matches('+'));

    (old_start, old_count, new_start, new_count, header_context)
}

fn parse_range(range: &str) -> (usize, usize) {
    if let Some((start, count)) = range.split_once(',') {
        (
            start.parse().unwrap_or(0),
            count.parse().unwrap_or(0),
        )
    } else {
        (range.parse().unwrap_or(0), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "\
diff --git a/alpha.txt b/alpha.txt
index abc1234..def5678 100644
--- a/alpha.txt
+++ b/alpha.txt
@@ -1,1 +1,1 @@
-hello
+hello changed
";

    #[test]
    fn parses_single_hunk_modify() {
        let hunks = parse(SIMPLE.as_bytes(), View::Unstaged);
        assert_eq!(hunks.len(), 1);
        let h = &hunks[0];
        assert_eq!(h.path, PathBuf::from("alpha.txt"));
        assert_eq!(h.kind, HunkKind::Modify);
        assert_eq!(h.old_range, LineRange { start: 1, count: 1 });
        assert_eq!(h.new_range, LineRange { start: 1, count: 1 });
        assert_eq!(h.body.len(), 2);
        assert_eq!(h.hash.len(), 7);
    }

    #[test]
    fn new_file_has_zero_old_range() {
        let diff = "\
diff --git a/new.txt b/new.txt
new file mode 100644
index 0000000..abc1234
--- /dev/null
+++ b/new.txt
@@ -0,0 +1,2 @@
+line one
+line two
";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].kind, HunkKind::NewFile);
        assert_eq!(hunks[0].old_range, LineRange { start: 0, count: 0 });
        assert_eq!(hunks[0].new_range.count, 2);
    }

    #[test]
    fn deleted_file_has_zero_new_range() {
        let diff = "\
diff --git a/old.txt b/old.txt
deleted file mode 100644
index abc1234..0000000
--- a/old.txt
+++ /dev/null
@@ -1,2 +0,0 @@
-line one
-line two
";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert_eq!(hunks[0].kind, HunkKind::DeletedFile);
        assert_eq!(hunks[0].new_range, LineRange { start: 0, count: 0 });
    }

    #[test]
    fn binary_files_produce_no_hunks() {
        let diff = "\
diff --git a/image.png b/image.png
index abc..def 100644
Binary files a/image.png and b/image.png differ
";
        assert!(parse(diff.as_bytes(), View::Unstaged).is_empty());
    }

    #[test]
    fn pure_rename_produces_no_hunks() {
        let diff = "\
diff --git a/old_name.rs b/new_name.rs
similarity index 100%
rename from old_name.rs
rename to new_name.rs
";
        assert!(parse(diff.as_bytes(), View::Unstaged).is_empty());
    }

    #[test]
    fn rename_with_content_change_still_produces_a_hunk() {
        let diff = "\
diff --git a/old_name.rs b/new_name.rs
similarity index 95%
rename from old_name.rs
rename to new_name.rs
--- a/old_name.rs
+++ b/new_name.rs
@@ -1,1 +1,1 @@
-old
+new
";
        // The spec only requires skipping *pure* rename/mode diffs; a rename
        // that also changes content still has line-level edits worth
        // reporting, matched against the post-rename path.
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].path, PathBuf::from("new_name.rs"));
    }

    #[test]
    fn multiple_hunks_in_one_file() {
        let diff = "\
diff --git a/foo.rs b/foo.rs
--- a/foo.rs
+++ b/foo.rs
@@ -1,3 +1,3 @@
-old1
+new1
 ctx
@@ -20,3 +20,3 @@
-old2
+new2
 ctx
";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].old_range.start, 1);
        assert_eq!(hunks[1].old_range.start, 20);
    }

    #[test]
    fn multiple_files_in_one_stream() {
        let diff = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -1,1 +1,1 @@
-old_a
+new_a
diff --git a/b.rs b/b.rs
--- a/b.rs
+++ b/b.rs
@@ -1,1 +1,1 @@
-old_b
+new_b
";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].path, PathBuf::from("a.rs"));
        assert_eq!(hunks[1].path, PathBuf::from("b.rs"));
    }

    #[test]
    fn no_newline_marker_is_preserved_as_body_line() {
        let diff = "\
diff --git a/foo.rs b/foo.rs
--- a/foo.rs
+++ b/foo.rs
@@ -1,1 +1,1 @@
-old
+new
\\ No newline at end of file
";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        let last = hunks[0].body.last().unwrap();
        assert_eq!(last.tag, LineTag::NoNewline);
    }

    #[test]
    fn header_context_is_captured() {
        let diff = "\
diff --git a/foo.rs b/foo.rs
--- a/foo.rs
+++ b/foo.rs
@@ -10,3 +10,4 @@ fn some_function()
 context
+added
 context
";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert!(hunks[0].header_context.contains("fn some_function()"));
    }

    #[test]
    fn omitted_hunk_count_means_one() {
        let diff = "\
diff --git a/foo.rs b/foo.rs
--- a/foo.rs
+++ b/foo.rs
@@ -1 +1 @@
-old
+new
";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert_eq!(hunks[0].old_range, LineRange { start: 1, count: 1 });
        assert_eq!(hunks[0].new_range, LineRange { start: 1, count: 1 });
    }

    #[test]
    fn non_utf8_path_bytes_round_trip() {
        // café.txt encoded as UTF-8 bytes embedded directly in the diff text.
        let diff = "diff --git a/caf\u{e9}.txt b/caf\u{e9}.txt\n--- a/caf\u{e9}.txt\n+++ b/caf\u{e9}.txt\n@@ -1 +1 @@\n-a\n+b\n";
        let hunks = parse(diff.as_bytes(), View::Unstaged);
        assert_eq!(hunks[0].path, PathBuf::from("café.txt"));
    }

    #[test]
    fn empty_input_yields_no_hunks() {
        assert!(parse(b"", View::Unstaged).is_empty());
    }
}
