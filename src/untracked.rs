//! Untracked Source (spec §4.4): synthesizes a single all-add hunk per
//! untracked file, so untracked files can be selected and staged through the
//! same hash-addressed flow as tracked changes.
use std::path::Path;

use crate::error::Result;
use crate::git_view::{GitView, Side};
use crate::model::{BodyLine, FileFlags, Hunk, HunkKind, LineRange, LineTag, StableSide, View};

/// Builds the synthetic hunk for one untracked file's current contents.
///
/// An empty file still produces a hunk with zero body lines and
/// `new_range = (1, 0)` (spec §4.4 edge case) so it can be staged like any
/// other untracked file.
pub fn synthesize(git: &GitView, path: &Path) -> Result<Hunk> {
    let bytes = git.file_bytes(path, Side::Worktree)?;
    let lines = split_lines(&bytes);

    let body: Vec<BodyLine> = lines
        .iter()
        .map(|(content, _)| BodyLine::new(LineTag::Add, content.to_vec()))
        .collect();

    let mut full_body = Vec::with_capacity(body.len() + 1);
    full_body.extend(body);
    if let Some((_, has_newline)) = lines.last() {
        if !has_newline {
            full_body.push(BodyLine::new(
                LineTag::NoNewline,
                b"No newline at end of file".to_vec(),
            ));
        }
    }

    let new_range = LineRange {
        start: if lines.is_empty() { 1 } else { 1 },
        count: lines.len(),
    };
    let old_range = LineRange { start: 0, count: 0 };

    let path_str = path.to_string_lossy().into_owned();
    let stable_start = Hunk::stable_start(View::UntrackedSynth, old_range, new_range);
    let hash = crate::hasher::hunk_hash(&path_str, stable_start, &full_body);

    let stable_range = if new_range.count == 0 {
        (0, 0)
    } else {
        (new_range.start, new_range.start + new_range.count - 1)
    };

    Ok(Hunk {
        path: path.to_path_buf(),
        kind: HunkKind::UntrackedNew,
        old_range,
        new_range,
        body: full_body,
        header_context: String::new(),
        file_flags: FileFlags {
            new_file_mode: Some(if git.is_executable(path) {
                "100755".to_string()
            } else {
                "100644".to_string()
            }),
            deleted_file_mode: None,
            executable: git.is_executable(path),
        },
        view: View::UntrackedSynth,
        hash,
        stable_side: StableSide::New,
        stable_range,
    })
}

/// Splits raw bytes on `\n`, returning `(line_without_newline, had_newline)`
/// pairs. An empty input yields no lines at all, matching real diff output
/// for an empty file.
fn split_lines(bytes: &[u8]) -> Vec<(&[u8], bool)> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            out.push((&bytes[start..i], true));
            start = i + 1;
        }
    }
    if start < bytes.len() {
        out.push((&bytes[start..], false));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_handles_trailing_newline() {
        let lines = split_lines(b"a\nb\n");
        assert_eq!(lines, vec![(&b"a"[..], true), (&b"b"[..], true)]);
    }

    #[test]
    fn split_lines_handles_missing_trailing_newline() {
        let lines = split_lines(b"a\nb");
        assert_eq!(lines, vec![(&b"a"[..], true), (&b"b"[..], false)]);
    }

    #[test]
    fn split_lines_handles_empty_input() {
        let lines = split_lines(b"");
        assert!(lines.is_empty());
    }
}
