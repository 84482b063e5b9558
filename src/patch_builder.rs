//! PatchBuilder (spec §4.6): composes a minimal valid unified diff from
//! selected (hunk, optional line-spec) pairs, grouped by path.
use std::collections::BTreeMap;

use crate::model::{BodyLine, Direction, HunkKind, LineTag};
use crate::selector::Selection;

/// One emitted hunk block, ready to be concatenated into a file block.
struct EmittedHunk {
    old_start: usize,
    old_count: usize,
    new_start: usize,
    new_count: usize,
    header_context: String,
    body: Vec<BodyLine>,
}

/// Builds the composed patch and the list of rendered tokens (hash, plus any
/// `:spec` suffix) in selection order, for the renderer's "applied" field.
/// `direction` decides which side of a partially-dropped hunk (spec §4.6
/// rule 3) survives as context when a line-spec excludes some of its
/// change lines.
pub fn build(selections: &[Selection<'_>], direction: Direction) -> (Vec<u8>, Vec<String>) {
    let mut by_path: BTreeMap<String, Vec<&Selection<'_>>> = BTreeMap::new();
    for sel in selections {
        by_path
            .entry(sel.hunk.path.to_string_lossy().into_owned())
            .or_default()
            .push(sel);
    }

    let tokens: Vec<String> = selections.iter().map(|s| s.token.clone()).collect();

    let mut out = Vec::new();
    for (path, sels) in by_path {
        emit_file_block(&mut out, &path, &sels, direction);
    }
    (out, tokens)
}

fn emit_file_block(out: &mut Vec<u8>, path: &str, sels: &[&Selection<'_>], direction: Direction) {
    let first = sels[0].hunk;
    let is_new_file = matches!(first.kind, HunkKind::NewFile | HunkKind::UntrackedNew);
    let is_deleted = matches!(first.kind, HunkKind::DeletedFile);

    out.extend_from_slice(format!("diff --git a/{path} b/{path}\n").as_bytes());
    if is_new_file {
        let mode = first
            .file_flags
            .new_file_mode
            .as_deref()
            .unwrap_or("100644");
        out.extend_from_slice(format!("new file mode {mode}\n").as_bytes());
    }
    if is_deleted {
        let mode = first
            .file_flags
            .deleted_file_mode
            .as_deref()
            .unwrap_or("100644");
        out.extend_from_slice(format!("deleted file mode {mode}\n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "--- {}\n",
            if is_new_file { "/dev/null".to_string() } else { format!("a/{path}") }
        )
        .as_bytes(),
    );
    out.extend_from_slice(
        format!(
            "+++ {}\n",
            if is_deleted { "/dev/null".to_string() } else { format!("b/{path}") }
        )
        .as_bytes(),
    );

    let mut ordered: Vec<&&Selection<'_>> = sels.iter().collect();
    ordered.sort_by_key(|s| {
        let h = s.hunk;
        match h.stable_side {
            crate::model::StableSide::New => h.new_range.start,
            crate::model::StableSide::Old => h.old_range.start,
        }
    });

    for sel in ordered {
        for emitted in build_hunks_for_selection(sel, direction) {
            emit_hunk(out, &emitted);
        }
    }
}

/// Rewrites `body` so that only the change lines named by `keep` (hunk-body
/// indices) survive as `+`/`-` (spec §4.6 rule 3). Every other change line
/// is either promoted to a single context line — if its tag matches the
/// side `direction` expects the target to already hold — or dropped
/// entirely. Demoting *both* the dropped `-` and `+` of one edit to context
/// would claim the target holds content it doesn't; only one survives.
/// `None` keeps the body unchanged — used both here and by the `diff`
/// command to preview a line-spec selection.
pub fn select_body(body: &[BodyLine], keep: Option<&[usize]>, direction: Direction) -> Vec<BodyLine> {
    let keep = match keep {
        None => return body.to_vec(),
        Some(keep) => keep,
    };

    let keep_as_context_tag = match direction {
        Direction::Forward => LineTag::Del,
        Direction::Reverse => LineTag::Add,
    };

    let mut out = Vec::with_capacity(body.len());
    let mut last_line_survived = true;
    for (i, line) in body.iter().enumerate() {
        match line.tag {
            LineTag::Add | LineTag::Del if !keep.contains(&i) => {
                if line.tag == keep_as_context_tag {
                    out.push(BodyLine::new(LineTag::Context, line.content.clone()));
                    last_line_survived = true;
                } else {
                    last_line_survived = false;
                }
            }
            LineTag::NoNewline if !last_line_survived => {
                // Attached to the preceding +/- line (spec §4.2); that line
                // was just dropped, so this marker has nothing left to mark.
            }
            _ => {
                out.push(line.clone());
                last_line_survived = true;
            }
        }
    }
    out
}

/// Rewrites a hunk's body per the selected line-spec (spec §4.6 rules 2-4),
/// returning one or more emitted hunks (more than one only when the
/// line-spec keeps disjoint change-line groups).
fn build_hunks_for_selection(sel: &Selection<'_>, direction: Direction) -> Vec<EmittedHunk> {
    let hunk = sel.hunk;

    let body = select_body(&hunk.body, sel.line_spec_body_indices.as_deref(), direction);

    let old_count = body
        .iter()
        .filter(|l| matches!(l.tag, LineTag::Context | LineTag::Del))
        .count();
    let new_count = body
        .iter()
        .filter(|l| matches!(l.tag, LineTag::Context | LineTag::Add))
        .count();

    let old_start = if matches!(hunk.kind, HunkKind::NewFile | HunkKind::UntrackedNew) {
        0
    } else {
        hunk.old_range.start
    };
    let new_start = if matches!(hunk.kind, HunkKind::DeletedFile) {
        0
    } else {
        hunk.new_range.start
    };

    vec![EmittedHunk {
        old_start,
        old_count,
        new_start,
        new_count,
        header_context: hunk.header_context.clone(),
        body,
    }]
}

fn emit_hunk(out: &mut Vec<u8>, hunk: &EmittedHunk) {
    let header_suffix = if hunk.header_context.is_empty() {
        String::new()
    } else {
        format!(" {}", hunk.header_context)
    };
    out.extend_from_slice(
        format!(
            "@@ -{},{} +{},{} @@{}\n",
            hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count, header_suffix
        )
        .as_bytes(),
    );
    for line in &hunk.body {
        out.push(line.tag.prefix() as u8);
        out.extend_from_slice(&line.content);
        out.push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileFlags, Hunk, HunkKind, LineRange, StableSide, View};
    use std::path::PathBuf;

    fn modify_hunk(hash: &str) -> Hunk {
        Hunk {
            path: PathBuf::from("a.txt"),
            kind: HunkKind::Modify,
            old_range: LineRange { start: 1, count: 1 },
            new_range: LineRange { start: 1, count: 1 },
            body: vec![
                BodyLine::new(LineTag::Del, b"old".to_vec()),
                BodyLine::new(LineTag::Add, b"new".to_vec()),
            ],
            header_context: String::new(),
            file_flags: FileFlags::default(),
            view: View::Unstaged,
            hash: hash.to_string(),
            stable_side: StableSide::New,
            stable_range: (1, 1),
        }
    }

    #[test]
    fn builds_single_whole_hunk_patch() {
        let hunk = modify_hunk("abc1234");
        let sel = Selection {
            hunk: &hunk,
            token: "abc1234".to_string(),
            line_spec_body_indices: None,
        };
        let (patch, tokens) = build(&[sel], Direction::Forward);
        let text = String::from_utf8(patch).unwrap();
        assert!(text.contains("diff --git a/a.txt b/a.txt"));
        assert!(text.contains("-old"));
        assert!(text.contains("+new"));
        assert_eq!(tokens, vec!["abc1234".to_string()]);
    }

    #[test]
    fn new_file_patch_uses_dev_null_old_side() {
        let mut hunk = modify_hunk("abc1234");
        hunk.kind = HunkKind::NewFile;
        hunk.old_range = LineRange { start: 0, count: 0 };
        hunk.file_flags.new_file_mode = Some("100644".to_string());
        let sel = Selection {
            hunk: &hunk,
            token: "abc1234".to_string(),
            line_spec_body_indices: None,
        };
        let (patch, _) = build(&[sel], Direction::Forward);
        let text = String::from_utf8(patch).unwrap();
        assert!(text.contains("--- /dev/null"));
        assert!(text.contains("new file mode 100644"));
    }

    #[test]
    fn line_spec_promotes_dropped_del_to_context_on_forward_apply() {
        let mut hunk = modify_hunk("abc1234");
        hunk.body = vec![
            BodyLine::new(LineTag::Del, b"old1".to_vec()),
            BodyLine::new(LineTag::Add, b"new1".to_vec()),
            BodyLine::new(LineTag::Del, b"old2".to_vec()),
            BodyLine::new(LineTag::Add, b"new2".to_vec()),
        ];
        let sel = Selection {
            hunk: &hunk,
            token: "abc1234:1-2".to_string(),
            line_spec_body_indices: Some(vec![0, 1]),
        };
        // Forward (e.g. `add`): the target still holds the `-` side, so the
        // dropped DEL survives as context and the dropped ADD is omitted.
        let (patch, _) = build(&[sel], Direction::Forward);
        let text = String::from_utf8(patch).unwrap();
        assert!(text.contains("-old1"));
        assert!(text.contains("+new1"));
        assert!(text.contains(" old2"));
        assert!(!text.contains("new2"));
    }

    #[test]
    fn line_spec_promotes_dropped_add_to_context_on_reverse_apply() {
        let mut hunk = modify_hunk("abc1234");
        hunk.body = vec![
            BodyLine::new(LineTag::Del, b"old1".to_vec()),
            BodyLine::new(LineTag::Add, b"new1".to_vec()),
            BodyLine::new(LineTag::Del, b"old2".to_vec()),
            BodyLine::new(LineTag::Add, b"new2".to_vec()),
        ];
        let sel = Selection {
            hunk: &hunk,
            token: "abc1234:1-2".to_string(),
            line_spec_body_indices: Some(vec![0, 1]),
        };
        // Reverse (e.g. `reset`): the target already holds the `+` side, so
        // the dropped ADD survives as context and the dropped DEL is omitted.
        let (patch, _) = build(&[sel], Direction::Reverse);
        let text = String::from_utf8(patch).unwrap();
        assert!(text.contains("-old1"));
        assert!(text.contains("+new1"));
        assert!(text.contains(" new2"));
        assert!(!text.contains("old2"));
    }
}
