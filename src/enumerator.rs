//! Enumerator: the one place that produces a canonical, totally ordered
//! hunk list for a view, combining GitView's raw diff bytes, the
//! DiffParser, and the Untracked Source (spec §4.2-§4.4).
use std::path::Path;

use crate::diff_parser;
use crate::error::Result;
use crate::git_view::GitView;
use crate::model::{Hunk, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedFilter {
    All,
    TrackedOnly,
    UntrackedOnly,
}

pub struct EnumerateOptions<'a> {
    pub unified_context: usize,
    pub file_filter: Option<&'a Path>,
    pub tracked_filter: TrackedFilter,
}

impl Default for EnumerateOptions<'_> {
    fn default() -> Self {
        Self {
            unified_context: 3,
            file_filter: None,
            tracked_filter: TrackedFilter::All,
        }
    }
}

/// Produces the hunk list for `view`, total-ordered by `(path,
/// stable-start-line)` (spec §5).
pub fn enumerate(git: &GitView, view: View, opts: &EnumerateOptions) -> Result<Vec<Hunk>> {
    let mut hunks = Vec::new();

    if !matches!(opts.tracked_filter, TrackedFilter::UntrackedOnly) {
        let diff_bytes = git.diff(view, opts.unified_context, opts.file_filter)?;
        hunks.extend(diff_parser::parse(&diff_bytes, view));
    }

    let include_untracked = matches!(view, View::Unstaged | View::UntrackedSynth)
        && !matches!(opts.tracked_filter, TrackedFilter::TrackedOnly);

    if include_untracked {
        for path in git.untracked_files()? {
            if let Some(filter) = opts.file_filter {
                if path != filter {
                    continue;
                }
            }
            hunks.push(crate::untracked::synthesize(git, &path)?);
        }
    }

    hunks.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then_with(|| a.stable_range.0.cmp(&b.stable_range.0))
    });

    Ok(hunks)
}
