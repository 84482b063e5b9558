//! Command handlers: one module per subcommand, orchestrating the control
//! flow of spec.md §2 — *resolve view -> enumerate -> select -> build patch
//! -> snapshot target -> apply -> re-enumerate target -> map results ->
//! render* — over the leaf collaborators in the sibling modules.
pub mod add;
pub mod check;
pub mod count;
pub mod diff;
pub mod list;
pub mod reset;
pub mod restore;
pub mod stash;

use std::path::PathBuf;

use crate::enumerator::{self, EnumerateOptions, TrackedFilter};
use crate::error::{GitHunkError, Result};
use crate::git_view::GitView;
use crate::model::{Hunk, View};
use crate::renderer::Renderer;
use crate::selector::{self, Selection};

/// Shared per-invocation state: the one `GitView`, the resolved `Renderer`,
/// and the global flags every subcommand reads (spec §5: "per-invocation
/// command context", no shared state beyond this).
pub struct Context {
    pub git: GitView,
    pub renderer: Renderer,
    pub unified_context: usize,
    pub file_filter: Option<PathBuf>,
    pub tracked_filter: TrackedFilter,
    pub quiet: bool,
    pub verbose: bool,
}

impl Context {
    /// Enumerates `view`, honoring the context's filters. Returns an empty
    /// list during a merge conflict (spec §1 Non-goal, §3 invariant-adjacent
    /// rule: "0 hunks reported when the index is in a merge-conflict state").
    pub fn enumerate(&self, view: View) -> Result<Vec<Hunk>> {
        if self.git.is_merge_conflict() {
            return Ok(Vec::new());
        }
        let opts = EnumerateOptions {
            unified_context: self.unified_context,
            file_filter: self.file_filter.as_deref(),
            tracked_filter: self.tracked_filter,
        };
        enumerator::enumerate(&self.git, view, &opts)
    }

    /// Resolves `tokens` against `candidates`, or — when `all` is set and
    /// `tokens` is empty — selects every candidate with no line-spec (spec
    /// §6's `--all`: "operate on every hunk in the current view").
    pub fn resolve<'a>(
        &self,
        tokens: &[String],
        all: bool,
        candidates: &'a [Hunk],
        line_specs_allowed: bool,
        command_name: &'static str,
    ) -> Result<Vec<Selection<'a>>> {
        if all {
            if !tokens.is_empty() {
                return Err(GitHunkError::ConflictingFilters {
                    flag_a: "--all",
                    flag_b: "<sha> arguments",
                });
            }
            return Ok(candidates
                .iter()
                .map(|hunk| Selection {
                    hunk,
                    token: hunk.hash.clone(),
                    line_spec_body_indices: None,
                })
                .collect());
        }
        if tokens.is_empty() {
            return Err(GitHunkError::MissingArgs);
        }
        selector::resolve(tokens, candidates, line_specs_allowed, command_name)
    }

    /// Prints a human-readable summary/hint to stderr when `--verbose` is
    /// set (spec §4.9 "Summaries go to stderr and only when --verbose";
    /// §6.2: `--quiet` additionally suppresses them even if both were set).
    pub fn summary(&self, text: &str) {
        if self.verbose && !self.quiet {
            eprintln!("git-hunk: {text}");
        }
    }
}

/// Counts distinct files among `selections`, for verbose summary lines.
pub(crate) fn distinct_file_count(selections: &[Selection<'_>]) -> usize {
    let mut files: Vec<&std::path::Path> = selections.iter().map(|s| s.hunk.path.as_path()).collect();
    files.sort();
    files.dedup();
    files.len()
}

/// `(hunk, rendered token)` pairs, the shape `ResultMapper` and the
/// `add`/`reset` renderers both want.
pub(crate) fn selected_pairs<'a>(selections: &'a [Selection<'a>]) -> Vec<(&'a Hunk, String)> {
    selections
        .iter()
        .map(|s| (s.hunk, s.token.clone()))
        .collect()
}
