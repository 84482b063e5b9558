//! `git-hunk stash` (spec §4.7 "Stash semantics", §8 scenario 6): builds a
//! native 3-parent (HEAD / index / untracked) git stash entry from exactly
//! the selected hunks, then removes them from the live worktree.
use std::path::PathBuf;

use crate::applier::{self, Operation};
use crate::commands::Context;
use crate::enumerator::TrackedFilter;
use crate::error::{GitHunkError, Result};
use crate::git_view::ApplyMode;
use crate::model::{HunkKind, View};
use crate::patch_builder;
use crate::selector::Selection;

pub struct StashPushOptions {
    pub shas: Vec<String>,
    pub all: bool,
    pub include_untracked: bool,
}

pub fn push(ctx: &Context, opts: StashPushOptions) -> Result<()> {
    if opts.include_untracked && ctx.tracked_filter == TrackedFilter::TrackedOnly {
        return Err(GitHunkError::ConflictingFilters {
            flag_a: "--include-untracked",
            flag_b: "--tracked-only",
        });
    }

    // `--include-untracked` only changes anything in combination with `--all`
    // (spec §4.7: untracked hunks are otherwise only included when
    // explicitly hashed); it is a harmless no-op alongside an explicit list.
    let mut candidates = ctx.enumerate(View::Unstaged)?;
    if opts.all && !opts.include_untracked {
        candidates.retain(|h| !matches!(h.kind, HunkKind::UntrackedNew));
    }
    if opts.all && candidates.is_empty() {
        return Err(GitHunkError::NoUnstagedChanges);
    }

    let selections = ctx.resolve(&opts.shas, opts.all, &candidates, false, "stash")?;

    let head = ctx
        .git
        .head_commit()?
        .ok_or_else(|| GitHunkError::Git("cannot stash: repository has no commits yet".into()))?;
    let branch = ctx.git.current_branch();

    let tracked_selections: Vec<Selection<'_>> = selections
        .iter()
        .filter(|s| !matches!(s.hunk.kind, HunkKind::UntrackedNew))
        .map(clone_selection)
        .collect();
    let untracked_paths: Vec<PathBuf> = selections
        .iter()
        .filter(|s| matches!(s.hunk.kind, HunkKind::UntrackedNew))
        .map(|s| s.hunk.path.clone())
        .collect();

    // Index tree: whatever is already staged, untouched by this stash.
    let index_scratch = ctx.git.scratch_index_copy()?;
    let index_tree = ctx.git.write_tree_with_index(&index_scratch)?;
    let index_commit = ctx
        .git
        .commit_tree(&index_tree, &[&head], &format!("index on {branch}: git-hunk stash"))?;

    // Worktree tree: already-staged + the selected (previously unstaged) hunks.
    let worktree_scratch = ctx.git.scratch_index_copy()?;
    if !tracked_selections.is_empty() {
        let (tracked_patch, _) = patch_builder::build(&tracked_selections, ApplyMode::Cached.direction());
        ctx.git
            .apply_with_index(&tracked_patch, &worktree_scratch, ApplyMode::Cached)?;
    }
    ctx.git
        .add_paths_with_index(&untracked_paths, &worktree_scratch)?;
    let worktree_tree = ctx.git.write_tree_with_index(&worktree_scratch)?;

    let mut parents = vec![head.as_str(), index_commit.as_str()];
    let untracked_commit = if untracked_paths.is_empty() {
        None
    } else {
        let untracked_scratch = ctx.git.scratch_empty_index()?;
        ctx.git
            .add_paths_with_index(&untracked_paths, &untracked_scratch)?;
        let untracked_tree = ctx.git.write_tree_with_index(&untracked_scratch)?;
        Some(ctx.git.commit_tree(
            &untracked_tree,
            &[&head],
            &format!("untracked files on {branch}: git-hunk stash"),
        )?)
    };
    if let Some(ref c) = untracked_commit {
        parents.push(c.as_str());
    }

    let stash_commit = ctx.git.commit_tree(
        &worktree_tree,
        &parents,
        &format!("On {branch}: git-hunk stash"),
    )?;
    ctx.git
        .stash_store(&stash_commit, &format!("On {branch}: git-hunk stash"))?;

    // Step (ii): remove the stashed hunks from the live worktree.
    if !tracked_selections.is_empty() {
        let (tracked_patch, _) = patch_builder::build(&tracked_selections, Operation::StashPush.direction());
        applier::apply(&ctx.git, &tracked_patch, Operation::StashPush)?;
    }
    ctx.git.remove_worktree_paths(&untracked_paths)?;

    let entries: Vec<(String, String)> = selections
        .iter()
        .map(|s| (s.hunk.hash.clone(), s.hunk.path.to_string_lossy().into_owned()))
        .collect();
    print!("{}", ctx.renderer.render_simple_records("stashed", &entries));
    ctx.summary(&format!(
        "stashed {} hunk(s) across {} file(s)",
        selections.len(),
        crate::commands::distinct_file_count(&selections)
    ));
    Ok(())
}

pub fn pop(ctx: &Context) -> Result<()> {
    ctx.git.stash_pop()
}

/// Tracked and untracked selections need independent patches, so split the
/// list by cloning the borrowed `Selection`s rather than partitioning the
/// original `Vec` in place.
fn clone_selection<'a>(s: &Selection<'a>) -> Selection<'a> {
    Selection {
        hunk: s.hunk,
        token: s.token.clone(),
        line_spec_body_indices: s.line_spec_body_indices.clone(),
    }
}
