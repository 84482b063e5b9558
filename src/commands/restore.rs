//! `git-hunk restore` (spec §4.7-§4.9, §9): reverts selected unstaged hunks
//! in the worktree to match the index. Does not merge on a target side — one
//! output line per applied hunk (spec §4.8 last paragraph).
use crate::applier::{self, Operation};
use crate::commands::{distinct_file_count, Context};
use crate::error::{GitHunkError, Result};
use crate::model::{HunkKind, View};
use crate::patch_builder;

pub struct RestoreOptions {
    pub shas: Vec<String>,
    pub all: bool,
    pub dry_run: bool,
    pub force: bool,
}

pub fn run(ctx: &Context, opts: RestoreOptions) -> Result<()> {
    let candidates = ctx.enumerate(View::Unstaged)?;
    if opts.all && candidates.is_empty() {
        return Err(GitHunkError::NoUnstagedChanges);
    }
    let selections = ctx.resolve(&opts.shas, opts.all, &candidates, true, "restore")?;

    if !opts.force {
        if let Some(sel) = selections
            .iter()
            .find(|s| matches!(s.hunk.kind, HunkKind::UntrackedNew))
        {
            return Err(GitHunkError::ForceRequired {
                sha7: sel.hunk.hash.clone(),
                file: sel.hunk.path.to_string_lossy().into_owned(),
            });
        }
    }

    let op = Operation::Restore {
        dry_run: opts.dry_run,
    };
    let (patch, _tokens) = patch_builder::build(&selections, op.direction());
    applier::apply(&ctx.git, &patch, op)?;

    let verb = if opts.dry_run { "would-restore" } else { "restored" };
    let hunk_count = selections.len();
    let file_count = distinct_file_count(&selections);
    let entries: Vec<(String, String)> = selections
        .iter()
        .map(|s| (s.hunk.hash.clone(), s.hunk.path.to_string_lossy().into_owned()))
        .collect();
    print!("{}", ctx.renderer.render_simple_records(verb, &entries));
    ctx.summary(&format!("{verb} {hunk_count} hunk(s) across {file_count} file(s)"));
    Ok(())
}
