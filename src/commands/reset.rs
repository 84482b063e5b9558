//! `git-hunk reset` (spec §4.7, §4.8, §9): the canonical unstage verb —
//! reverse-applies selected staged hunks against the index.
use crate::applier::{self, Operation};
use crate::commands::{distinct_file_count, selected_pairs, Context};
use crate::error::{GitHunkError, Result};
use crate::model::View;
use crate::patch_builder;
use crate::result_mapper;

pub struct ResetOptions {
    pub shas: Vec<String>,
    pub all: bool,
}

pub fn run(ctx: &Context, opts: ResetOptions) -> Result<()> {
    let candidates = ctx.enumerate(View::Staged)?;
    if opts.all && candidates.is_empty() {
        return Err(GitHunkError::NoStagedChanges);
    }
    let selections = ctx.resolve(&opts.shas, opts.all, &candidates, true, "reset")?;
    let hunk_count = selections.len();
    let file_count = distinct_file_count(&selections);

    let target_before = ctx.enumerate(View::Unstaged)?;

    let (patch, _tokens) = patch_builder::build(&selections, Operation::Reset.direction());
    applier::apply(&ctx.git, &patch, Operation::Reset)?;

    let target_after = ctx.enumerate(View::Unstaged)?;
    let pairs = selected_pairs(&selections);
    let records = result_mapper::map_results(&pairs, &target_before, &target_after);

    print!("{}", ctx.renderer.render_merge_records("unstaged", &records));
    ctx.summary(&format!("unstaged {hunk_count} hunk(s) across {file_count} file(s)"));
    Ok(())
}
