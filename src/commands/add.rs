//! `git-hunk add` (spec §4.7, §4.8): stages selected unstaged hunks into the
//! index and reports the merge against whatever was already staged.
use crate::applier::{self, Operation};
use crate::commands::{distinct_file_count, selected_pairs, Context};
use crate::error::{GitHunkError, Result};
use crate::model::View;
use crate::patch_builder;
use crate::result_mapper;

pub struct AddOptions {
    pub shas: Vec<String>,
    pub all: bool,
}

pub fn run(ctx: &Context, opts: AddOptions) -> Result<()> {
    let candidates = ctx.enumerate(View::Unstaged)?;
    if opts.all && candidates.is_empty() {
        return Err(GitHunkError::NoUnstagedChanges);
    }
    let selections = ctx.resolve(&opts.shas, opts.all, &candidates, true, "add")?;
    let hunk_count = selections.len();
    let file_count = distinct_file_count(&selections);

    let target_before = ctx.enumerate(View::Staged)?;

    let (patch, _tokens) = patch_builder::build(&selections, Operation::Add.direction());
    applier::apply(&ctx.git, &patch, Operation::Add)?;

    let target_after = ctx.enumerate(View::Staged)?;
    let pairs = selected_pairs(&selections);
    let records = result_mapper::map_results(&pairs, &target_before, &target_after);

    print!("{}", ctx.renderer.render_merge_records("staged", &records));
    ctx.summary(&format!("staged {hunk_count} hunk(s) across {file_count} file(s)"));
    Ok(())
}
