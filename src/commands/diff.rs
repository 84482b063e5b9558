//! `git-hunk diff` (spec §6): like `list`, plus the raw diff body per hunk,
//! optionally restricted to caller-selected hunks (and their line-specs).
use crate::commands::Context;
use crate::error::Result;
use crate::model::{Direction, Hunk, View};
use crate::patch_builder;

pub struct DiffOptions {
    pub staged: bool,
    pub shas: Vec<String>,
}

pub fn run(ctx: &Context, opts: DiffOptions) -> Result<()> {
    let view = if opts.staged { View::Staged } else { View::Unstaged };
    let candidates = ctx.enumerate(view)?;

    let hunks: Vec<Hunk> = if opts.shas.is_empty() {
        candidates
    } else {
        let selections = ctx.resolve(&opts.shas, false, &candidates, true, "diff")?;
        selections
            .iter()
            .map(|sel| {
                let mut preview = sel.hunk.clone();
                preview.body = patch_builder::select_body(
                    &sel.hunk.body,
                    sel.line_spec_body_indices.as_deref(),
                    Direction::for_view(view),
                );
                preview
            })
            .collect()
    };

    print!("{}", ctx.renderer.render_diff(&hunks));
    Ok(())
}
