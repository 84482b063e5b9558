//! `git-hunk count` (spec §1: "trivial wrapper over enumeration").
use crate::commands::Context;
use crate::error::Result;
use crate::model::View;

pub struct CountOptions {
    pub staged: bool,
}

pub fn run(ctx: &Context, opts: CountOptions) -> Result<()> {
    let view = if opts.staged { View::Staged } else { View::Unstaged };
    let hunks = ctx.enumerate(view)?;
    print!("{}", ctx.renderer.render_count(hunks.len()));
    Ok(())
}
