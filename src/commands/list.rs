//! `git-hunk list` (spec §6): the pure enumeration command.
use crate::commands::Context;
use crate::error::Result;
use crate::model::View;
use crate::renderer::Mode;

pub struct ListOptions {
    pub staged: bool,
    pub oneline: bool,
}

pub fn run(ctx: &Context, opts: ListOptions) -> Result<()> {
    let view = if opts.staged { View::Staged } else { View::Unstaged };
    let hunks = ctx.enumerate(view)?;

    // `--oneline` only suppresses diff bodies in human mode; porcelain never
    // embeds them for `list` (spec §6 porcelain table: `list` has exactly
    // the five header fields).
    let oneline = opts.oneline || ctx.renderer.mode == Mode::Porcelain;
    print!("{}", ctx.renderer.render_list(&hunks, oneline));
    Ok(())
}
