use std::io::IsTerminal;

use clap::Parser;

use git_hunk::cli::{Cli, Command, StashAction};
use git_hunk::commands::{self, Context};
use git_hunk::enumerator::TrackedFilter;
use git_hunk::error::Result;
use git_hunk::git_view::GitView;
use git_hunk::logging;
use git_hunk::renderer::{Mode, Renderer};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let git = GitView::discover(".")?;

    let tracked_filter = match (cli.tracked_only, cli.untracked_only) {
        (true, true) => unreachable!("clap rejects --tracked-only with --untracked-only"),
        (true, false) => TrackedFilter::TrackedOnly,
        (false, true) => TrackedFilter::UntrackedOnly,
        (false, false) => TrackedFilter::All,
    };

    let mode = if cli.porcelain { Mode::Porcelain } else { Mode::Human };
    let color = Renderer::resolve_color(cli.no_color, std::io::stdout().is_terminal());

    let unified_context = cli.unified.unwrap_or_else(|| git.configured_context_lines());

    let ctx = Context {
        renderer: Renderer::new(mode, color),
        unified_context,
        file_filter: cli.file,
        tracked_filter,
        quiet: cli.quiet,
        verbose: cli.verbose > 0,
        git,
    };

    match cli.command {
        Command::List { staged, oneline } => {
            commands::list::run(&ctx, commands::list::ListOptions { staged, oneline })?;
        }
        Command::Diff { staged, shas } => {
            commands::diff::run(&ctx, commands::diff::DiffOptions { staged, shas })?;
        }
        Command::Add { shas, all } => {
            commands::add::run(&ctx, commands::add::AddOptions { shas, all })?;
        }
        Command::Reset { shas, all } => {
            commands::reset::run(&ctx, commands::reset::ResetOptions { shas, all })?;
        }
        Command::Restore {
            shas,
            all,
            dry_run,
            force,
        } => {
            commands::restore::run(
                &ctx,
                commands::restore::RestoreOptions {
                    shas,
                    all,
                    dry_run,
                    force,
                },
            )?;
        }
        Command::Count { staged } => {
            commands::count::run(&ctx, commands::count::CountOptions { staged })?;
        }
        Command::Check {
            staged,
            shas,
            exclusive,
        } => {
            return commands::check::run(
                &ctx,
                commands::check::CheckOptions {
                    staged,
                    shas,
                    exclusive,
                },
            );
        }
        Command::Stash { action } => match action {
            StashAction::Push {
                shas,
                all,
                include_untracked,
            } => {
                commands::stash::push(
                    &ctx,
                    commands::stash::StashPushOptions {
                        shas,
                        all,
                        include_untracked,
                    },
                )?;
            }
            StashAction::Pop => commands::stash::pop(&ctx)?,
        },
        Command::Help => {
            println!("{}", git_hunk_help_text());
        }
    }

    Ok(0)
}

fn git_hunk_help_text() -> &'static str {
    "git-hunk: list, stage, unstage, restore and stash individual diff hunks by a \
     stable short hash. Run `git-hunk --help` for the full flag reference."
}
