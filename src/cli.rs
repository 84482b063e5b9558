//! Command-line surface (spec §6). The grammar mirrors `git add -p`'s
//! mental model but every subcommand is non-interactive and takes its hunks
//! as hash-prefix arguments.
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "git-hunk",
    about = "List, stage, unstage, restore and stash individual diff hunks by a stable short hash",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Restrict enumeration and selection to exact-match path
    #[arg(long, global = true)]
    pub file: Option<std::path::PathBuf>,

    /// Context-line count for diffs (default: git's configured diff.context or 3)
    #[arg(short = 'U', long = "unified", global = true)]
    pub unified: Option<usize>,

    /// Restrict to tracked files only
    #[arg(long, global = true, conflicts_with = "untracked_only")]
    pub tracked_only: bool,

    /// Restrict to untracked files only
    #[arg(long, global = true, conflicts_with = "tracked_only")]
    pub untracked_only: bool,

    /// Switch output to tab-separated machine format
    #[arg(long, global = true)]
    pub porcelain: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase verbosity (-v, -vv, -vvv); enables stderr summaries/hints
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List hunks in the current view
    List {
        /// Operate against the STAGED view (HEAD vs index)
        #[arg(long)]
        staged: bool,

        /// Suppress embedded diff bodies
        #[arg(long)]
        oneline: bool,
    },

    /// Print raw diff bodies alongside the list header
    Diff {
        /// Operate against the STAGED view (HEAD vs index)
        #[arg(long)]
        staged: bool,

        /// Hash prefixes (optionally `:line-spec`) to restrict to
        shas: Vec<String>,
    },

    /// Stage hunks into the index
    Add {
        /// Hash prefixes (optionally `:line-spec`) to stage
        shas: Vec<String>,

        /// Stage every hunk in the current view
        #[arg(long)]
        all: bool,
    },

    /// Unstage hunks from the index
    Reset {
        /// Hash prefixes (optionally `:line-spec`) to unstage
        shas: Vec<String>,

        /// Unstage every hunk in the STAGED view
        #[arg(long)]
        all: bool,
    },

    /// Revert unstaged hunks in the worktree to match the index
    Restore {
        /// Hash prefixes (optionally `:line-spec`) to restore
        shas: Vec<String>,

        /// Revert every unstaged hunk
        #[arg(long)]
        all: bool,

        /// Validate without writing
        #[arg(long)]
        dry_run: bool,

        /// Permit deletion of untracked files
        #[arg(long)]
        force: bool,
    },

    /// Print the number of hunks in the current view
    Count {
        /// Operate against the STAGED view (HEAD vs index)
        #[arg(long)]
        staged: bool,
    },

    /// Validate caller-known hashes against the current enumeration
    Check {
        /// Operate against the STAGED view (HEAD vs index)
        #[arg(long)]
        staged: bool,

        /// Hash prefixes to check
        shas: Vec<String>,

        /// Succeed only if the enumeration is exactly {shas}
        #[arg(long)]
        exclusive: bool,
    },

    /// Stash selected hunks, or pop the most recent stash
    Stash {
        #[command(subcommand)]
        action: StashAction,
    },

    /// Print command help
    Help,
}

#[derive(Subcommand, Debug)]
pub enum StashAction {
    /// Stash selected hunks out of the worktree (and index, when staged)
    Push {
        /// Hash prefixes to stash
        shas: Vec<String>,

        /// Stash every hunk in the current view
        #[arg(long)]
        all: bool,

        /// Include untracked files (only with --all)
        #[arg(long)]
        include_untracked: bool,
    },
    /// Pop the most recent stash, delegated verbatim to `git stash pop`
    Pop,
}
