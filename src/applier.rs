//! Applier (spec §4.7): chooses the apply mode for a mutating command and
//! invokes `GitView::apply`, keeping "which direction to apply in" separate
//! from "how to shell out to git" (`git_view.rs`).
use crate::error::Result;
use crate::git_view::{ApplyMode, GitView};

/// The mutating operations that drive a patch through `GitView::apply`.
/// `StashPush`'s REVERSE_WORKTREE half is applied with this same applier;
/// its index/untracked tree construction lives in `commands::stash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Reset,
    Restore { dry_run: bool },
    StashPush,
}

impl Operation {
    /// Spec §4.7's command -> mode table.
    pub fn mode(self) -> ApplyMode {
        match self {
            Operation::Add => ApplyMode::Cached,
            Operation::Reset => ApplyMode::ReverseCached,
            Operation::Restore { dry_run: false } => ApplyMode::ReverseWorktree,
            Operation::Restore { dry_run: true } => ApplyMode::CheckReverseWorktree,
            Operation::StashPush => ApplyMode::ReverseWorktree,
        }
    }

    /// Forwards to the chosen `ApplyMode`'s direction (`model::Direction`),
    /// used by `PatchBuilder` to decide which side of a dropped line-spec
    /// selection survives as context (spec §4.6 rule 3).
    pub fn direction(self) -> crate::model::Direction {
        self.mode().direction()
    }
}

/// Applies `patch` atomically for `op`. A single invocation applies the
/// whole composed patch at once (spec §4.7): there is no partial-hunk retry.
pub fn apply(git: &GitView, patch: &[u8], op: Operation) -> Result<()> {
    git.apply(patch, op.mode())
}
