//! Error taxonomy for `git-hunk`, matching spec §7's message fragments.
use thiserror::Error;

/// Every error `git-hunk` can produce. `Display` renders exactly the
/// message fragment documented in the error taxonomy; `main` prefixes it
/// with `error: ` and exits 1.
#[derive(Error, Debug)]
pub enum GitHunkError {
    #[error("sha prefix too short (minimum 4 chars): '{token}'")]
    PrefixTooShort { token: String },

    #[error("invalid hex in sha prefix: '{token}'")]
    InvalidHex { token: String },

    #[error("no hunk matching '{token}'")]
    NoMatch { token: String },

    #[error("ambiguous prefix '{token}' -- matches multiple hunks")]
    Ambiguous { token: String },

    #[error("line specs not supported for {command}")]
    LineSpecForbidden { command: &'static str },

    #[error("patch did not apply cleanly -- re-run 'list' and try again")]
    PatchFailed { stderr: String },

    #[error("no unstaged changes")]
    NoUnstagedChanges,

    #[error("no staged changes")]
    NoStagedChanges,

    #[error("at least one <sha> argument required")]
    MissingArgs,

    #[error("{flag_a} cannot be combined with {flag_b}")]
    ConflictingFilters {
        flag_a: &'static str,
        flag_b: &'static str,
    },

    #[error("{sha7} ({file}) is an untracked file -- use --force to delete")]
    ForceRequired { sha7: String, file: String },

    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    #[error("invalid line spec '{spec}': {reason}")]
    InvalidLineSpec { spec: String, reason: String },

    #[error("{0}")]
    Git(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl GitHunkError {
    /// Every variant maps to exit code 1 (spec §6: "1 on any error").
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, GitHunkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_taxonomy_fragments() {
        assert_eq!(
            GitHunkError::PrefixTooShort {
                token: "ab".into()
            }
            .to_string(),
            "sha prefix too short (minimum 4 chars): 'ab'"
        );
        assert_eq!(
            GitHunkError::Ambiguous {
                token: "a1b2".into()
            }
            .to_string(),
            "ambiguous prefix 'a1b2' -- matches multiple hunks"
        );
        assert_eq!(
            GitHunkError::ForceRequired {
                sha7: "a1b2c3d".into(),
                file: "x.txt".into()
            }
            .to_string(),
            "a1b2c3d (x.txt) is an untracked file -- use --force to delete"
        );
    }

    #[test]
    fn every_variant_exits_one() {
        assert_eq!(GitHunkError::MissingArgs.exit_code(), 1);
        assert_eq!(GitHunkError::NoUnstagedChanges.exit_code(), 1);
    }
}
