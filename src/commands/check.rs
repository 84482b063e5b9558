//! `git-hunk check` (spec §6, §8 "Exclusive check"): validates caller-known
//! hash prefixes against the current enumeration without mutating anything.
use crate::commands::Context;
use crate::error::{GitHunkError, Result};
use crate::model::{Hunk, View};
use crate::renderer::CheckRow;

pub struct CheckOptions {
    pub staged: bool,
    pub shas: Vec<String>,
    pub exclusive: bool,
}

/// Runs `check`, returning the process exit code (0 only if every token
/// resolved uniquely and, with `--exclusive`, no candidate was left over).
pub fn run(ctx: &Context, opts: CheckOptions) -> Result<i32> {
    let view = if opts.staged { View::Staged } else { View::Unstaged };
    let candidates = ctx.enumerate(view)?;

    if opts.shas.is_empty() {
        return Err(GitHunkError::MissingArgs);
    }

    let mut deduped: Vec<String> = Vec::new();
    for t in &opts.shas {
        if !deduped.contains(t) {
            deduped.push(t.clone());
        }
    }

    let mut rows = Vec::with_capacity(deduped.len());
    let mut matched_hashes: Vec<String> = Vec::new();
    let mut success = true;

    for prefix in &deduped {
        if prefix.contains(':') {
            return Err(GitHunkError::LineSpecForbidden { command: "check" });
        }
        validate_prefix(prefix)?;
        let prefix_lower = prefix.to_ascii_lowercase();
        let matches: Vec<&Hunk> = candidates
            .iter()
            .filter(|h| h.hash.starts_with(&prefix_lower))
            .collect();

        match matches.len() {
            0 => {
                success = false;
                rows.push(CheckRow::Stale {
                    prefix: prefix.clone(),
                });
            }
            1 => {
                let hunk = matches[0];
                matched_hashes.push(hunk.hash.clone());
                rows.push(CheckRow::Ok {
                    prefix: prefix.clone(),
                    sha7: hunk.hash.clone(),
                    file: hunk.path.to_string_lossy().into_owned(),
                });
            }
            _ => {
                success = false;
                rows.push(CheckRow::Ambiguous {
                    prefix: prefix.clone(),
                });
            }
        }
    }

    if opts.exclusive {
        for hunk in &candidates {
            if !matched_hashes.contains(&hunk.hash) {
                success = false;
                rows.push(CheckRow::Unexpected {
                    sha7: hunk.hash.clone(),
                    file: hunk.path.to_string_lossy().into_owned(),
                });
            }
        }
    }

    print!("{}", ctx.renderer.render_check(&rows));
    Ok(if success { 0 } else { 1 })
}

/// Mirrors `Selector`'s length/hex validation (spec §4.5); unlike selector
/// hits/misses this still aborts the whole command since it's malformed
/// input, not a reportable outcome.
fn validate_prefix(token: &str) -> Result<()> {
    if token.len() < 4 {
        return Err(GitHunkError::PrefixTooShort {
            token: token.to_string(),
        });
    }
    if !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GitHunkError::InvalidHex {
            token: token.to_string(),
        });
    }
    Ok(())
}
