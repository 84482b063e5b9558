//! Selector (spec §4.5): resolves caller-provided hash-prefix tokens,
//! possibly with a `:line-spec` suffix, against an already-filtered
//! enumeration.
use crate::error::{GitHunkError, Result};
use crate::line_spec;
use crate::model::Hunk;

/// One resolved selection: the matched hunk, and (if given) the line-spec
/// resolved to 0-based body indices.
pub struct Selection<'a> {
    pub hunk: &'a Hunk,
    pub token: String,
    pub line_spec_body_indices: Option<Vec<usize>>,
}

const MIN_PREFIX_LEN: usize = 4;

/// Resolves `tokens` against `candidates`. `line_specs_allowed` is false for
/// `check`/`stash`, which reject a `:line-spec` suffix outright.
pub fn resolve<'a>(
    tokens: &[String],
    candidates: &'a [Hunk],
    line_specs_allowed: bool,
    command_name: &'static str,
) -> Result<Vec<Selection<'a>>> {
    let mut deduped = Vec::new();
    for t in tokens {
        if !deduped.contains(t) {
            deduped.push(t.clone());
        }
    }

    let mut selections = Vec::with_capacity(deduped.len());
    for raw in deduped {
        let (prefix, spec) = split_token(&raw);

        if spec.is_some() && !line_specs_allowed {
            return Err(GitHunkError::LineSpecForbidden {
                command: command_name,
            });
        }

        if prefix.len() < MIN_PREFIX_LEN {
            return Err(GitHunkError::PrefixTooShort { token: raw.clone() });
        }
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GitHunkError::InvalidHex { token: raw.clone() });
        }

        let prefix_lower = prefix.to_ascii_lowercase();
        let matches: Vec<&Hunk> = candidates
            .iter()
            .filter(|h| h.hash.starts_with(&prefix_lower))
            .collect();

        let hunk = match matches.len() {
            0 => return Err(GitHunkError::NoMatch { token: raw.clone() }),
            1 => matches[0],
            _ => return Err(GitHunkError::Ambiguous { token: raw.clone() }),
        };

        let line_spec_body_indices = match spec {
            Some(s) => Some(line_spec::resolve_body_indices(
                s,
                &hunk.change_line_indices(),
            )?),
            None => None,
        };

        selections.push(Selection {
            hunk,
            token: raw,
            line_spec_body_indices,
        });
    }

    Ok(selections)
}

fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((prefix, spec)) => (prefix, Some(spec)),
        None => (token, None),
    }
}
