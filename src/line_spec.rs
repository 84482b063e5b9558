//! Parses `N[-M](,N[-M])*` line specs (spec §4.5) into 0-based indices into
//! a hunk's `body`, restricted to ADD/DEL lines. `N`/`M` in a line spec are
//! 1-based positions counted over the change lines only, in body order.
use crate::error::{GitHunkError, Result};

/// Parses a raw line-spec string into a sorted, de-duplicated list of
/// 1-based change-line positions.
pub fn parse(spec: &str) -> Result<Vec<usize>> {
    let mut positions = std::collections::BTreeSet::new();

    for piece in spec.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(GitHunkError::InvalidLineSpec {
                spec: spec.to_string(),
                reason: "empty range".to_string(),
            });
        }
        if let Some((a, b)) = piece.split_once('-') {
            let start: usize = a.parse().map_err(|_| GitHunkError::InvalidLineSpec {
                spec: spec.to_string(),
                reason: format!("'{a}' is not a number"),
            })?;
            let end: usize = b.parse().map_err(|_| GitHunkError::InvalidLineSpec {
                spec: spec.to_string(),
                reason: format!("'{b}' is not a number"),
            })?;
            if start == 0 || end == 0 || start > end {
                return Err(GitHunkError::InvalidLineSpec {
                    spec: spec.to_string(),
                    reason: format!("'{piece}' is not an ascending 1-based range"),
                });
            }
            for n in start..=end {
                positions.insert(n);
            }
        } else {
            let n: usize = piece.parse().map_err(|_| GitHunkError::InvalidLineSpec {
                spec: spec.to_string(),
                reason: format!("'{piece}' is not a number"),
            })?;
            if n == 0 {
                return Err(GitHunkError::InvalidLineSpec {
                    spec: spec.to_string(),
                    reason: "positions are 1-based".to_string(),
                });
            }
            positions.insert(n);
        }
    }

    Ok(positions.into_iter().collect())
}

/// Maps 1-based change-line positions to 0-based indices into `body`,
/// restricted to the hunk's ADD/DEL lines, erroring if any position is out
/// of range for this hunk.
pub fn resolve_body_indices(
    spec: &str,
    change_line_indices: &[usize],
) -> Result<Vec<usize>> {
    let positions = parse(spec)?;
    let mut out = Vec::with_capacity(positions.len());
    for pos in positions {
        match change_line_indices.get(pos - 1) {
            Some(&idx) => out.push(idx),
            None => {
                return Err(GitHunkError::InvalidLineSpec {
                    spec: spec.to_string(),
                    reason: format!(
                        "position {pos} is out of range (hunk has {} change lines)",
                        change_line_indices.len()
                    ),
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_positions() {
        assert_eq!(parse("1,3,5").unwrap(), vec![1, 3, 5]);
    }

    #[test]
    fn parses_ranges() {
        assert_eq!(parse("2-4").unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn parses_mixed_and_dedupes() {
        assert_eq!(parse("1,2-4,4,6").unwrap(), vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn rejects_zero_position() {
        assert!(parse("0").is_err());
    }

    #[test]
    fn rejects_descending_range() {
        assert!(parse("5-2").is_err());
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(parse("a-b").is_err());
    }

    #[test]
    fn resolve_maps_to_body_indices() {
        let change_lines = vec![3, 4, 7];
        assert_eq!(resolve_body_indices("1,3", &change_lines).unwrap(), vec![3, 7]);
    }

    #[test]
    fn resolve_rejects_out_of_range() {
        let change_lines = vec![3, 4];
        assert!(resolve_body_indices("5", &change_lines).is_err());
    }
}
