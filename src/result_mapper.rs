//! ResultMapper (spec §4.8): the merge-reporting algorithm for mutating
//! commands (`add`, `reset`). Compares the target-side enumeration before
//! and after the apply to report which target hunks were consumed and which
//! target hunks resulted, grouping inputs that share a result.
use crate::model::Hunk;

/// One output record: the input tokens that produced it, the target-side
/// hashes they absorbed, and the resulting target-side hash(es).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
    pub applied: Vec<String>,
    pub consumed: Vec<String>,
    pub result: Vec<String>,
    pub file: String,
}

/// One input selection's translated neighborhood on the target side, used to
/// find overlapping before/after hunks.
struct InputNeighborhood {
    token: String,
    file: String,
    range: (usize, usize),
}

/// Computes merge records for a set of selected input hunks, given the
/// target-side enumeration before and after the apply.
pub fn map_results(
    selected: &[(&Hunk, String)],
    target_before: &[Hunk],
    target_after: &[Hunk],
) -> Vec<MergeRecord> {
    let neighborhoods: Vec<InputNeighborhood> = selected
        .iter()
        .map(|(hunk, token)| InputNeighborhood {
            token: token.clone(),
            file: hunk.path.to_string_lossy().into_owned(),
            range: hunk.stable_range,
        })
        .collect();

    // Group inputs whose neighborhoods touch the same target-after hunk(s).
    let mut groups: Vec<(Vec<usize>, Vec<String>, Vec<String>, String)> = Vec::new();

    'outer: for (idx, n) in neighborhoods.iter().enumerate() {
        let after_hits: Vec<&Hunk> = target_after
            .iter()
            .filter(|h| h.path.to_string_lossy() == n.file && overlaps(h.stable_range, n.range))
            .collect();
        let result_hashes: Vec<String> = if after_hits.is_empty() {
            vec!["?".to_string()]
        } else {
            after_hits.iter().map(|h| h.hash.clone()).collect()
        };

        let before_hits: Vec<&Hunk> = target_before
            .iter()
            .filter(|h| h.path.to_string_lossy() == n.file && overlaps(h.stable_range, n.range))
            .collect();
        let consumed_hashes: Vec<String> = before_hits
            .iter()
            .filter(|b| !target_after.iter().any(|a| a.hash == b.hash))
            .map(|b| b.hash.clone())
            .collect();

        for (members, consumed, result, _) in groups.iter_mut() {
            if result.iter().any(|r| result_hashes.contains(r)) {
                members.push(idx);
                consumed.extend(consumed_hashes);
                continue 'outer;
            }
        }

        groups.push((vec![idx], consumed_hashes, result_hashes, n.file.clone()));
    }

    groups
        .into_iter()
        .map(|(members, consumed, result, file)| {
            let mut applied: Vec<String> = members
                .iter()
                .map(|&i| neighborhoods[i].token.clone())
                .collect();
            applied.sort();
            let mut consumed = consumed;
            consumed.sort();
            consumed.dedup();
            let mut result = result;
            result.sort();
            result.dedup();
            MergeRecord {
                applied,
                consumed,
                result,
                file,
            }
        })
        .collect()
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    if a == (0, 0) || b == (0, 0) {
        return a == b;
    }
    a.0 <= b.1 && b.0 <= a.1
}
