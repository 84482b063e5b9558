//! Stable hunk hash (spec §4.3).
//!
//! Digest: SHA-256 over the preimage, truncated to the first 7 hex
//! characters of the lowercase hex encoding. This choice is permanent for a
//! released binary (spec §4.3, §8 property 113) — see SPEC_FULL.md §3.1.
use sha2::{Digest, Sha256};

use crate::model::{BodyLine, LineTag};

/// Builds the hash preimage and returns the 7-hex-char hash.
///
/// `path` is the raw diff path (no quoting/escaping, spec §3). `stable_start`
/// is the stable-side starting line (spec §4.3). `body` is the hunk's full
/// body; only ADD/DEL lines contribute to the preimage.
pub fn hunk_hash(path: &str, stable_start: usize, body: &[BodyLine]) -> String {
    let mut hasher = Sha256::new();

    hasher.update(path.as_bytes());
    hasher.update([0u8]);

    hasher.update(stable_start.to_string().as_bytes());
    hasher.update([0u8]);

    for line in body {
        if matches!(line.tag, LineTag::Add | LineTag::Del) {
            hasher.update([line.tag.prefix() as u8]);
            hasher.update(&line.content);
            hasher.update([b'\n']);
        }
    }

    let digest = hasher.finalize();
    let hex = hex_encode(&digest);
    hex[..7].to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
