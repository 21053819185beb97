//! Card normalization and content fingerprinting.
//!
//! Normalization is total and pure: identical drafts yield identical cards
//! wherever they appear in the pipeline. Raw newlines become `<br>` and tab
//! delimiters collapse away, so card fields are always safe for a
//! delimiter-separated flat file; anything beyond that (HTML entities,
//! LaTeX) is the serializer's concern.

use sha2::{Digest, Sha256};

use crate::types::{Card, DraftCard};

/// Normalize a draft into an immutable, fingerprinted card.
pub fn normalize(draft: DraftCard) -> Card {
    let front = clean_text(&draft.front);
    let back = clean_text(&draft.back);
    let fingerprint = fingerprint(&front, &back);
    Card {
        front,
        back,
        tags: draft.tags,
        fingerprint,
        priority_weight: 0,
        card_type: draft.pattern,
    }
}

/// Per line: trim and collapse internal whitespace runs to single spaces.
/// Blank lines drop out; remaining lines join with `<br>`.
fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Stable content hash over case-folded front and back. SHA-256 rather than
/// a language hash so the value survives serialization and process
/// restarts.
pub fn fingerprint(front: &str, back: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(front.to_lowercase().as_bytes());
    hasher.update([0x1f]);
    hasher.update(back.to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}
