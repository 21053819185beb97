//! Deck merge engine: combines per-source card sequences into one deck with
//! tag filtering, fingerprint deduplication, priority tiering, optional
//! secondary ordering, and size capping.
//!
//! Processing order is strictly the caller's sequence order, and within a
//! sequence the original emission order, so repeated runs over unchanged
//! input produce byte-identical decks.

use std::collections::{BTreeSet, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::types::{Card, Deck};

/// Secondary ordering applied within each priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    None,
    Random,
    Length,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Random => "random",
            Self::Length => "length",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "random" => Some(Self::Random),
            "length" => Some(Self::Length),
            _ => None,
        }
    }
}

/// Merge configuration, supplied by the caller's argument/config layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeOptions {
    pub dedupe: bool,
    pub filter_tags: Option<BTreeSet<String>>,
    pub priority_tags: Option<BTreeSet<String>>,
    pub sort: SortOrder,
    /// Seed for [`SortOrder::Random`]; 0 when unset, so runs stay
    /// reproducible.
    pub random_seed: Option<u64>,
    pub max_cards: Option<usize>,
}

impl MergeOptions {
    /// Reject malformed configuration before any card is touched.
    pub fn validate(&self) -> Result<()> {
        if self.max_cards == Some(0) {
            return Err(PipelineError::InvalidCardCap { value: 0 });
        }
        Ok(())
    }
}

/// Merge ordered card sequences into a single deck.
///
/// Steps, in order: tag filtering, deduplication (first occurrence wins,
/// later duplicates are dropped silently), stable priority tiering,
/// secondary sort within each tier, capping. Cards are never edited beyond
/// the priority weight the tag rules assign.
pub fn merge(sequences: Vec<Vec<Card>>, options: &MergeOptions) -> Result<Deck> {
    options.validate()?;

    let mut seen = HashSet::new();
    let mut cards = Vec::new();
    for sequence in sequences {
        for card in sequence {
            if let Some(filter) = &options.filter_tags {
                if card.tags.is_disjoint(filter) {
                    continue;
                }
            }
            let first_occurrence = seen.insert(card.fingerprint.clone());
            if options.dedupe && !first_occurrence {
                continue;
            }
            cards.push(card);
        }
    }

    let mut rng = StdRng::seed_from_u64(options.random_seed.unwrap_or(0));

    let mut cards = match &options.priority_tags {
        Some(priority) => {
            let (mut front, mut rest): (Vec<Card>, Vec<Card>) = cards
                .into_iter()
                .partition(|card| !card.tags.is_disjoint(priority));
            for card in &mut front {
                card.priority_weight = 1;
            }
            apply_sort(&mut front, options.sort, &mut rng);
            apply_sort(&mut rest, options.sort, &mut rng);
            front.extend(rest);
            front
        }
        None => {
            let mut cards = cards;
            apply_sort(&mut cards, options.sort, &mut rng);
            cards
        }
    };

    if let Some(cap) = options.max_cards {
        cards.truncate(cap);
    }

    Ok(Deck::from_parts(cards, seen))
}

fn apply_sort(cards: &mut [Card], sort: SortOrder, rng: &mut StdRng) {
    match sort {
        SortOrder::None => {}
        SortOrder::Random => cards.shuffle(rng),
        // Stable, so equal lengths keep arrival order.
        SortOrder::Length => cards.sort_by_key(|c| c.front.len() + c.back.len()),
    }
}
