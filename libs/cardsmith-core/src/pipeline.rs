//! End-to-end pipeline for one source: segment, classify, emit, normalize.
//!
//! The pipeline is synchronous and single-threaded per source. Classifiers
//! are stateless, so callers may run several sources on independent workers
//! and hand the resulting card sequences to the merge engine in whatever
//! deterministic order they choose.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::classify::{Arbiter, ClassifierRegistry};
use crate::error::Result;
use crate::normalize::normalize;
use crate::segment::segment;
use crate::types::{Card, CardType};

/// Per-source pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Blocks scoring below this stay unclassified.
    pub min_confidence: f64,
    /// Tags stamped onto every card from this source (typically the source
    /// file name, plus any caller-supplied global tags).
    pub source_tags: BTreeSet<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            min_confidence: Arbiter::DEFAULT_MIN_CONFIDENCE,
            source_tags: BTreeSet::new(),
        }
    }
}

/// Cards plus classification diagnostics for one source.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub cards: Vec<Card>,
    pub blocks_total: usize,
    /// Blocks no classifier claimed. Unproductive input, not an error.
    pub unclassified: usize,
    pub blocks_by_pattern: BTreeMap<CardType, usize>,
}

/// Run the full pipeline over one source text.
///
/// Either the whole deterministic pipeline completes or an error is
/// returned before any card is produced; no partial result is ever handed
/// back as if it were complete.
pub fn run_pipeline(
    text: &str,
    registry: &ClassifierRegistry,
    options: &PipelineOptions,
) -> Result<PipelineReport> {
    let blocks = segment(text)?;
    let arbiter = Arbiter::new(options.min_confidence);

    let mut report = PipelineReport {
        cards: Vec::new(),
        blocks_total: blocks.len(),
        unclassified: 0,
        blocks_by_pattern: BTreeMap::new(),
    };

    for block in &blocks {
        let verdict = arbiter.classify(registry, block);
        match verdict.winner {
            None => report.unclassified += 1,
            Some(classifier) => {
                *report
                    .blocks_by_pattern
                    .entry(classifier.pattern())
                    .or_insert(0) += 1;
                for mut draft in classifier.emit(block) {
                    draft.tags.extend(options.source_tags.iter().cloned());
                    report.cards.push(normalize(draft));
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_terminal() {
        let registry = ClassifierRegistry::with_builtins();
        let result = run_pipeline("   \n \n", &registry, &PipelineOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn source_tags_stamped_on_every_card() {
        let registry = ClassifierRegistry::with_builtins();
        let options = PipelineOptions {
            source_tags: ["notes".to_string()].into(),
            ..Default::default()
        };
        let report = run_pipeline("Q: One?\nA: Yes.", &registry, &options).unwrap();
        assert!(!report.cards.is_empty());
        assert!(report.cards.iter().all(|c| c.tags.contains("notes")));
    }

    #[test]
    fn unclassified_blocks_counted_not_failed() {
        let registry = ClassifierRegistry::with_builtins();
        let report = run_pipeline(
            "just some plain prose without structure\n\nQ: One?\nA: Yes.",
            &registry,
            &PipelineOptions::default(),
        )
        .unwrap();
        assert_eq!(report.blocks_total, 2);
        assert_eq!(report.unclassified, 1);
        assert_eq!(report.cards.len(), 1);
    }

    #[test]
    fn pattern_counts_recorded() {
        let registry = ClassifierRegistry::with_builtins();
        let report = run_pipeline(
            "Q: One?\nA: Yes.\n\nOsmosis: water diffusion across a membrane",
            &registry,
            &PipelineOptions::default(),
        )
        .unwrap();
        assert_eq!(report.blocks_by_pattern[&CardType::QuestionAnswer], 1);
        assert_eq!(report.blocks_by_pattern[&CardType::Definition], 1);
    }
}
