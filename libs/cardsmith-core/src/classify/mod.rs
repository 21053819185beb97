//! Pattern classifiers, the classifier registry, and the arbiter.
//!
//! Each classifier is an independent, stateless detector for one card
//! pattern. Scoring is total and side-effect free; card emission runs only
//! for the block's winning pattern. The registry is an open, ordered list:
//! its order is the tie-break precedence, so syntactically rigid patterns
//! (tables, explicit Q&A markers) are registered ahead of loose heuristics.

mod code;
mod concept;
mod definition;
mod list;
mod qa;
mod table;

pub use code::AnnotatedCodeClassifier;
pub use concept::{ConceptClassifier, TermLookup};
pub use definition::DefinitionClassifier;
pub use list::ListClassifier;
pub use qa::QaClassifier;
pub use table::TableClassifier;

use crate::types::{CardType, ClassificationScore, ContentBlock, DraftCard};

/// One card-generation pattern detector.
///
/// `score` must tolerate any block shape; a classifier that cannot make
/// sense of a block returns zero confidence rather than failing. `emit` may
/// return an empty sequence — "matched but nothing card-worthy" — which is
/// still a terminal classification for the block.
pub trait PatternClassifier: Send + Sync {
    fn pattern(&self) -> CardType;

    fn score(&self, block: &ContentBlock) -> ClassificationScore;

    fn emit(&self, block: &ContentBlock) -> Vec<DraftCard>;
}

/// Ordered, open set of classifiers. Registration order is the precedence
/// order used by the arbiter to break confidence ties.
pub struct ClassifierRegistry {
    classifiers: Vec<Box<dyn PatternClassifier>>,
}

impl ClassifierRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            classifiers: Vec::new(),
        }
    }

    /// Registry pre-loaded with the built-in classifiers in precedence
    /// order: Table > Q&A > Definition > List > Annotated code > Concept.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TableClassifier));
        registry.register(Box::new(QaClassifier));
        registry.register(Box::new(DefinitionClassifier::new()));
        registry.register(Box::new(ListClassifier::new()));
        registry.register(Box::new(AnnotatedCodeClassifier));
        registry.register(Box::new(ConceptClassifier::new()));
        registry
    }

    /// Append a classifier at the lowest precedence position.
    pub fn register(&mut self, classifier: Box<dyn PatternClassifier>) {
        self.classifiers.push(classifier);
    }

    pub fn classifiers(&self) -> &[Box<dyn PatternClassifier>] {
        &self.classifiers
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }
}

impl Default for ClassifierRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Arbitration result for one block: the winning classifier, if any, plus
/// every score for diagnostics.
pub struct Verdict<'a> {
    pub winner: Option<&'a dyn PatternClassifier>,
    pub scores: Vec<ClassificationScore>,
}

/// Selects one winning pattern per block under a deterministic policy.
pub struct Arbiter {
    min_confidence: f64,
}

impl Arbiter {
    /// Blocks whose best score falls below this are left unclassified.
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Highest confidence wins; ties keep the earliest (highest-precedence)
    /// classifier. A pattern with no structural match (zero confidence)
    /// never wins regardless of other scores. An unclassified block is not
    /// an error, merely unproductive input.
    pub fn classify<'a>(
        &self,
        registry: &'a ClassifierRegistry,
        block: &ContentBlock,
    ) -> Verdict<'a> {
        let scores: Vec<ClassificationScore> = registry
            .classifiers()
            .iter()
            .map(|c| c.score(block))
            .collect();

        let mut best: Option<(usize, f64)> = None;
        for (idx, score) in scores.iter().enumerate() {
            let confidence = score.confidence.clamp(0.0, 1.0);
            if !(confidence > 0.0) {
                continue;
            }
            // Strictly-greater keeps the earliest classifier on ties.
            if best.map_or(true, |(_, c)| confidence > c) {
                best = Some((idx, confidence));
            }
        }

        let winner = match best {
            Some((idx, confidence)) if confidence >= self.min_confidence => {
                Some(registry.classifiers()[idx].as_ref())
            }
            _ => None,
        };

        Verdict { winner, scores }
    }
}

impl Default for Arbiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_CONFIDENCE)
    }
}
