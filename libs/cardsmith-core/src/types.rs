//! Core types for the card generation pipeline.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Syntactic shape of a content block, assigned by the segmenter.
///
/// Hints are derived from structural cues only (markers, fences, delimiter
/// rows); they carry no judgement about what the block means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralHint {
    Heading,
    Paragraph,
    BulletList,
    NumberedList,
    Table,
    CodeFence,
    Unknown,
}

/// A syntactically delimited span of raw input text.
///
/// Blocks cover the input exactly: spans are contiguous, non-overlapping,
/// and strictly increasing. Inter-block blank lines belong to the span of
/// the block they follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    pub raw_text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub hint: StructuralHint,
}

impl ContentBlock {
    /// Block text without surrounding blank lines.
    pub fn text(&self) -> &str {
        self.raw_text.trim_matches(|c| c == '\n' || c == '\r')
    }

    /// Non-blank lines of the block, trimmed.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Card pattern recognized by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Definition,
    QuestionAnswer,
    List,
    Table,
    AnnotatedCode,
    Concept,
}

impl CardType {
    /// Get the pattern name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::QuestionAnswer => "question_answer",
            Self::List => "list",
            Self::Table => "table",
            Self::AnnotatedCode => "annotated_code",
            Self::Concept => "concept",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "definition" => Some(Self::Definition),
            "question_answer" => Some(Self::QuestionAnswer),
            "list" => Some(Self::List),
            "table" => Some(Self::Table),
            "annotated_code" => Some(Self::AnnotatedCode),
            "concept" => Some(Self::Concept),
            _ => None,
        }
    }
}

/// Confidence verdict produced by one classifier for one block.
///
/// Transient: consumed by the arbiter and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationScore {
    pub pattern: CardType,
    /// In `[0, 1]`. Zero means "no structural match"; such a score never wins.
    pub confidence: f64,
    pub rationale: Vec<String>,
}

impl ClassificationScore {
    pub fn new(pattern: CardType, confidence: f64, rationale: &[&str]) -> Self {
        Self {
            pattern,
            confidence,
            rationale: rationale.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// A non-match: zero confidence, no rationale.
    pub fn none(pattern: CardType) -> Self {
        Self {
            pattern,
            confidence: 0.0,
            rationale: Vec::new(),
        }
    }
}

/// Card emitted by a winning classifier, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftCard {
    pub front: String,
    pub back: String,
    pub pattern: CardType,
    /// `(start_offset, end_offset)` of the block this card came from.
    pub source_span: (usize, usize),
    pub tags: BTreeSet<String>,
    /// Pattern-specific data for downstream renderers (list position,
    /// code language, table row index).
    pub extra: BTreeMap<String, String>,
}

impl DraftCard {
    pub fn new(
        pattern: CardType,
        block: &ContentBlock,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            pattern,
            source_span: (block.start_offset, block.end_offset),
            tags: BTreeSet::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// Normalized, fingerprinted card. Immutable once built; the merge engine
/// only decides inclusion and order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub front: String,
    pub back: String,
    pub tags: BTreeSet<String>,
    /// SHA-256 over case-folded front and back; equal content always collides.
    pub fingerprint: String,
    pub priority_weight: i32,
    pub card_type: CardType,
}

/// Final ordered, deduplicated collection of cards for a run.
///
/// Built exclusively by the merge engine; read-only to callers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
    #[serde(skip)]
    seen_fingerprints: HashSet<String>,
}

impl Deck {
    pub(crate) fn from_parts(cards: Vec<Card>, seen_fingerprints: HashSet<String>) -> Self {
        Self {
            cards,
            seen_fingerprints,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains_fingerprint(&self, fingerprint: &str) -> bool {
        self.seen_fingerprints.contains(fingerprint)
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
