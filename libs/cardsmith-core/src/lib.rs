//! Core library for turning loosely structured notes into study cards.
//!
//! Provides:
//! - Structural segmentation of raw text into content blocks
//! - Rule-based pattern classifiers behind an open, ordered registry
//! - A deterministic arbiter that picks one winning pattern per block
//! - Card normalization with stable content fingerprints
//! - A deck merge engine with dedup, tag filtering, and priority ordering

pub mod classify;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod segment;
pub mod types;

pub use classify::{
    Arbiter, ClassifierRegistry, PatternClassifier, TermLookup, Verdict,
};
pub use error::{PipelineError, Result};
pub use merge::{merge, MergeOptions, SortOrder};
pub use normalize::normalize;
pub use pipeline::{run_pipeline, PipelineOptions, PipelineReport};
pub use segment::{segment, Segmenter};
pub use types::{
    Card, CardType, ClassificationScore, ContentBlock, Deck, DraftCard, StructuralHint,
};
