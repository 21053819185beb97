//! Error types for cardsmith-core.

use thiserror::Error;

/// Result type alias using PipelineError.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the card pipeline.
///
/// Classification non-matches are not errors; unproductive blocks are
/// reported through [`crate::pipeline::PipelineReport::unclassified`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    #[error("max_cards must be at least 1, got {value}")]
    InvalidCardCap { value: usize },
}
