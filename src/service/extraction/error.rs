//! Error types for criteria extraction

use thiserror::Error;

use crate::model::MalformedInputError;

/// Structural failure of the extraction step.
///
/// None of these variants carry a usable criteria map; the caller routes
/// them to an UNCERTAIN result rather than feeding defaults to the reducer.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("LLM extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("extracted output violated the assessment contract: {0}")]
    MalformedOutput(#[from] MalformedInputError),
}
