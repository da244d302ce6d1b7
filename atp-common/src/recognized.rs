//! Entry point for text handed over by the OCR collaborator

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::normalize;
use crate::reconstruct::{reconstruct_with, ReconstructOptions, Reconstruction};
use crate::warning::Warning;
use crate::{Error, Result};

/// Confidence below which a parse carries a [`Warning::LowConfidence`]
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 60.0;

/// Recognized text and the recognizer's confidence in it, if reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub text: String,
    /// Average confidence in [0, 100]
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl RecognizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Normalize and reconstruct recognized text in one step.
///
/// The text itself is never consumed, so callers can offer it back for
/// manual correction when this fails.
pub fn parse_recognized(
    input: &RecognizedText,
    options: &ReconstructOptions,
    low_confidence_threshold: f64,
) -> Result<Reconstruction> {
    if let Some(confidence) = input.confidence {
        if !(0.0..=100.0).contains(&confidence) {
            return Err(Error::InvalidInput(format!(
                "confidence must be within [0, 100], got {}",
                confidence
            )));
        }
    }

    let rows = normalize(&input.text)?;
    debug!("Normalized {} bytes into {} rows", input.text.len(), rows.len());
    let mut reconstruction = reconstruct_with(&rows, options)?;

    if let Some(confidence) = input.confidence {
        if confidence < low_confidence_threshold {
            reconstruction.warnings.push(Warning::LowConfidence {
                confidence,
                threshold: low_confidence_threshold,
            });
        }
    }

    Ok(reconstruction)
}
