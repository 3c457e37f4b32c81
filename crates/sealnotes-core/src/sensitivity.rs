//! Content sensitivity scoring.
//!
//! Scoring is delegated to an external collaborator behind the
//! [`SensitivityScorer`] trait. A scorer that errors or panics never fails
//! the note write that asked for it; [`score_content`] degrades to a zero
//! score with the failure reason as explanation.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Highest score a scorer may report.
pub const MAX_SCORE: u8 = 100;

/// Sensitivity assessment stored with every note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSensitivity {
    /// 0 (harmless) to 100 (highly sensitive)
    pub sensitivity_score: u8,

    pub explanation: String,
}

/// Errors reported by a scorer.
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("scorer unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected scorer response: {0}")]
    InvalidResponse(String),
}

/// A sensitivity scorer. Always handed plaintext, never a cipher token.
pub trait SensitivityScorer: Send + Sync {
    fn score(&self, plaintext: &str) -> Result<NoteSensitivity, ScorerError>;
}

/// Offline scorer that reports every note as not sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledScorer;

impl SensitivityScorer for DisabledScorer {
    fn score(&self, _plaintext: &str) -> Result<NoteSensitivity, ScorerError> {
        Ok(NoteSensitivity {
            sensitivity_score: 0,
            explanation: "Sensitivity analysis disabled".to_string(),
        })
    }
}

/// Score `plaintext`, absorbing scorer errors and panics.
pub fn score_content(scorer: &dyn SensitivityScorer, plaintext: &str) -> NoteSensitivity {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scorer.score(plaintext)));

    let reason = match outcome {
        Ok(Ok(mut sensitivity)) => {
            sensitivity.sensitivity_score = sensitivity.sensitivity_score.min(MAX_SCORE);
            return sensitivity;
        }
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_reason(payload.as_ref()),
    };

    warn!(reason = %reason, "sensitivity scoring failed");
    NoteSensitivity {
        sensitivity_score: 0,
        explanation: format!("Failed to analyze sensitivity: {}", reason),
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "scorer panicked".to_string()
    }
}
