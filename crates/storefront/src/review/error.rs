//! Error type for the review wizard.

use thiserror::Error;

use crate::api::ApiError;
use crate::review::types::WizardStep;

/// Errors that can occur while writing a review.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Form input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Backend call failed (transport, status, decode).
    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),

    /// The backend declined to persist this step; the wizard did not advance.
    #[error("Step not persisted: {}", .0.as_deref().unwrap_or("no message"))]
    StepNotPersisted(Option<String>),

    /// The requested transition does not exist from the current step.
    #[error("Wizard is at step {0:?}")]
    WrongStep(WizardStep),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_error_display() {
        let err = ReviewError::WrongStep(WizardStep::Basics);
        assert_eq!(err.to_string(), "Wizard is at step Basics");

        let err = ReviewError::StepNotPersisted(None);
        assert_eq!(err.to_string(), "Step not persisted: no message");
    }
}
