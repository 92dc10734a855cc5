//! The review wizard state machine.

use tracing::instrument;

use ongil_core::{ProductId, ReviewId};

use crate::api::ReviewBackend;
use crate::review::error::ReviewError;
use crate::review::types::{
    BasicsAnswers, DetailsAnswers, ReviewDraft, SubmissionForm, WizardStep,
};

/// Drives one review from first star to submission.
///
/// Owns the answers entered so far so that backward navigation can
/// re-present them for editing. Each forward transition persists to the
/// backend before the step advances; a failed persist leaves the wizard
/// exactly where it was.
pub struct ReviewWizard<B> {
    backend: B,
    product_id: ProductId,
    step: WizardStep,
    draft: Option<ReviewDraft>,
    basics: Option<BasicsAnswers>,
    details: Option<DetailsAnswers>,
}

impl<B: ReviewBackend> ReviewWizard<B> {
    /// Start a new review for a product.
    #[must_use]
    pub const fn new(backend: B, product_id: ProductId) -> Self {
        Self {
            backend,
            product_id,
            step: WizardStep::Basics,
            draft: None,
            basics: None,
            details: None,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// The server-side draft, if step one has persisted.
    #[must_use]
    pub const fn draft(&self) -> Option<ReviewDraft> {
        self.draft
    }

    /// Previously entered step-one answers, for re-editing.
    #[must_use]
    pub const fn basics(&self) -> Option<&BasicsAnswers> {
        self.basics.as_ref()
    }

    /// Previously entered step-two answers, for re-editing.
    #[must_use]
    pub const fn details(&self) -> Option<&DetailsAnswers> {
        self.details.as_ref()
    }

    /// Validate and persist step one, then advance.
    ///
    /// Advances to `Details` when the server flags a follow-up question,
    /// straight to `Submission` otherwise.
    ///
    /// # Errors
    ///
    /// `Validation` before any network call, `WrongStep` when not at
    /// `Basics`, `Backend` when the persist fails - the wizard does not
    /// advance in any error case.
    #[instrument(skip(self, answers), fields(product_id = %self.product_id))]
    pub async fn submit_basics(&mut self, answers: BasicsAnswers) -> Result<WizardStep, ReviewError> {
        if self.step != WizardStep::Basics {
            return Err(ReviewError::WrongStep(self.step));
        }
        answers.validate()?;

        let draft = self
            .backend
            .save_review_basics(self.product_id, &answers)
            .await?;

        self.step = if draft.needs_details() {
            WizardStep::Details
        } else {
            WizardStep::Submission
        };
        self.draft = Some(draft);
        self.basics = Some(answers);
        Ok(self.step)
    }

    /// Validate and persist step two, then advance to `Submission`.
    ///
    /// # Errors
    ///
    /// `Validation` when a flagged follow-up is unanswered, `WrongStep`
    /// when not at `Details`, `Backend` / `StepNotPersisted` when the
    /// persist fails.
    #[instrument(skip(self, answers))]
    pub async fn submit_details(
        &mut self,
        answers: DetailsAnswers,
    ) -> Result<WizardStep, ReviewError> {
        if self.step != WizardStep::Details {
            return Err(ReviewError::WrongStep(self.step));
        }
        let Some(draft) = self.draft else {
            return Err(ReviewError::WrongStep(self.step));
        };
        validate_details(draft, &answers)?;

        let outcome = self
            .backend
            .save_review_details(draft.review_id, &answers)
            .await?;
        if !outcome.success {
            return Err(ReviewError::StepNotPersisted(outcome.message));
        }

        self.details = Some(answers);
        self.step = WizardStep::Submission;
        Ok(self.step)
    }

    /// Validate and submit the finished review.
    ///
    /// # Errors
    ///
    /// `Validation` before any network call, `WrongStep` when not at
    /// `Submission`, `Backend` / `StepNotPersisted` when the submit
    /// fails.
    #[instrument(skip(self, form))]
    pub async fn submit(&mut self, form: SubmissionForm) -> Result<ReviewId, ReviewError> {
        if self.step != WizardStep::Submission {
            return Err(ReviewError::WrongStep(self.step));
        }
        let Some(draft) = self.draft else {
            return Err(ReviewError::WrongStep(self.step));
        };
        form.validate()?;

        let outcome = self.backend.submit_review(draft.review_id, &form).await?;
        if !outcome.success {
            return Err(ReviewError::StepNotPersisted(outcome.message));
        }

        Ok(draft.review_id)
    }

    /// Step backward through the same conditional chain.
    ///
    /// From `Submission` this lands on `Details` only when the draft
    /// actually has follow-up questions; `Basics` is the floor.
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Basics | WizardStep::Details => WizardStep::Basics,
            WizardStep::Submission => {
                if self.draft.is_some_and(|draft| draft.needs_details()) {
                    WizardStep::Details
                } else {
                    WizardStep::Basics
                }
            }
        };
        self.step
    }
}

fn validate_details(draft: ReviewDraft, answers: &DetailsAnswers) -> Result<(), ReviewError> {
    let missing = |value: &Option<String>| {
        value
            .as_deref()
            .is_none_or(|detail| detail.trim().is_empty())
    };
    if draft.needs_size_detail && missing(&answers.size_detail) {
        return Err(ReviewError::Validation(
            "사이즈에 대해 조금 더 알려주세요.".to_string(),
        ));
    }
    if draft.needs_material_detail && missing(&answers.material_detail) {
        return Err(ReviewError::Validation(
            "소재에 대해 조금 더 알려주세요.".to_string(),
        ));
    }
    Ok(())
}
