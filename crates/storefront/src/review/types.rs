//! Domain types and form validation for the review wizard.

use serde::{Deserialize, Serialize};
use url::Url;

use ongil_core::ReviewId;

use crate::review::error::ReviewError;

/// The wizard's current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Rating plus the three mandatory categorical answers.
    Basics,
    /// Secondary size/material questions, shown only when the server
    /// flagged them after step one persisted.
    Details,
    /// Free text, image URLs, and submit.
    Submission,
}

/// How the garment's sizing felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeFit {
    RunsSmall,
    TrueToSize,
    RunsLarge,
}

/// How the fabric felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialFeel {
    Stiff,
    Average,
    Soft,
}

/// Overall wearing comfort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comfort {
    Uncomfortable,
    Average,
    Comfortable,
}

/// Step-one answers as entered in the form.
///
/// The categorical fields are optional here because the form starts
/// empty; validation requires all of them before anything is persisted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicsAnswers {
    /// Star rating, 1-5.
    pub rating: u8,
    pub size_fit: Option<SizeFit>,
    pub material_feel: Option<MaterialFeel>,
    pub comfort: Option<Comfort>,
}

impl BasicsAnswers {
    /// Check the form before any network call.
    ///
    /// # Errors
    ///
    /// Returns `Validation` naming the first missing or invalid field.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ReviewError::Validation("별점을 선택해주세요.".to_string()));
        }
        if self.size_fit.is_none() {
            return Err(ReviewError::Validation(
                "사이즈는 어땠는지 선택해주세요.".to_string(),
            ));
        }
        if self.material_feel.is_none() {
            return Err(ReviewError::Validation(
                "소재는 어땠는지 선택해주세요.".to_string(),
            ));
        }
        if self.comfort.is_none() {
            return Err(ReviewError::Validation(
                "착용감은 어땠는지 선택해주세요.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Step-two answers; each is only required when the matching server
/// flag asked for it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_detail: Option<String>,
}

/// Step-three form: free text plus image URLs.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    pub content: String,
    pub image_urls: Vec<String>,
}

impl SubmissionForm {
    /// Check the form before any network call.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for empty content or an unparseable image URL.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.content.trim().is_empty() {
            return Err(ReviewError::Validation(
                "리뷰 내용을 입력해주세요.".to_string(),
            ));
        }
        for raw in &self.image_urls {
            if Url::parse(raw).is_err() {
                return Err(ReviewError::Validation(
                    "이미지 주소가 올바르지 않습니다.".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Draft created server-side by persisting step one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewDraft {
    pub review_id: ReviewId,
    /// Whether the size follow-up question applies.
    pub needs_size_detail: bool,
    /// Whether the material follow-up question applies.
    pub needs_material_detail: bool,
}

impl ReviewDraft {
    /// Whether the secondary-question step exists for this draft.
    #[must_use]
    pub const fn needs_details(&self) -> bool {
        self.needs_size_detail || self.needs_material_detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_basics() -> BasicsAnswers {
        BasicsAnswers {
            rating: 4,
            size_fit: Some(SizeFit::TrueToSize),
            material_feel: Some(MaterialFeel::Soft),
            comfort: Some(Comfort::Comfortable),
        }
    }

    #[test]
    fn test_basics_complete_form_passes() {
        assert!(complete_basics().validate().is_ok());
    }

    #[test]
    fn test_basics_rating_out_of_range() {
        for rating in [0, 6] {
            let answers = BasicsAnswers {
                rating,
                ..complete_basics()
            };
            assert!(matches!(
                answers.validate(),
                Err(ReviewError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_basics_each_categorical_answer_is_mandatory() {
        let missing_size = BasicsAnswers {
            size_fit: None,
            ..complete_basics()
        };
        let missing_material = BasicsAnswers {
            material_feel: None,
            ..complete_basics()
        };
        let missing_comfort = BasicsAnswers {
            comfort: None,
            ..complete_basics()
        };

        for answers in [missing_size, missing_material, missing_comfort] {
            assert!(matches!(
                answers.validate(),
                Err(ReviewError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_submission_requires_content() {
        let form = SubmissionForm {
            content: "   ".to_string(),
            image_urls: Vec::new(),
        };
        assert!(matches!(form.validate(), Err(ReviewError::Validation(_))));
    }

    #[test]
    fn test_submission_rejects_bad_image_url() {
        let form = SubmissionForm {
            content: "따뜻하고 편해요".to_string(),
            image_urls: vec!["not a url".to_string()],
        };
        assert!(matches!(form.validate(), Err(ReviewError::Validation(_))));

        let form = SubmissionForm {
            content: "따뜻하고 편해요".to_string(),
            image_urls: vec!["https://cdn.ongil.example/review.jpg".to_string()],
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_draft_needs_details() {
        let draft = ReviewDraft {
            review_id: ReviewId::new(1),
            needs_size_detail: false,
            needs_material_detail: false,
        };
        assert!(!draft.needs_details());

        let draft = ReviewDraft {
            needs_material_detail: true,
            ..draft
        };
        assert!(draft.needs_details());
    }
}
