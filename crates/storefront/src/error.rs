//! User-facing error message policy.
//!
//! Every error shown to a shopper follows one rule: prefer the specific
//! message (validation text or whatever the backend sent), fall back to
//! a generic one, never leave the user without feedback. Transport and
//! status details stay in tracing output; they are never shown.

use crate::cart::CartError;
use crate::review::ReviewError;

/// Generic fallback shown when no specific message exists.
pub const GENERIC_FAILURE_MESSAGE: &str = "요청을 처리하지 못했습니다. 잠시 후 다시 시도해주세요.";

/// Errors that can be rendered for the shopper.
pub trait UserFacing {
    /// The message to display, always non-empty.
    fn user_message(&self) -> String;
}

impl UserFacing for CartError {
    fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Rejected(Some(message)) => message.clone(),
            Self::UnknownLine(_) => "이미 삭제된 상품입니다.".to_string(),
            Self::Backend(_) | Self::Rejected(None) | Self::NothingPending => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

impl UserFacing for ReviewError {
    fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::StepNotPersisted(Some(message)) => message.clone(),
            Self::Backend(_) | Self::StepNotPersisted(None) | Self::WrongStep(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ongil_core::CartId;

    #[test]
    fn test_specific_messages_win() {
        let err = CartError::Validation("수량은 1개 이상이어야 합니다.".to_string());
        assert_eq!(err.user_message(), "수량은 1개 이상이어야 합니다.");

        let err = CartError::Rejected(Some("재고가 부족합니다.".to_string()));
        assert_eq!(err.user_message(), "재고가 부족합니다.");

        let err = ReviewError::StepNotPersisted(Some("이미 작성한 리뷰입니다.".to_string()));
        assert_eq!(err.user_message(), "이미 작성한 리뷰입니다.");
    }

    #[test]
    fn test_fallback_is_never_empty() {
        let errors: Vec<CartError> = vec![
            CartError::Rejected(None),
            CartError::NothingPending,
            CartError::UnknownLine(CartId::new(1)),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }

    #[test]
    fn test_backend_details_are_not_exposed() {
        let api_err = crate::api::ApiError::Status {
            status: 500,
            body: "stack trace with internals".to_string(),
        };
        let err = CartError::Backend(api_err);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
