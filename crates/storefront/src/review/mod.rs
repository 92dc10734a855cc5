//! Multi-step review wizard.
//!
//! A linear three-step machine: basics (rating plus three mandatory
//! categorical answers), conditional secondary questions, then free text
//! and submission. Transitions are forward/backward only; every forward
//! transition persists the current step's answers to the backend before
//! advancing and aborts (returning the error inline) if the persist
//! fails. The secondary-question step is structurally absent when the
//! server reports that neither follow-up applies.

pub mod error;
pub mod types;
pub mod wizard;

pub use error::ReviewError;
pub use types::{
    BasicsAnswers, Comfort, DetailsAnswers, MaterialFeel, ReviewDraft, SizeFit, SubmissionForm,
    WizardStep,
};
pub use wizard::ReviewWizard;
