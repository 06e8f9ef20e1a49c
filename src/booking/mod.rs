pub mod format;
pub mod moderation;
pub mod proof;
pub mod status;
pub mod submission;
pub mod wizard;

pub use status::{Decision, PaymentMethod, PaymentStatus};
pub use wizard::{BookingSummary, BookingWizard, PaymentStage, Step, WizardError};

use crate::error::AppError;
use proof::ProofError;

impl From<ProofError> for AppError {
    fn from(err: ProofError) -> Self {
        match err {
            ProofError::Storage(e) => AppError::Storage(format!("Failed to upload payment proof: {}", e)),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Proof(e) => e.into(),
            WizardError::Database(e) => AppError::Database(e),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
