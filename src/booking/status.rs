use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Number,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Number => "number",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card Payment",
            PaymentMethod::Number => "Payment by Number",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    PendingConfirmation,
    Paid,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::PendingConfirmation => "pending_confirmation",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Rejected => "rejected",
        }
    }

    /// `paid` and `rejected` are final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::PendingConfirmation)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_confirmation" => Ok(PaymentStatus::PendingConfirmation),
            "paid" => Ok(PaymentStatus::Paid),
            "rejected" => Ok(PaymentStatus::Rejected),
            other => Err(other.to_string()),
        }
    }
}

/// Admin verdict on a payment proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(&self) -> PaymentStatus {
        match self {
            Decision::Approve => PaymentStatus::Paid,
            Decision::Reject => PaymentStatus::Rejected,
        }
    }
}

/// Badge text for a stored status; unknown values are shown as stored.
pub fn status_badge(raw: &str) -> String {
    match raw.parse::<PaymentStatus>() {
        Ok(PaymentStatus::PendingConfirmation) => "Pending".to_string(),
        Ok(PaymentStatus::Paid) => "Paid".to_string(),
        Ok(PaymentStatus::Rejected) => "Rejected".to_string(),
        Err(raw) => raw,
    }
}

/// Approve/reject controls are offered only while confirmation is pending.
pub fn can_moderate(raw: &str) -> bool {
    raw.parse::<PaymentStatus>()
        .map(|status| !status.is_terminal())
        .unwrap_or(false)
}
