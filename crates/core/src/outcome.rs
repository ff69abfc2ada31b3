//! Typed accept/reject outcome for section submissions.

use serde::{Deserialize, Serialize};

/// Result of validating and applying one wizard section.
///
/// Rejections carry a user-facing message and are part of the normal control
/// flow; store/IO failures are errors and travel separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Accepted,
    Rejected { message: String },
}

impl SubmitOutcome {
    pub fn ok() -> Self {
        Self::Accepted
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The rejection message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Rejected { message } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_carries_its_message() {
        let outcome = SubmitOutcome::fail("add at least one bouquet");
        assert!(!outcome.is_accepted());
        assert_eq!(outcome.message(), Some("add at least one bouquet"));
    }

    #[test]
    fn ok_has_no_message() {
        assert!(SubmitOutcome::ok().is_accepted());
        assert_eq!(SubmitOutcome::ok().message(), None);
    }
}
