//! Optimistic concurrency primitives for stored records.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Monotonically increasing revision of a stored record.
///
/// The store bumps this by one on every successful update; writers that must
/// not clobber a concurrent editor pass the revision they loaded as an
/// [`ExpectedRevision`] guard.
pub type Revision = u64;

/// Revision expectation for a guarded update.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectedRevision {
    /// Skip the check (field patches that cannot corrupt relations).
    Any,
    /// Require the record to be at an exact revision.
    Exact(Revision),
}

impl ExpectedRevision {
    pub fn matches(self, actual: Revision) -> bool {
        match self {
            ExpectedRevision::Any => true,
            ExpectedRevision::Exact(r) => r == actual,
        }
    }

    pub fn check(self, actual: Revision) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "stale revision (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_matches_everything() {
        assert!(ExpectedRevision::Any.matches(0));
        assert!(ExpectedRevision::Any.matches(42));
    }

    #[test]
    fn exact_rejects_a_different_revision() {
        assert!(ExpectedRevision::Exact(3).matches(3));
        assert!(!ExpectedRevision::Exact(3).matches(4));
        assert!(ExpectedRevision::Exact(3).check(4).is_err());
    }
}
