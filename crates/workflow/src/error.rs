//! Workflow error model.

use thiserror::Error;

use bloomframe_core::DomainError;
use bloomframe_orders::FrameItemId;
use bloomframe_store::StoreError;

use crate::stage::WizardStage;

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors surfaced at the mutation boundary.
///
/// Validation rejections are NOT errors — they travel as
/// [`SubmitOutcome::Rejected`](bloomframe_core::SubmitOutcome) with a
/// user-facing message. Everything here means the caller invoked the workflow
/// wrongly or the store failed.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A synchronizer needed an id the snapshot does not carry. The legacy
    /// behavior was to silently report success; this is the loud replacement.
    #[error("missing prerequisite: no {0} in the loaded snapshot")]
    MissingPrerequisite(&'static str),

    #[error("submitted {submitted} values while the {open} stage is open")]
    StageMismatch {
        open: WizardStage,
        submitted: &'static str,
    },

    #[error("the wizard is closed")]
    WizardClosed,

    /// A bouquet row carried an identity key that matches nothing in the
    /// snapshot — the caller is diffing against a stale aggregate.
    #[error("bouquet row references an unknown frame item {0}")]
    UnknownFrameItem(FrameItemId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
