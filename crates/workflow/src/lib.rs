//! `bloomframe-workflow` — keeping the order aggregate consistent.
//!
//! The store offers only single-record atomic operations, so consistency
//! across the customer/header/children aggregate is this crate's whole job:
//!
//! - [`WizardController`] sequences the staged intake wizard and decides what
//!   a submission means in create vs edit mode.
//! - [`CreationPipeline`] creates the records of a new order in dependency
//!   order, compensating everything already created when a later step fails.
//! - [`ReconciliationEngine`] diffs a loaded snapshot against newly submitted
//!   section values and emits the minimal creates/updates/deletes.

pub mod controller;
pub mod error;
pub mod ops;
pub mod pipeline;
pub mod reconcile;
pub mod stage;

pub use controller::{SubmitResult, WizardController};
pub use error::{WorkflowError, WorkflowResult};
pub use ops::{set_frame_completion, set_order_statuses, set_paperweight_received};
pub use pipeline::{CreatedOrder, CreationPipeline, PipelineOutcome};
pub use reconcile::ReconciliationEngine;
pub use stage::{StageForm, StageKind, WizardMode, WizardStage};
