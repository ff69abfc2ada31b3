//! `bloomframe-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no store or IO concerns).

pub mod error;
pub mod id;
pub mod outcome;
pub mod revision;

pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use outcome::SubmitOutcome;
pub use revision::{ExpectedRevision, Revision};
