//! `bloomframe-store` — the document-store contract this system consumes.
//!
//! The backing store offers single-record atomic operations plus a declarative
//! expansion mechanism; it has no multi-record transactions. Everything in
//! this crate is an explicit client handle passed into operations — there is
//! no module-level store singleton and no implicit auth state.

pub mod client;
pub mod error;
pub mod expand;
pub mod memory;
pub mod record;

pub use client::{collection, Collection, CollectionHandle, DocumentStore};
pub use error::{StoreError, StoreResult};
pub use expand::{Expand, Filter, ListQuery, SortSpec};
pub use memory::{InMemoryStore, RelationDef};
pub use record::{Expanded, RawRecord, TypedRecord};
