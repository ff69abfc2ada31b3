//! Record envelopes returned by the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use bloomframe_core::{RecordId, Revision};

use crate::client::Collection;
use crate::error::{StoreError, StoreResult};

/// A record inlined under a parent's `expand` key.
///
/// Single-relation fields expand to `One`, multi-relation fields to `Many`.
/// An empty/absent relation simply has no entry in the map.
#[derive(Debug, Clone, PartialEq)]
pub enum Expanded {
    One(Box<RawRecord>),
    Many(Vec<RawRecord>),
}

/// A stored record as the store returns it: identity, bookkeeping metadata,
/// the field bag, and any expansions the read requested.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: RecordId,
    pub collection: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Bumped by one on every successful update.
    pub revision: Revision,
    /// Always a JSON object.
    pub fields: JsonValue,
    pub expand: BTreeMap<String, Expanded>,
}

impl RawRecord {
    /// Deserialize the field bag into a typed field struct.
    pub fn fields_as<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(self.fields.clone())
            .map_err(|e| StoreError::shape(self.collection.clone(), e.to_string()))
    }

    /// The single record expanded under `field`, if present.
    pub fn expand_one(&self, field: &str) -> Option<&RawRecord> {
        match self.expand.get(field) {
            Some(Expanded::One(record)) => Some(record),
            _ => None,
        }
    }

    /// The records expanded under a multi-relation `field`.
    ///
    /// An absent or empty relation yields an empty slice, never an error.
    pub fn expand_many(&self, field: &str) -> &[RawRecord] {
        match self.expand.get(field) {
            Some(Expanded::Many(records)) => records,
            _ => &[],
        }
    }
}

/// A record whose field bag has been deserialized into a collection's typed
/// field struct. Expansions are dropped; use [`RawRecord`] for expanded reads.
#[derive(Debug, Clone)]
pub struct TypedRecord<C: Collection> {
    pub id: RecordId,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub revision: Revision,
    pub fields: C::Fields,
}

impl<C: Collection> TypedRecord<C> {
    pub fn from_raw(raw: &RawRecord) -> StoreResult<Self> {
        Ok(Self {
            id: raw.id,
            created: raw.created,
            updated: raw.updated,
            revision: raw.revision,
            fields: raw.fields_as::<C::Fields>()?,
        })
    }
}
