//! The consumed store contract and its typed collection handles.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use bloomframe_core::{ExpectedRevision, RecordId};

use crate::error::{StoreError, StoreResult};
use crate::expand::{Expand, Filter, ListQuery};
use crate::record::{RawRecord, TypedRecord};

/// Per-collection client contract (single-record atomic operations plus
/// declarative expansion on reads).
///
/// Implementations must:
/// - treat `create`/`update`/`delete` as atomic per record (no batching)
/// - honor the [`ExpectedRevision`] guard on `update` and reject stale writes
/// - on reads, inline requested relations under the record's `expand` key and
///   expand an absent relation to an absent key, never an error
///
/// The handle is always passed in explicitly; auth credentials belong to the
/// implementation talking to the real backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a record from a JSON field bag; the store assigns the id,
    /// timestamps and initial revision.
    async fn create(&self, collection: &str, fields: JsonValue) -> StoreResult<RawRecord>;

    /// Patch a record. Entries in `patch` overwrite fields; an explicit JSON
    /// `null` clears a field. The revision guard is checked before the write.
    async fn update(
        &self,
        collection: &str,
        id: RecordId,
        patch: JsonValue,
        guard: ExpectedRevision,
    ) -> StoreResult<RawRecord>;

    /// Delete a record. Relation fields elsewhere are NOT cleaned up — the
    /// store has no referential integrity.
    async fn delete(&self, collection: &str, id: RecordId) -> StoreResult<()>;

    async fn get_one(
        &self,
        collection: &str,
        id: RecordId,
        expand: &Expand,
    ) -> StoreResult<RawRecord>;

    /// First record matching `filter`, or [`StoreError::NoMatch`].
    async fn get_first_list_item(
        &self,
        collection: &str,
        filter: &Filter,
        expand: &Expand,
    ) -> StoreResult<RawRecord>;

    async fn get_full_list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> StoreResult<Vec<RawRecord>>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn create(&self, collection: &str, fields: JsonValue) -> StoreResult<RawRecord> {
        (**self).create(collection, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: RecordId,
        patch: JsonValue,
        guard: ExpectedRevision,
    ) -> StoreResult<RawRecord> {
        (**self).update(collection, id, patch, guard).await
    }

    async fn delete(&self, collection: &str, id: RecordId) -> StoreResult<()> {
        (**self).delete(collection, id).await
    }

    async fn get_one(
        &self,
        collection: &str,
        id: RecordId,
        expand: &Expand,
    ) -> StoreResult<RawRecord> {
        (**self).get_one(collection, id, expand).await
    }

    async fn get_first_list_item(
        &self,
        collection: &str,
        filter: &Filter,
        expand: &Expand,
    ) -> StoreResult<RawRecord> {
        (**self).get_first_list_item(collection, filter, expand).await
    }

    async fn get_full_list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> StoreResult<Vec<RawRecord>> {
        (**self).get_full_list(collection, query).await
    }
}

/// Static binding between a collection name and its typed field struct.
pub trait Collection {
    const NAME: &'static str;
    type Fields: Serialize + DeserializeOwned + Clone + core::fmt::Debug + Send + Sync;
}

/// Typed view over one collection of a [`DocumentStore`].
pub struct CollectionHandle<'a, C: Collection> {
    store: &'a dyn DocumentStore,
    _collection: PhantomData<C>,
}

/// Entry point: `collection::<Customers>(&store).create(&fields)`.
pub fn collection<C: Collection>(store: &dyn DocumentStore) -> CollectionHandle<'_, C> {
    CollectionHandle {
        store,
        _collection: PhantomData,
    }
}

impl<'a, C: Collection> CollectionHandle<'a, C> {
    pub async fn create(&self, fields: &C::Fields) -> StoreResult<TypedRecord<C>> {
        let fields = to_object::<C>(fields)?;
        let raw = self.store.create(C::NAME, fields).await?;
        TypedRecord::from_raw(&raw)
    }

    /// Patch with a partial payload (serialize only the fields to touch).
    pub async fn patch<P: Serialize + Sync>(
        &self,
        id: impl Into<RecordId>,
        patch: &P,
        guard: ExpectedRevision,
    ) -> StoreResult<TypedRecord<C>> {
        let patch = to_object::<C>(patch)?;
        let raw = self.store.update(C::NAME, id.into(), patch, guard).await?;
        TypedRecord::from_raw(&raw)
    }

    pub async fn delete(&self, id: impl Into<RecordId>) -> StoreResult<()> {
        self.store.delete(C::NAME, id.into()).await
    }

    pub async fn fetch(&self, id: impl Into<RecordId>) -> StoreResult<TypedRecord<C>> {
        let raw = self
            .store
            .get_one(C::NAME, id.into(), &Expand::none())
            .await?;
        TypedRecord::from_raw(&raw)
    }

    /// Expanded read; returns the raw envelope so callers can walk `expand`.
    pub async fn fetch_expanded(
        &self,
        id: impl Into<RecordId>,
        expand: &Expand,
    ) -> StoreResult<RawRecord> {
        self.store.get_one(C::NAME, id.into(), expand).await
    }

    pub async fn first_matching(
        &self,
        filter: &Filter,
        expand: &Expand,
    ) -> StoreResult<RawRecord> {
        self.store
            .get_first_list_item(C::NAME, filter, expand)
            .await
    }

    pub async fn list(&self, query: &ListQuery) -> StoreResult<Vec<RawRecord>> {
        self.store.get_full_list(C::NAME, query).await
    }
}

fn to_object<C: Collection>(payload: &impl Serialize) -> StoreResult<JsonValue> {
    let value = serde_json::to_value(payload)
        .map_err(|e| StoreError::shape(C::NAME, e.to_string()))?;
    if !value.is_object() {
        return Err(StoreError::InvalidPayload(format!(
            "{} payload must serialize to an object",
            C::NAME
        )));
    }
    Ok(value)
}
