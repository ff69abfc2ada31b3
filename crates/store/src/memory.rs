//! In-memory document store.
//!
//! Intended for tests/dev. Not optimized for performance. Relation fields are
//! plain id values with no referential integrity, matching the real store;
//! expansion is driven by a small relation registry so dot-paths know which
//! collection a field points at.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use bloomframe_core::{ExpectedRevision, RecordId, Revision};

use crate::client::DocumentStore;
use crate::error::{StoreError, StoreResult};
use crate::expand::{Expand, Filter, ListQuery, SortSpec};
use crate::record::{Expanded, RawRecord};

/// Declares that `collection.field` holds id(s) of records in `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    pub collection: &'static str,
    pub field: &'static str,
    pub target: &'static str,
}

#[derive(Debug, Clone)]
struct StoredDoc {
    id: RecordId,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    revision: Revision,
    fields: JsonValue,
}

type Collections = HashMap<String, BTreeMap<RecordId, StoredDoc>>;

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
    relations: Vec<RelationDef>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relation so expansion and dotted filters can follow it.
    pub fn with_relation(
        mut self,
        collection: &'static str,
        field: &'static str,
        target: &'static str,
    ) -> Self {
        self.relations.push(RelationDef {
            collection,
            field,
            target,
        });
        self
    }

    fn lock_read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    fn lock_write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    fn relation_target(&self, collection: &str, field: &str) -> Option<&'static str> {
        self.relations
            .iter()
            .find(|r| r.collection == collection && r.field == field)
            .map(|r| r.target)
    }

    fn to_raw(
        &self,
        collections: &Collections,
        collection: &str,
        doc: &StoredDoc,
        expand: &Expand,
    ) -> RawRecord {
        let mut record = RawRecord {
            id: doc.id,
            collection: collection.to_string(),
            created: doc.created,
            updated: doc.updated,
            revision: doc.revision,
            fields: doc.fields.clone(),
            expand: BTreeMap::new(),
        };

        // Group dot-paths by their head segment, keeping the tails.
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for path in expand.iter() {
            let (head, tail) = match path.split_once('.') {
                Some((head, tail)) => (head, Some(tail)),
                None => (path, None),
            };
            let tails = grouped.entry(head).or_default();
            if let Some(tail) = tail {
                tails.push(tail);
            }
        }

        for (field, tails) in grouped {
            let Some(target) = self.relation_target(collection, field) else {
                continue;
            };
            let nested = Expand::paths(tails.iter().copied());
            match doc.fields.get(field) {
                Some(JsonValue::String(id)) => {
                    if let Some(child) = self.lookup(collections, target, id) {
                        let raw = self.to_raw(collections, target, child, &nested);
                        record
                            .expand
                            .insert(field.to_string(), Expanded::One(Box::new(raw)));
                    }
                }
                Some(JsonValue::Array(ids)) => {
                    let children: Vec<RawRecord> = ids
                        .iter()
                        .filter_map(JsonValue::as_str)
                        .filter_map(|id| self.lookup(collections, target, id))
                        .map(|child| self.to_raw(collections, target, child, &nested))
                        .collect();
                    if !children.is_empty() {
                        record
                            .expand
                            .insert(field.to_string(), Expanded::Many(children));
                    }
                }
                _ => {}
            }
        }

        record
    }

    fn lookup<'a>(
        &self,
        collections: &'a Collections,
        collection: &str,
        id: &str,
    ) -> Option<&'a StoredDoc> {
        let id = RecordId::from_str(id).ok()?;
        collections.get(collection)?.get(&id)
    }

    /// Resolve a possibly-dotted field path from a record, following single
    /// relations. `id` resolves to the record's own identifier.
    fn resolve_path(
        &self,
        collections: &Collections,
        collection: &str,
        doc: &StoredDoc,
        path: &str,
    ) -> Option<JsonValue> {
        match path.split_once('.') {
            None => {
                if path == "id" {
                    Some(JsonValue::String(doc.id.to_string()))
                } else {
                    doc.fields.get(path).cloned()
                }
            }
            Some((head, tail)) => {
                let target = self.relation_target(collection, head)?;
                let id = doc.fields.get(head)?.as_str()?;
                let child = self.lookup(collections, target, id)?;
                self.resolve_path(collections, target, child, tail)
            }
        }
    }

    fn matches(
        &self,
        collections: &Collections,
        collection: &str,
        doc: &StoredDoc,
        filter: &Filter,
    ) -> StoreResult<bool> {
        for clause in parse_filter(filter)? {
            let actual = self.resolve_path(collections, collection, doc, &clause.path);
            if !clause.eval(actual.as_ref()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn collect_matching(
        &self,
        collections: &Collections,
        collection: &str,
        filter: Option<&Filter>,
    ) -> StoreResult<Vec<StoredDoc>> {
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for doc in docs.values() {
            let keep = match filter {
                Some(f) if !f.is_empty() => self.matches(collections, collection, doc, f)?,
                _ => true,
            };
            if keep {
                out.push(doc.clone());
            }
        }
        Ok(out)
    }

    fn sort_docs(
        &self,
        collections: &Collections,
        collection: &str,
        docs: &mut [StoredDoc],
        sort: &SortSpec,
    ) {
        docs.sort_by(|a, b| {
            let va = self.resolve_path(collections, collection, a, &sort.field);
            let vb = self.resolve_path(collections, collection, b, &sort.field);
            let ord = compare_values(va.as_ref(), vb.as_ref());
            if sort.descending { ord.reverse() } else { ord }
        });
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryStore {
    async fn create(&self, collection: &str, fields: JsonValue) -> StoreResult<RawRecord> {
        if !fields.is_object() {
            return Err(StoreError::InvalidPayload(
                "create payload must be a JSON object".into(),
            ));
        }

        let now = Utc::now();
        let doc = StoredDoc {
            id: RecordId::new(),
            created: now,
            updated: now,
            revision: 1,
            fields,
        };

        let mut collections = self.lock_write()?;
        let raw = self.to_raw(&collections, collection, &doc, &Expand::none());
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(doc.id, doc);
        Ok(raw)
    }

    async fn update(
        &self,
        collection: &str,
        id: RecordId,
        patch: JsonValue,
        guard: ExpectedRevision,
    ) -> StoreResult<RawRecord> {
        let JsonValue::Object(patch) = patch else {
            return Err(StoreError::InvalidPayload(
                "update payload must be a JSON object".into(),
            ));
        };

        let mut collections = self.lock_write()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        if let ExpectedRevision::Exact(expected) = guard {
            if doc.revision != expected {
                return Err(StoreError::StaleRevision {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    expected,
                    actual: doc.revision,
                });
            }
        }

        let Some(fields) = doc.fields.as_object_mut() else {
            return Err(StoreError::InvalidPayload(
                "stored fields are not an object".into(),
            ));
        };
        for (key, value) in patch {
            // An explicit null clears the field, matching the store's patch
            // semantics for optional relations.
            if value.is_null() {
                fields.remove(&key);
            } else {
                fields.insert(key, value);
            }
        }
        doc.revision += 1;
        doc.updated = Utc::now();

        let doc = doc.clone();
        Ok(self.to_raw(&collections, collection, &doc, &Expand::none()))
    }

    async fn delete(&self, collection: &str, id: RecordId) -> StoreResult<()> {
        let mut collections = self.lock_write()?;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(&id));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn get_one(
        &self,
        collection: &str,
        id: RecordId,
        expand: &Expand,
    ) -> StoreResult<RawRecord> {
        let collections = self.lock_read()?;
        let doc = collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        Ok(self.to_raw(&collections, collection, doc, expand))
    }

    async fn get_first_list_item(
        &self,
        collection: &str,
        filter: &Filter,
        expand: &Expand,
    ) -> StoreResult<RawRecord> {
        let collections = self.lock_read()?;
        let matching = self.collect_matching(&collections, collection, Some(filter))?;
        let doc = matching
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NoMatch(filter.as_str().to_string()))?;
        Ok(self.to_raw(&collections, collection, &doc, expand))
    }

    async fn get_full_list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> StoreResult<Vec<RawRecord>> {
        let collections = self.lock_read()?;
        let mut docs = self.collect_matching(&collections, collection, query.filter.as_ref())?;
        if let Some(sort) = &query.sort {
            self.sort_docs(&collections, collection, &mut docs, sort);
        }
        Ok(docs
            .iter()
            .map(|doc| self.to_raw(&collections, collection, doc, &query.expand))
            .collect())
    }
}

#[derive(Debug, PartialEq)]
enum Op {
    Eq,
    Ne,
    Contains,
}

#[derive(Debug)]
struct Clause {
    path: String,
    op: Op,
    value: String,
}

impl Clause {
    fn eval(&self, actual: Option<&JsonValue>) -> bool {
        let hit = match actual {
            None | Some(JsonValue::Null) => false,
            Some(JsonValue::String(s)) => match self.op {
                Op::Contains => s.to_lowercase().contains(&self.value.to_lowercase()),
                _ => *s == self.value,
            },
            Some(JsonValue::Number(n)) => self
                .value
                .parse::<f64>()
                .is_ok_and(|rhs| n.as_f64() == Some(rhs)),
            Some(JsonValue::Bool(b)) => self.value.parse::<bool>().is_ok_and(|rhs| *b == rhs),
            // `~` against a multi-relation checks membership.
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(JsonValue::as_str)
                .any(|s| s == self.value),
            Some(JsonValue::Object(_)) => false,
        };
        match self.op {
            Op::Ne => !hit,
            _ => hit,
        }
    }
}

fn parse_filter(filter: &Filter) -> StoreResult<Vec<Clause>> {
    let expr = filter.as_str().trim();
    if expr.is_empty() {
        return Ok(Vec::new());
    }

    expr.split(" && ").map(parse_clause).collect()
}

fn parse_clause(clause: &str) -> StoreResult<Clause> {
    // Split on the earliest operator occurrence so a quoted value containing
    // another operator's token cannot hijack the parse.
    let hit = [(" != ", Op::Ne), (" ~ ", Op::Contains), (" = ", Op::Eq)]
        .into_iter()
        .filter_map(|(token, op)| clause.find(token).map(|at| (at, token, op)))
        .min_by_key(|(at, _, _)| *at);

    let Some((at, token, op)) = hit else {
        return Err(StoreError::InvalidFilter(clause.to_string()));
    };
    let (path, value) = (&clause[..at], &clause[at + token.len()..]);
    Ok(Clause {
        path: path.trim().to_string(),
        op,
        value: unquote(value.trim())?,
    })
}

fn unquote(value: &str) -> StoreResult<String> {
    if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Ok(inner.replace("\\\"", "\"").replace("\\\\", "\\"))
    } else if value.is_empty() {
        Err(StoreError::InvalidFilter("empty comparison value".into()))
    } else {
        // Bare number/bool literal.
        Ok(value.to_string())
    }
}

fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_relation("customers", "order_id", "orders")
            .with_relation("orders", "frame_item_ids", "order_frame_items")
    }

    #[tokio::test]
    async fn create_assigns_identity_and_revision() {
        let store = store();
        let record = store
            .create("orders", json!({ "order_no": 7 }))
            .await
            .unwrap();
        assert_eq!(record.revision, 1);
        assert_eq!(record.fields["order_no"], json!(7));
    }

    #[tokio::test]
    async fn update_merges_clears_nulls_and_bumps_revision() {
        let store = store();
        let created = store
            .create("orders", json!({ "order_no": 7, "notes": "rush" }))
            .await
            .unwrap();

        let updated = store
            .update(
                "orders",
                created.id,
                json!({ "order_no": 8, "notes": null }),
                ExpectedRevision::Any,
            )
            .await
            .unwrap();

        assert_eq!(updated.revision, 2);
        assert_eq!(updated.fields["order_no"], json!(8));
        assert!(updated.fields.get("notes").is_none());
    }

    #[tokio::test]
    async fn stale_revision_guard_rejects_the_write() {
        let store = store();
        let created = store.create("orders", json!({ "order_no": 1 })).await.unwrap();
        store
            .update(
                "orders",
                created.id,
                json!({ "order_no": 2 }),
                ExpectedRevision::Any,
            )
            .await
            .unwrap();

        let err = store
            .update(
                "orders",
                created.id,
                json!({ "order_no": 3 }),
                ExpectedRevision::Exact(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StaleRevision { actual: 2, .. }));

        let current = store
            .get_one("orders", created.id, &Expand::none())
            .await
            .unwrap();
        assert_eq!(current.fields["order_no"], json!(2));
    }

    #[tokio::test]
    async fn expansion_inlines_children_and_skips_absent_relations() {
        let store = store();
        let frame = store
            .create("order_frame_items", json!({ "price": 120.0 }))
            .await
            .unwrap();
        let order = store
            .create(
                "orders",
                json!({ "order_no": 1, "frame_item_ids": [frame.id.to_string()] }),
            )
            .await
            .unwrap();
        let customer = store
            .create(
                "customers",
                json!({ "surname": "Price", "order_id": order.id.to_string() }),
            )
            .await
            .unwrap();

        let expanded = store
            .get_one(
                "customers",
                customer.id,
                &Expand::paths(["order_id", "order_id.frame_item_ids"]),
            )
            .await
            .unwrap();

        let order_rec = expanded.expand_one("order_id").unwrap();
        assert_eq!(order_rec.id, order.id);
        let frames = order_rec.expand_many("frame_item_ids");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, frame.id);

        // No paperweight relation registered or set: absent key, not an error.
        assert!(order_rec.expand_one("paperweight_item_id").is_none());
    }

    #[tokio::test]
    async fn filters_follow_dotted_relation_paths() {
        let store = store();
        let order = store
            .create("orders", json!({ "order_no": 42, "occasion_date": "2026-06-20" }))
            .await
            .unwrap();
        store
            .create(
                "customers",
                json!({ "surname": "Bloom", "order_id": order.id.to_string() }),
            )
            .await
            .unwrap();
        store
            .create("customers", json!({ "surname": "Other" }))
            .await
            .unwrap();

        let hit = store
            .get_first_list_item(
                "customers",
                &Filter::raw(r#"order_id.occasion_date ~ "2026-06""#),
                &Expand::none(),
            )
            .await
            .unwrap();
        assert_eq!(hit.fields["surname"], json!("Bloom"));

        let miss = store
            .get_first_list_item(
                "customers",
                &Filter::eq("surname", "Nobody"),
                &Expand::none(),
            )
            .await;
        assert!(matches!(miss, Err(StoreError::NoMatch(_))));
    }

    #[tokio::test]
    async fn full_list_sorts_by_dotted_path_descending() {
        let store = store();
        for (surname, no) in [("First", 1), ("Third", 3), ("Second", 2)] {
            let order = store
                .create("orders", json!({ "order_no": no }))
                .await
                .unwrap();
            store
                .create(
                    "customers",
                    json!({ "surname": surname, "order_id": order.id.to_string() }),
                )
                .await
                .unwrap();
        }

        let listed = store
            .get_full_list(
                "customers",
                &ListQuery::new().sort("-order_id.order_no"),
            )
            .await
            .unwrap();
        let surnames: Vec<_> = listed
            .iter()
            .map(|r| r.fields["surname"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(surnames, ["Third", "Second", "First"]);
    }
}
