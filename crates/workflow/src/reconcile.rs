//! Per-section diff-and-synchronize against a loaded snapshot.
//!
//! Each synchronizer is invoked for exactly one open wizard section and
//! touches nothing outside it. Validation problems come back as a rejected
//! [`SubmitOutcome`]; a snapshot missing a prerequisite id is a loud
//! [`WorkflowError::MissingPrerequisite`]; store failures propagate.
//!
//! Ordering inside a synchronizer: creates/updates first (fanned out), then
//! the revision-guarded header patch, then deletes — the header never points
//! at a deleted record, and a crash after the patch leaves at worst an
//! unreferenced orphan.

use std::collections::HashSet;

use futures::future::join_all;

use bloomframe_core::{ExpectedRevision, Revision, SubmitOutcome};
use bloomframe_orders::{
    BouquetForm, CustomerPatch, CustomerSectionForm, Customers, FrameItemFields, FrameItemId,
    FrameItems, OrderId, OrderMetaPatch, OrderRelationsPatch, Orders, PaperweightFields,
    PaperweightItemId, PaperweightItems, PaperweightPatch, PaperweightSectionForm, WizardSnapshot,
};
use bloomframe_store::{collection, Collection, DocumentStore, StoreError};

use crate::error::{WorkflowError, WorkflowResult};
use crate::pipeline::EffectLedger;

/// Section synchronizers over an injected store handle.
pub struct ReconciliationEngine<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Customer/header section: always patches the customer's editable
    /// fields; patches the header's order-no/occasion-date/address fields
    /// when a header id is known. Neither record is created or deleted here.
    pub async fn sync_customer_section(
        &self,
        snapshot: &WizardSnapshot,
        section: &CustomerSectionForm,
    ) -> WorkflowResult<SubmitOutcome> {
        let header = match snapshot.order_id {
            Some(order_id) => match section.occasion_date {
                Some(date) => Some((order_id, date)),
                None => return Ok(SubmitOutcome::fail("Please provide the occasion date.")),
            },
            None => None,
        };

        collection::<Customers>(self.store)
            .patch(
                snapshot.customer_id,
                &CustomerPatch {
                    title: section.title,
                    first_name: Some(section.first_name.clone()),
                    surname: Some(section.surname.clone()),
                    email: Some(section.email.clone()),
                    telephone: Some(section.telephone.clone()),
                    how_recommended: section.how_recommended,
                },
                ExpectedRevision::Any,
            )
            .await?;

        if let Some((order_id, occasion_date)) = header {
            collection::<Orders>(self.store)
                .patch(
                    order_id,
                    &OrderMetaPatch {
                        order_no: section.order_no,
                        occasion_date,
                        billing: section.billing.clone(),
                        delivery_same_as_billing: section.delivery_same_as_billing,
                        delivery: section.delivery_block(),
                    },
                    ExpectedRevision::Any,
                )
                .await?;
        }

        Ok(SubmitOutcome::ok())
    }

    /// Bouquet section: reconcile the submitted rows against the snapshot by
    /// stable identity key.
    ///
    /// Rows carrying a known key update that record in place; keyless rows
    /// are created; snapshot records whose key no longer appears are deleted;
    /// the header list is rewritten to the submitted order under the
    /// snapshot's revision guard. A key matching nothing in the snapshot is a
    /// stale-snapshot conflict.
    pub async fn sync_bouquet_section(
        &self,
        snapshot: &WizardSnapshot,
        rows: &[BouquetForm],
    ) -> WorkflowResult<SubmitOutcome> {
        let existing: Vec<FrameItemId> = snapshot
            .bouquets
            .iter()
            .filter_map(|b| b.frame_item_id)
            .collect();

        if existing.is_empty() && rows.is_empty() {
            return Ok(SubmitOutcome::fail(
                "Please add at least one bouquet before saving this section.",
            ));
        }
        if rows.iter().any(|row| !row.is_complete()) {
            return Ok(SubmitOutcome::fail(
                "Please complete every bouquet before saving this section.",
            ));
        }

        let (order_id, revision) = header_identity(snapshot)?;

        let existing_keys: HashSet<FrameItemId> = existing.iter().copied().collect();
        for row in rows {
            if let Some(key) = row.frame_item_id {
                if !existing_keys.contains(&key) {
                    return Err(WorkflowError::UnknownFrameItem(key));
                }
            }
        }

        if rows.is_empty() {
            // Every record goes: truncate the header list first, then delete.
            collection::<Orders>(self.store)
                .patch(
                    order_id,
                    &OrderRelationsPatch {
                        frame_item_ids: Some(Vec::new()),
                        paperweight_item_id: None,
                    },
                    ExpectedRevision::Exact(revision),
                )
                .await?;
            self.delete_frames(&existing).await?;
            tracing::info!(%order_id, deleted = existing.len(), "bouquet section emptied");
            return Ok(SubmitOutcome::ok());
        }

        let payloads = rows
            .iter()
            .map(|row| row.to_frame_payload())
            .collect::<Result<Vec<FrameItemFields>, _>>()?;

        // Fan out the in-place updates and the creations together; row order
        // is preserved in the joined results.
        let frames_handle = collection::<FrameItems>(self.store);
        let results = join_all(rows.iter().zip(&payloads).map(|(row, payload)| {
            let frames_handle = &frames_handle;
            async move {
                match row.frame_item_id {
                    Some(key) => {
                        frames_handle
                            .patch(key, payload, ExpectedRevision::Any)
                            .await
                    }
                    None => frames_handle.create(payload).await,
                }
            }
        }))
        .await;

        let mut ledger = EffectLedger::new(self.store);
        let mut final_ids = Vec::with_capacity(results.len());
        let mut first_error: Option<StoreError> = None;
        for (row, result) in rows.iter().zip(results) {
            match result {
                Ok(record) => {
                    if row.frame_item_id.is_none() {
                        ledger.record(FrameItems::NAME, record.id);
                    }
                    final_ids.push(FrameItemId::new(record.id));
                }
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(_) => {}
            }
        }
        if let Some(err) = first_error {
            ledger.compensate().await;
            return Err(err.into());
        }

        let created = rows.iter().filter(|row| row.frame_item_id.is_none()).count();
        let removed: Vec<FrameItemId> = existing
            .iter()
            .copied()
            .filter(|id| !rows.iter().any(|row| row.frame_item_id == Some(*id)))
            .collect();

        if let Err(err) = collection::<Orders>(self.store)
            .patch(
                order_id,
                &OrderRelationsPatch {
                    frame_item_ids: Some(final_ids.clone()),
                    paperweight_item_id: None,
                },
                ExpectedRevision::Exact(revision),
            )
            .await
        {
            ledger.compensate().await;
            return Err(err.into());
        }

        self.delete_frames(&removed).await?;

        tracing::info!(
            %order_id,
            kept = final_ids.len() - created,
            created,
            removed = removed.len(),
            "bouquet section reconciled"
        );
        Ok(SubmitOutcome::ok())
    }

    /// Paperweight section: the `(had before, has now)` presence matrix.
    pub async fn sync_paperweight_section(
        &self,
        snapshot: &WizardSnapshot,
        section: &PaperweightSectionForm,
    ) -> WorkflowResult<SubmitOutcome> {
        if section.is_partial() {
            return Ok(SubmitOutcome::fail(
                "Please provide both paperweight quantity and price.",
            ));
        }

        let had_before = snapshot.has_paperweight;
        match (had_before, section.quantity.zip(section.price)) {
            // Never had one and none entered: nothing to save.
            (false, None) => Ok(SubmitOutcome::fail(
                "Please provide paperweight quantity and price before saving this section.",
            )),

            // Had one, removed now: clear the header reference, then delete.
            (true, None) => {
                let paperweight_id = snapshot
                    .paperweight_item_id
                    .ok_or(WorkflowError::MissingPrerequisite("paperweight item id"))?;
                let (order_id, revision) = header_identity(snapshot)?;

                collection::<Orders>(self.store)
                    .patch(
                        order_id,
                        &OrderRelationsPatch {
                            frame_item_ids: None,
                            paperweight_item_id: Some(None),
                        },
                        ExpectedRevision::Exact(revision),
                    )
                    .await?;
                collection::<PaperweightItems>(self.store)
                    .delete(paperweight_id)
                    .await?;

                tracing::info!(%order_id, %paperweight_id, "paperweight removed");
                Ok(SubmitOutcome::ok())
            }

            // Still has one: update the record in place, identity unchanged.
            (true, Some((quantity, price))) => {
                let paperweight_id = snapshot
                    .paperweight_item_id
                    .ok_or(WorkflowError::MissingPrerequisite("paperweight item id"))?;

                collection::<PaperweightItems>(self.store)
                    .patch(
                        paperweight_id,
                        &PaperweightPatch {
                            quantity,
                            price,
                            received: section.received.unwrap_or(false),
                        },
                        ExpectedRevision::Any,
                    )
                    .await?;
                Ok(SubmitOutcome::ok())
            }

            // Newly added: create the record, then point the header at it.
            (false, Some((quantity, price))) => {
                let (order_id, revision) = header_identity(snapshot)?;

                let record = collection::<PaperweightItems>(self.store)
                    .create(&PaperweightFields {
                        quantity,
                        price,
                        received: section.received.unwrap_or(false),
                    })
                    .await?;

                if let Err(err) = collection::<Orders>(self.store)
                    .patch(
                        order_id,
                        &OrderRelationsPatch {
                            frame_item_ids: None,
                            paperweight_item_id: Some(Some(PaperweightItemId::new(record.id))),
                        },
                        ExpectedRevision::Exact(revision),
                    )
                    .await
                {
                    let mut ledger = EffectLedger::new(self.store);
                    ledger.record(PaperweightItems::NAME, record.id);
                    ledger.compensate().await;
                    return Err(err.into());
                }

                tracing::info!(%order_id, paperweight_id = %record.id, "paperweight added");
                Ok(SubmitOutcome::ok())
            }
        }
    }

    async fn delete_frames(&self, ids: &[FrameItemId]) -> WorkflowResult<()> {
        let frames_handle = collection::<FrameItems>(self.store);
        let results = join_all(ids.iter().map(|id| frames_handle.delete(*id))).await;
        for result in results {
            // The header no longer references these, so a failed delete only
            // leaves an unreferenced orphan; still surface the first failure.
            result?;
        }
        Ok(())
    }
}

fn header_identity(snapshot: &WizardSnapshot) -> WorkflowResult<(OrderId, Revision)> {
    let order_id = snapshot
        .order_id
        .ok_or(WorkflowError::MissingPrerequisite("order id"))?;
    let revision = snapshot
        .order_revision
        .ok_or(WorkflowError::MissingPrerequisite("order revision"))?;
    Ok((order_id, revision))
}
