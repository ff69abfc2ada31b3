//! Ordered multi-record creation.
//!
//! Children must exist before the header that references their ids, and the
//! header before the customer that references it. The store cannot do this in
//! one transaction, so the pipeline runs as a saga: every completed create is
//! recorded in an effect ledger, and any later failure triggers compensating
//! deletes of everything created in this run.

use futures::future::join_all;

use bloomframe_core::{RecordId, SubmitOutcome};
use bloomframe_orders::{
    CustomerFields, Customers, ExpandedOrder, FrameItemFields, FrameItemId, FrameItems,
    OrderFields, OrderForm, OrderId, OrderStatus, Orders, PaperweightFields, PaperweightItemId,
    PaperweightItems, PaymentStatus,
};
use bloomframe_store::{collection, Collection, DocumentStore, StoreError, TypedRecord};

use crate::error::{WorkflowError, WorkflowResult};

/// Everything a successful run created, with the header re-fetched so both
/// child relations come back expanded.
#[derive(Debug)]
pub struct CreatedOrder {
    pub customer: TypedRecord<Customers>,
    pub order: ExpandedOrder,
    pub frame_items: Vec<TypedRecord<FrameItems>>,
    pub paperweight_item: Option<TypedRecord<PaperweightItems>>,
}

/// Validation rejections carry a message; only store failures are errors.
#[derive(Debug)]
pub enum PipelineOutcome {
    Created(Box<CreatedOrder>),
    Rejected { message: String },
}

/// Ordered multi-record creation over an injected store handle.
pub struct CreationPipeline<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CreationPipeline<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Create the aggregate for a completed intake form.
    ///
    /// Steps, in dependency order: frame items (fanned out), the optional
    /// paperweight, the header referencing the children, the customer
    /// referencing the header, then a re-fetch of the header with both child
    /// relations expanded.
    pub async fn create(&self, form: &OrderForm) -> WorkflowResult<PipelineOutcome> {
        // Incomplete bouquet rows are dropped, as the intake form does.
        let bouquets: Vec<_> = form.bouquets.iter().filter(|b| b.is_complete()).collect();

        if bouquets.is_empty() && !form.paperweight.has_details() {
            return Ok(rejected(
                "Please add at least one bouquet before saving this order.",
            ));
        }
        if form.paperweight.is_partial() {
            return Ok(rejected(
                "Please provide both paperweight quantity and price.",
            ));
        }
        let Some(occasion_date) = form.customer.occasion_date else {
            return Ok(rejected("Please provide the occasion date."));
        };

        let payloads = bouquets
            .iter()
            .map(|b| b.to_frame_payload())
            .collect::<Result<Vec<FrameItemFields>, _>>()?;

        let mut ledger = EffectLedger::new(self.store);

        // Step 1: frame items, created concurrently and joined.
        let frames_handle = collection::<FrameItems>(self.store);
        let results = join_all(payloads.iter().map(|p| frames_handle.create(p))).await;

        let mut frame_items = Vec::with_capacity(results.len());
        let mut first_error: Option<StoreError> = None;
        for result in results {
            match result {
                Ok(record) => {
                    ledger.record(FrameItems::NAME, record.id);
                    frame_items.push(record);
                }
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(_) => {}
            }
        }
        if let Some(err) = first_error {
            ledger.compensate().await;
            return Err(err.into());
        }

        // Step 2: the paperweight, iff both of its fields were entered.
        let paperweight_item = match (form.paperweight.quantity, form.paperweight.price) {
            (Some(quantity), Some(price)) => {
                let fields = PaperweightFields {
                    quantity,
                    price,
                    received: false,
                };
                match collection::<PaperweightItems>(self.store).create(&fields).await {
                    Ok(record) => {
                        ledger.record(PaperweightItems::NAME, record.id);
                        Some(record)
                    }
                    Err(err) => {
                        ledger.compensate().await;
                        return Err(err.into());
                    }
                }
            }
            _ => None,
        };

        // Step 3: the header, referencing the children just created.
        let order_fields = OrderFields {
            order_no: form.customer.order_no,
            occasion_date,
            notes: String::new(),
            billing: form.customer.billing.clone(),
            delivery_same_as_billing: form.customer.delivery_same_as_billing,
            delivery: form.customer.delivery_block(),
            order_status: OrderStatus::Draft,
            payment_status: PaymentStatus::WaitingFirstDeposit,
            frame_item_ids: frame_items
                .iter()
                .map(|f| FrameItemId::new(f.id))
                .collect(),
            paperweight_item_id: paperweight_item
                .as_ref()
                .map(|pw| PaperweightItemId::new(pw.id)),
        };
        let order = match collection::<Orders>(self.store).create(&order_fields).await {
            Ok(record) => {
                ledger.record(Orders::NAME, record.id);
                record
            }
            Err(err) => {
                ledger.compensate().await;
                return Err(err.into());
            }
        };

        // Step 4: the customer, referencing the new header.
        let customer_fields = CustomerFields {
            title: form.customer.title,
            first_name: form.customer.first_name.clone(),
            surname: form.customer.surname.clone(),
            email: form.customer.email.clone(),
            telephone: form.customer.telephone.clone(),
            how_recommended: form.customer.how_recommended,
            order_id: OrderId::new(order.id),
        };
        let customer = match collection::<Customers>(self.store).create(&customer_fields).await {
            Ok(record) => record,
            Err(err) => {
                ledger.compensate().await;
                return Err(err.into());
            }
        };

        // Step 5: re-fetch with both child relations expanded. The aggregate
        // is fully created by now, so a read failure must NOT trigger
        // compensation.
        let raw = collection::<Orders>(self.store)
            .fetch_expanded(order.id, &ExpandedOrder::expand())
            .await?;
        let order = ExpandedOrder::from_record(&raw)?;

        tracing::info!(
            order_id = %order.record.id,
            frames = frame_items.len(),
            paperweight = paperweight_item.is_some(),
            "order aggregate created"
        );

        Ok(PipelineOutcome::Created(Box::new(CreatedOrder {
            customer,
            order,
            frame_items,
            paperweight_item,
        })))
    }
}

fn rejected(message: &str) -> PipelineOutcome {
    PipelineOutcome::Rejected {
        message: message.to_string(),
    }
}

impl PipelineOutcome {
    /// Collapse to the section-outcome shape the wizard surfaces.
    pub fn to_submit_outcome(&self) -> SubmitOutcome {
        match self {
            PipelineOutcome::Created(_) => SubmitOutcome::ok(),
            PipelineOutcome::Rejected { message } => SubmitOutcome::fail(message.clone()),
        }
    }
}

/// Side-effect ledger for one pipeline or synchronizer run.
///
/// Records created ids as they happen; `compensate` deletes them in reverse
/// order. A failed compensation is logged and skipped so the remaining
/// deletes still run and the primary error is never masked.
pub(crate) struct EffectLedger<'a> {
    store: &'a dyn DocumentStore,
    created: Vec<(&'static str, RecordId)>,
}

impl<'a> EffectLedger<'a> {
    pub(crate) fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            created: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, collection: &'static str, id: RecordId) {
        self.created.push((collection, id));
    }

    pub(crate) async fn compensate(&mut self) {
        for (collection, id) in self.created.drain(..).rev() {
            match self.store.delete(collection, id).await {
                Ok(()) => {
                    tracing::warn!(%id, collection, "compensated orphaned record");
                }
                Err(err) => {
                    tracing::error!(%id, collection, %err, "compensation delete failed");
                }
            }
        }
    }
}
