//! `bloomframe-orders` — typed collections and the aggregate read model.
//!
//! One order aggregates a customer, an order header, an ordered list of frame
//! line items and an optional paperweight line item. This crate owns the
//! record/enum definitions, the payload mappers from intake-form values, the
//! expanded read view, the normalizer between store graphs and display models,
//! and the display-model cache. It never mutates child records — that is the
//! workflow crate's job.

pub mod cache;
pub mod customer;
pub mod display;
pub mod forms;
pub mod frame;
pub mod order;
pub mod paperweight;
pub mod query;
pub mod view;

pub use cache::AggregateCache;
pub use customer::{CustomerFields, CustomerId, CustomerPatch, CustomerTitle, Customers, ReferralSource};
pub use display::{
    denormalize, normalize, CustomerDisplay, FrameDisplay, OrderDisplay, OrderSummary,
    PaperweightDisplay,
};
pub use forms::{
    BouquetForm, CustomerSectionForm, OrderForm, PaperweightSectionForm, WizardSnapshot,
};
pub use frame::{
    FrameCompletionPatch, FrameExtras, FrameItemFields, FrameItemId, FrameItems, FrameType,
    GlassType, Inclusions, Layout, PreservationType,
};
pub use order::{
    Address, OrderFields, OrderId, OrderMetaPatch, OrderRelationsPatch, OrderStatus,
    OrderStatusPatch, Orders, PaymentStatus,
};
pub use paperweight::{
    PaperweightFields, PaperweightItemId, PaperweightItems, PaperweightPatch,
    PaperweightReceivedPatch,
};
pub use query::{get_customer_by_order_id, list_customers, CustomerQuery};
pub use view::{ExpandedOrder, OrderAggregate};

use bloomframe_store::{Collection as _, InMemoryStore, RelationDef};

/// The relation schema of this aggregate, for wiring an [`InMemoryStore`].
pub const RELATIONS: [RelationDef; 3] = [
    RelationDef {
        collection: Customers::NAME,
        field: "order_id",
        target: Orders::NAME,
    },
    RelationDef {
        collection: Orders::NAME,
        field: "frame_item_ids",
        target: FrameItems::NAME,
    },
    RelationDef {
        collection: Orders::NAME,
        field: "paperweight_item_id",
        target: PaperweightItems::NAME,
    },
];

/// An [`InMemoryStore`] pre-wired with the aggregate's relations.
pub fn in_memory_store() -> InMemoryStore {
    RELATIONS.iter().fold(InMemoryStore::new(), |store, r| {
        store.with_relation(r.collection, r.field, r.target)
    })
}
