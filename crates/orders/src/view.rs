//! Expanded aggregate read view.
//!
//! The aggregate is read customer-first: one `customers` record expanded
//! through its order header down to the frame and paperweight children. The
//! creation pipeline also reads the order-rooted variant when it re-fetches
//! the header it just created.

use bloomframe_store::{Expand, RawRecord, StoreResult, TypedRecord};

use crate::customer::Customers;
use crate::frame::FrameItems;
use crate::order::Orders;
use crate::paperweight::PaperweightItems;

/// An order header with its children inlined.
#[derive(Debug, Clone)]
pub struct ExpandedOrder {
    pub record: TypedRecord<Orders>,
    /// In header list order. Empty when the expansion was absent.
    pub frames: Vec<TypedRecord<FrameItems>>,
    pub paperweight: Option<TypedRecord<PaperweightItems>>,
}

impl ExpandedOrder {
    /// Expansion paths for an order-rooted read.
    pub fn expand() -> Expand {
        Expand::paths(["frame_item_ids", "paperweight_item_id"])
    }

    /// Parse an `orders` record carrying its child expansions.
    ///
    /// Absent expansions yield an empty list / `None`, never an error.
    pub fn from_record(raw: &RawRecord) -> StoreResult<Self> {
        let record = TypedRecord::<Orders>::from_raw(raw)?;
        let frames = raw
            .expand_many("frame_item_ids")
            .iter()
            .map(TypedRecord::<FrameItems>::from_raw)
            .collect::<StoreResult<Vec<_>>>()?;
        let paperweight = raw
            .expand_one("paperweight_item_id")
            .map(TypedRecord::<PaperweightItems>::from_raw)
            .transpose()?;
        Ok(Self {
            record,
            frames,
            paperweight,
        })
    }
}

/// The full consistency unit: customer joined to header joined to children.
#[derive(Debug, Clone)]
pub struct OrderAggregate {
    pub customer: TypedRecord<Customers>,
    /// `None` when the customer's order expansion was absent.
    pub order: Option<ExpandedOrder>,
}

impl OrderAggregate {
    /// Expansion paths for a customer-rooted read.
    pub fn expand() -> Expand {
        Expand::paths([
            "order_id",
            "order_id.frame_item_ids",
            "order_id.paperweight_item_id",
        ])
    }

    /// Parse a `customers` record carrying the full aggregate expansion.
    pub fn from_record(raw: &RawRecord) -> StoreResult<Self> {
        let customer = TypedRecord::<Customers>::from_raw(raw)?;
        let order = raw
            .expand_one("order_id")
            .map(ExpandedOrder::from_record)
            .transpose()?;
        Ok(Self { customer, order })
    }
}
