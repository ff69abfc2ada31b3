//! Paperweight line item records.

use serde::{Deserialize, Serialize};

use bloomframe_core::impl_record_id_newtype;
use bloomframe_store::Collection;

impl_record_id_newtype!(PaperweightItemId);

/// Stored fields of an `order_paperweight_items` record.
///
/// `price` is the total for the quantity ordered, not a unit price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperweightFields {
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub received: bool,
}

/// Full in-place update of the editable paperweight fields.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaperweightPatch {
    pub quantity: u32,
    pub price: f64,
    pub received: bool,
}

/// Patch for the received flag toggled from the order detail view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaperweightReceivedPatch {
    pub received: bool,
}

/// `order_paperweight_items` collection marker.
#[derive(Debug, Clone, Copy)]
pub struct PaperweightItems;

impl Collection for PaperweightItems {
    const NAME: &'static str = "order_paperweight_items";
    type Fields = PaperweightFields;
}
