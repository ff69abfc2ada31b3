//! Order header records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloomframe_core::impl_record_id_newtype;
use bloomframe_store::Collection;

use crate::frame::FrameItemId;
use crate::paperweight::PaperweightItemId;

impl_record_id_newtype!(OrderId);

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    InProgress,
    Ready,
    Delivered,
    Cancelled,
}

/// Deposit/balance collection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    WaitingFirstDeposit,
    FirstDepositPaid,
    WaitingSecondDeposit,
    SecondDepositPaid,
    WaitingFinalBalance,
    FinalBalancePaid,
}

/// One postal address block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line2: Option<String>,
    pub town: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub county: Option<String>,
    pub postcode: String,
}

/// Stored fields of an `orders` record.
///
/// `frame_item_ids` is ordered and must list exactly the frame records still
/// part of the order; `paperweight_item_id` is absent or points at exactly one
/// paperweight record. Only the creation pipeline and the reconciliation
/// engine rewrite those two fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFields {
    pub order_no: u32,
    pub occasion_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    pub billing: Address,
    pub delivery_same_as_billing: bool,
    pub delivery: Address,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub frame_item_ids: Vec<FrameItemId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub paperweight_item_id: Option<PaperweightItemId>,
}

/// Patch for the header fields editable from the customer section.
#[derive(Debug, Clone, Serialize)]
pub struct OrderMetaPatch {
    pub order_no: u32,
    pub occasion_date: NaiveDate,
    pub billing: Address,
    pub delivery_same_as_billing: bool,
    pub delivery: Address,
}

/// Patch for the status pair edited from the order detail view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderStatusPatch {
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
}

/// Patch rewriting the header's relation fields.
///
/// Outer `None` leaves a relation untouched; `Some(None)` clears the
/// paperweight reference. Always submit this with an exact revision guard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderRelationsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_item_ids: Option<Vec<FrameItemId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paperweight_item_id: Option<Option<PaperweightItemId>>,
}

/// `orders` collection marker.
#[derive(Debug, Clone, Copy)]
pub struct Orders;

impl Collection for Orders {
    const NAME: &'static str = "orders";
    type Fields = OrderFields;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloomframe_core::RecordId;
    use serde_json::json;

    #[test]
    fn status_enums_use_snake_case_wire_values() {
        assert_eq!(serde_json::to_value(OrderStatus::InProgress).unwrap(), json!("in_progress"));
        assert_eq!(
            serde_json::to_value(PaymentStatus::WaitingFirstDeposit).unwrap(),
            json!("waiting_first_deposit")
        );
    }

    #[test]
    fn relations_patch_distinguishes_clear_from_untouched() {
        let untouched = serde_json::to_value(OrderRelationsPatch::default()).unwrap();
        assert_eq!(untouched, json!({}));

        let cleared = serde_json::to_value(OrderRelationsPatch {
            frame_item_ids: None,
            paperweight_item_id: Some(None),
        })
        .unwrap();
        assert_eq!(cleared, json!({ "paperweight_item_id": null }));

        let id = PaperweightItemId::new(RecordId::new());
        let set = serde_json::to_value(OrderRelationsPatch {
            frame_item_ids: None,
            paperweight_item_id: Some(Some(id)),
        })
        .unwrap();
        assert_eq!(set, json!({ "paperweight_item_id": id.to_string() }));
    }
}
