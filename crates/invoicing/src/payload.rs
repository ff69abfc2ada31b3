//! Invoice payload for the external rendering and email endpoints.

use serde::{Deserialize, Serialize};

use bloomframe_orders::{CustomerDisplay, OrderDisplay, OrderSummary};

use crate::line_items::{build_line_items, LineItem};
use crate::totals::{build_totals, OrderExtras, Totals};

/// Context block telling the email service what is being sent and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailContext {
    pub email_type: String,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub template_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event_note: Option<String>,
}

/// Everything the HTML renderer and the email sender need, in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub customer: CustomerDisplay,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub order: Option<OrderSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extras: Option<OrderExtras>,
    pub line_items: Vec<LineItem>,
    pub totals: Totals,
    pub context: EmailContext,
}

/// Assemble the payload from a normalized aggregate.
pub fn build_invoice_payload(
    display: &OrderDisplay,
    extras: Option<OrderExtras>,
    context: EmailContext,
) -> InvoicePayload {
    let line_items = build_line_items(&display.frames, display.paperweight.as_ref());
    let totals = build_totals(&line_items, extras.as_ref());

    InvoicePayload {
        customer: display.customer.clone(),
        order: display.order.clone(),
        extras,
        line_items,
        totals,
        context,
    }
}
