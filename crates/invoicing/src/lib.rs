//! `bloomframe-invoicing` — derive priced line items and totals from the
//! display model.
//!
//! Read-only over the aggregate: the assembler consumes what the normalizer
//! produced and hands a payload to the external HTML-rendering and email
//! endpoints. Nothing here writes to the store.

pub mod line_items;
pub mod payload;
pub mod totals;

pub use line_items::{build_line_items, LineItem, LineItemKind};
pub use payload::{build_invoice_payload, EmailContext, InvoicePayload};
pub use totals::{build_totals, format_amount, OrderExtras, Totals, VAT_RATE};
