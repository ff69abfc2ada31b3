//! Invoice totals.
//!
//! Totals are computed on unrounded sums; formatting happens only at the
//! display boundary via [`format_amount`].

use serde::{Deserialize, Serialize};

use crate::line_items::LineItem;

/// UK VAT.
pub const VAT_RATE: f64 = 0.20;

/// Non-stored order extras drafted on the detail view and billed alongside
/// the line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderExtras {
    pub replacement_flowers: bool,
    pub replacement_flowers_qty: Option<u32>,
    pub replacement_flowers_price: Option<f64>,
    pub collection_qty: Option<u32>,
    pub collection_price: Option<f64>,
    pub delivery_qty: Option<u32>,
    pub delivery_price: Option<f64>,
    pub return_unused_flowers: bool,
    pub return_unused_flowers_price: Option<f64>,
    pub artist_hours: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl OrderExtras {
    fn total(&self) -> f64 {
        [
            self.replacement_flowers_price,
            self.collection_price,
            self.delivery_price,
            self.return_unused_flowers_price,
        ]
        .into_iter()
        .flatten()
        .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub sub_total: f64,
    pub vat_rate: f64,
    pub vat_total: f64,
    pub grand_total: f64,
}

/// Sum the line items (plus any drafted extras) and apply VAT.
pub fn build_totals(line_items: &[LineItem], extras: Option<&OrderExtras>) -> Totals {
    let sub_total = line_items.iter().map(|item| item.total).sum::<f64>()
        + extras.map(OrderExtras::total).unwrap_or(0.0);
    let vat_total = sub_total * VAT_RATE;
    let grand_total = sub_total + vat_total;

    Totals {
        sub_total,
        vat_rate: VAT_RATE,
        vat_total,
        grand_total,
    }
}

/// Boundary formatting: two decimal places, no currency symbol.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::LineItemKind;

    fn line(total: f64) -> LineItem {
        LineItem {
            id: "line".into(),
            description: "test".into(),
            qty: 1,
            unit_price: total,
            total,
            kind: LineItemKind::Frame,
        }
    }

    #[test]
    fn vat_and_grand_total_follow_the_subtotal() {
        let totals = build_totals(&[line(120.0), line(50.0), line(15.0)], None);
        assert_eq!(totals.sub_total, 185.0);
        assert_eq!(totals.vat_total, 37.0);
        assert_eq!(totals.grand_total, 222.0);
        assert_eq!(totals.vat_rate, 0.20);
    }

    #[test]
    fn drafted_extras_fold_into_the_subtotal() {
        let extras = OrderExtras {
            collection_price: Some(25.0),
            delivery_price: Some(10.0),
            ..OrderExtras::default()
        };
        let totals = build_totals(&[line(100.0)], Some(&extras));
        assert_eq!(totals.sub_total, 135.0);
    }

    #[test]
    fn formatting_is_boundary_only() {
        // An awkward unrounded sum keeps full precision in the struct...
        let totals = build_totals(&[line(0.1), line(0.2)], None);
        assert!((totals.sub_total - 0.3).abs() < 1e-12);
        // ...and rounds only when formatted.
        assert_eq!(format_amount(totals.sub_total), "0.30");
        assert_eq!(format_amount(222.0), "222.00");
    }
}
