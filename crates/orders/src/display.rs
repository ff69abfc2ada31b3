//! Flattening between the expanded store graph and the display model, and
//! back into wizard form defaults.
//!
//! Read-only: nothing in here touches the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloomframe_core::Revision;

use crate::customer::{CustomerId, CustomerTitle, ReferralSource};
use crate::forms::{BouquetForm, CustomerSectionForm, PaperweightSectionForm, WizardSnapshot};
use crate::frame::{
    FrameExtras, FrameItemId, FrameType, GlassType, Inclusions, Layout, PreservationType,
};
use crate::order::{Address, OrderId, OrderStatus, PaymentStatus};
use crate::paperweight::PaperweightItemId;
use crate::view::OrderAggregate;

/// Flattened customer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDisplay {
    pub customer_id: CustomerId,
    pub display_name: String,
    pub title: Option<CustomerTitle>,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub telephone: String,
    pub how_recommended: Option<ReferralSource>,
}

/// Flattened order header fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    /// Header revision at read time; edit snapshots carry it into guards.
    pub revision: Revision,
    pub order_no: u32,
    pub occasion_date: NaiveDate,
    pub notes: String,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub billing: Address,
    pub delivery_same_as_billing: bool,
    pub delivery: Address,
}

/// One frame line as the list/detail views render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDisplay {
    pub frame_item_id: FrameItemId,
    /// `"{width}x{height} inches"`, preferring the recommended size.
    pub size_label: Option<String>,
    pub size_x: Option<f64>,
    pub size_y: Option<f64>,
    pub price: f64,
    pub layout: Layout,
    pub frame_type: FrameType,
    pub mount_colour: Option<String>,
    pub glass_type: Option<GlassType>,
    pub glass_engraving: Option<String>,
    pub inclusions: Option<Inclusions>,
    pub preservation_type: PreservationType,
    pub preservation_date: Option<NaiveDate>,
    pub artist_hours: Option<f64>,
    pub special_notes: Option<String>,
    pub artwork_complete: bool,
    pub framing_complete: bool,
    /// Raw intake inputs, carried through for invoices and re-editing.
    pub extras: Option<FrameExtras>,
}

/// The paperweight line as the views render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperweightDisplay {
    pub paperweight_item_id: PaperweightItemId,
    pub quantity: u32,
    pub price: f64,
    pub received: bool,
}

/// The flat model both the views and the invoice assembler consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDisplay {
    pub customer: CustomerDisplay,
    pub order: Option<OrderSummary>,
    /// In header list order; empty when no frames were expanded.
    pub frames: Vec<FrameDisplay>,
    pub paperweight: Option<PaperweightDisplay>,
}

/// Flatten an expanded aggregate into the display model.
///
/// Missing expansions yield an empty frame list / no paperweight, never an
/// error.
pub fn normalize(aggregate: &OrderAggregate) -> OrderDisplay {
    let customer = CustomerDisplay {
        customer_id: CustomerId::new(aggregate.customer.id),
        display_name: aggregate.customer.fields.display_name(),
        title: aggregate.customer.fields.title,
        first_name: aggregate.customer.fields.first_name.clone(),
        surname: aggregate.customer.fields.surname.clone(),
        email: aggregate.customer.fields.email.clone(),
        telephone: aggregate.customer.fields.telephone.clone(),
        how_recommended: aggregate.customer.fields.how_recommended,
    };

    let order = aggregate.order.as_ref().map(|expanded| OrderSummary {
        order_id: OrderId::new(expanded.record.id),
        revision: expanded.record.revision,
        order_no: expanded.record.fields.order_no,
        occasion_date: expanded.record.fields.occasion_date,
        notes: expanded.record.fields.notes.clone(),
        order_status: expanded.record.fields.order_status,
        payment_status: expanded.record.fields.payment_status,
        billing: expanded.record.fields.billing.clone(),
        delivery_same_as_billing: expanded.record.fields.delivery_same_as_billing,
        delivery: expanded.record.fields.delivery.clone(),
    });

    let frames = aggregate
        .order
        .as_ref()
        .map(|expanded| {
            expanded
                .frames
                .iter()
                .map(|frame| FrameDisplay {
                    frame_item_id: FrameItemId::new(frame.id),
                    size_label: size_label(
                        frame.fields.extras.as_ref(),
                        frame.fields.size_x,
                        frame.fields.size_y,
                    ),
                    size_x: frame.fields.size_x,
                    size_y: frame.fields.size_y,
                    price: frame.fields.price,
                    layout: frame.fields.layout,
                    frame_type: frame.fields.frame_type,
                    mount_colour: frame.fields.mount_colour.clone(),
                    glass_type: frame.fields.glass_type,
                    glass_engraving: frame.fields.glass_engraving.clone(),
                    inclusions: frame.fields.inclusions,
                    preservation_type: frame.fields.preservation_type,
                    preservation_date: frame.fields.preservation_date,
                    artist_hours: frame.fields.artist_hours,
                    special_notes: frame.fields.special_notes.clone(),
                    artwork_complete: frame.fields.artwork_complete,
                    framing_complete: frame.fields.framing_complete,
                    extras: frame.fields.extras,
                })
                .collect()
        })
        .unwrap_or_default();

    let paperweight = aggregate
        .order
        .as_ref()
        .and_then(|expanded| expanded.paperweight.as_ref())
        .map(|pw| PaperweightDisplay {
            paperweight_item_id: PaperweightItemId::new(pw.id),
            quantity: pw.fields.quantity,
            price: pw.fields.price,
            received: pw.fields.received,
        });

    OrderDisplay {
        customer,
        order,
        frames,
        paperweight,
    }
}

/// Rebuild wizard form defaults from a display model, so an existing order can
/// be reopened mid-aggregate without losing fields the views never render.
pub fn denormalize(display: &OrderDisplay) -> WizardSnapshot {
    let customer = CustomerSectionForm {
        title: display.customer.title,
        first_name: display.customer.first_name.clone(),
        surname: display.customer.surname.clone(),
        email: display.customer.email.clone(),
        telephone: display.customer.telephone.clone(),
        how_recommended: display.customer.how_recommended,
        order_no: display.order.as_ref().map(|o| o.order_no).unwrap_or_default(),
        occasion_date: display.order.as_ref().map(|o| o.occasion_date),
        billing: display
            .order
            .as_ref()
            .map(|o| o.billing.clone())
            .unwrap_or_default(),
        delivery_same_as_billing: display
            .order
            .as_ref()
            .map(|o| o.delivery_same_as_billing)
            .unwrap_or_default(),
        delivery: display.order.as_ref().map(|o| o.delivery.clone()),
    };

    let bouquets = display.frames.iter().map(bouquet_defaults).collect();

    let paperweight = PaperweightSectionForm {
        quantity: display.paperweight.as_ref().map(|pw| pw.quantity),
        price: display.paperweight.as_ref().map(|pw| pw.price),
        received: display.paperweight.as_ref().map(|pw| pw.received),
    };

    WizardSnapshot {
        customer_id: display.customer.customer_id,
        order_id: display.order.as_ref().map(|o| o.order_id),
        order_revision: display.order.as_ref().map(|o| o.revision),
        paperweight_item_id: display
            .paperweight
            .as_ref()
            .map(|pw| pw.paperweight_item_id),
        has_paperweight: display.paperweight.is_some(),
        customer,
        bouquets,
        paperweight,
    }
}

/// Resynthesize one bouquet row from a frame display record.
///
/// The raw inputs come back out of the extras bag; a record written before
/// the bag existed falls back to its stored size as the measured size.
fn bouquet_defaults(frame: &FrameDisplay) -> BouquetForm {
    let extras = frame.extras.unwrap_or_default();
    let has_extras = frame.extras.is_some();

    BouquetForm {
        frame_item_id: Some(frame.frame_item_id),
        measured_width_in: if has_extras {
            extras.measured_width_in
        } else {
            frame.size_x
        },
        measured_height_in: if has_extras {
            extras.measured_height_in
        } else {
            frame.size_y
        },
        layout: Some(frame.layout),
        recommended_width_in: extras.recommended_width_in,
        recommended_height_in: extras.recommended_height_in,
        preservation_type: Some(frame.preservation_type),
        preservation_date: frame.preservation_date,
        frame_type: Some(frame.frame_type),
        frame_price: extras.frame_price,
        mount_colour: frame.mount_colour.clone(),
        mount_price: extras.mount_price,
        glass_type: frame.glass_type,
        glass_price: extras.glass_price,
        glass_engraving: frame.glass_engraving.clone(),
        glass_engraving_price: extras.glass_engraving_price,
        inclusions: frame.inclusions,
        artwork_complete: frame.artwork_complete,
        framing_complete: frame.framing_complete,
    }
}

fn size_label(extras: Option<&FrameExtras>, size_x: Option<f64>, size_y: Option<f64>) -> Option<String> {
    let (w, h) = match extras {
        Some(e) if e.recommended_width_in.is_some() && e.recommended_height_in.is_some() => {
            (e.recommended_width_in?, e.recommended_height_in?)
        }
        Some(e) if e.measured_width_in.is_some() && e.measured_height_in.is_some() => {
            (e.measured_width_in?, e.measured_height_in?)
        }
        _ => (size_x?, size_y?),
    };
    Some(format!("{}x{} inches", fmt_dim(w), fmt_dim(h)))
}

/// Whole inches print without a decimal point; halves and the like keep it.
fn fmt_dim(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameExtras;

    fn extras(recommended: Option<(f64, f64)>, measured: Option<(f64, f64)>) -> FrameExtras {
        FrameExtras {
            measured_width_in: measured.map(|(w, _)| w),
            measured_height_in: measured.map(|(_, h)| h),
            recommended_width_in: recommended.map(|(w, _)| w),
            recommended_height_in: recommended.map(|(_, h)| h),
            frame_price: Some(100.0),
            mount_price: Some(20.0),
            glass_price: None,
            glass_engraving_price: None,
        }
    }

    #[test]
    fn size_label_prefers_recommended_over_measured() {
        let label = size_label(
            Some(&extras(Some((20.0, 28.0)), Some((18.0, 24.0)))),
            Some(20.0),
            Some(28.0),
        );
        assert_eq!(label.as_deref(), Some("20x28 inches"));
    }

    #[test]
    fn size_label_falls_back_to_measured_then_stored() {
        let measured = size_label(
            Some(&extras(None, Some((18.5, 24.0)))),
            Some(18.5),
            Some(24.0),
        );
        assert_eq!(measured.as_deref(), Some("18.5x24 inches"));

        let stored = size_label(None, Some(16.0), Some(20.0));
        assert_eq!(stored.as_deref(), Some("16x20 inches"));

        assert_eq!(size_label(None, None, None), None);
    }
}
