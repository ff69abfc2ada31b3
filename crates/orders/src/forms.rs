//! Intake-form values and their mapping onto store payloads.
//!
//! The wizard UI submits these; the creation pipeline and the reconciliation
//! engine consume them. Everything here is pure mapping — no IO.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloomframe_core::{DomainError, DomainResult, Revision};

use crate::customer::{CustomerId, CustomerTitle, ReferralSource};
use crate::frame::{
    FrameExtras, FrameItemFields, FrameItemId, FrameType, GlassType, Inclusions, Layout,
    PreservationType,
};
use crate::order::{Address, OrderId};
use crate::paperweight::PaperweightItemId;

/// One bouquet row of the intake form.
///
/// `frame_item_id` is the stable identity key: rows loaded from an existing
/// order carry the id of the record they came from, newly added rows carry
/// none. The reconciliation engine diffs on this key, never on row position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BouquetForm {
    pub frame_item_id: Option<FrameItemId>,
    pub measured_width_in: Option<f64>,
    pub measured_height_in: Option<f64>,
    pub layout: Option<Layout>,
    pub recommended_width_in: Option<f64>,
    pub recommended_height_in: Option<f64>,
    pub preservation_type: Option<PreservationType>,
    pub preservation_date: Option<NaiveDate>,
    pub frame_type: Option<FrameType>,
    pub frame_price: Option<f64>,
    pub mount_colour: Option<String>,
    pub mount_price: Option<f64>,
    pub glass_type: Option<GlassType>,
    pub glass_price: Option<f64>,
    pub glass_engraving: Option<String>,
    pub glass_engraving_price: Option<f64>,
    pub inclusions: Option<Inclusions>,
    #[serde(default)]
    pub artwork_complete: bool,
    #[serde(default)]
    pub framing_complete: bool,
}

impl BouquetForm {
    /// Whether the row carries everything a frame record needs.
    pub fn is_complete(&self) -> bool {
        self.measured_width_in.is_some()
            && self.measured_height_in.is_some()
            && self.layout.is_some()
            && self.recommended_width_in.is_some()
            && self.recommended_height_in.is_some()
            && self.preservation_type.is_some()
            && self.frame_type.is_some()
            && self.frame_price.is_some()
            && self.mount_colour.is_some()
            && self.mount_price.is_some()
    }

    /// Map this row onto the stored frame payload.
    ///
    /// Price is frame + mount, absent inputs counting as zero. The stored size
    /// is the recommended size when one was given, else the measured size.
    /// Raw inputs are preserved verbatim in the extras bag.
    pub fn to_frame_payload(&self) -> DomainResult<FrameItemFields> {
        let (size_x, size_y) = match (self.recommended_width_in, self.recommended_height_in) {
            (Some(w), Some(h)) => (Some(w), Some(h)),
            _ => (self.measured_width_in, self.measured_height_in),
        };

        let layout = self
            .layout
            .ok_or_else(|| DomainError::validation("bouquet row is missing a layout"))?;
        let frame_type = self
            .frame_type
            .ok_or_else(|| DomainError::validation("bouquet row is missing a frame type"))?;
        let preservation_type = self
            .preservation_type
            .ok_or_else(|| DomainError::validation("bouquet row is missing a preservation type"))?;

        Ok(FrameItemFields {
            price: self.frame_price.unwrap_or(0.0) + self.mount_price.unwrap_or(0.0),
            layout,
            frame_type,
            mount_colour: self.mount_colour.clone(),
            size_x,
            size_y,
            glass_type: self.glass_type,
            glass_engraving: none_if_blank(self.glass_engraving.as_deref()),
            inclusions: self.inclusions,
            preservation_type,
            preservation_date: self.preservation_date,
            artist_hours: None,
            special_notes: None,
            artwork_complete: self.artwork_complete,
            framing_complete: self.framing_complete,
            extras: Some(FrameExtras {
                measured_width_in: self.measured_width_in,
                measured_height_in: self.measured_height_in,
                recommended_width_in: self.recommended_width_in,
                recommended_height_in: self.recommended_height_in,
                frame_price: self.frame_price,
                mount_price: self.mount_price,
                glass_price: self.glass_price,
                glass_engraving_price: self.glass_engraving_price,
            }),
        })
    }
}

fn none_if_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Customer-and-header section of the intake form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerSectionForm {
    pub title: Option<CustomerTitle>,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub telephone: String,
    pub how_recommended: Option<ReferralSource>,
    pub order_no: u32,
    pub occasion_date: Option<NaiveDate>,
    pub billing: Address,
    pub delivery_same_as_billing: bool,
    pub delivery: Option<Address>,
}

impl CustomerSectionForm {
    /// The delivery block to store: mirrors billing when the flag is set.
    pub fn delivery_block(&self) -> Address {
        if self.delivery_same_as_billing {
            self.billing.clone()
        } else {
            self.delivery.clone().unwrap_or_default()
        }
    }
}

/// Paperweight section of the intake form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperweightSectionForm {
    pub quantity: Option<u32>,
    pub price: Option<f64>,
    pub received: Option<bool>,
}

impl PaperweightSectionForm {
    /// A paperweight is wanted iff both quantity and price were entered.
    pub fn has_details(&self) -> bool {
        self.quantity.is_some() && self.price.is_some()
    }

    /// Exactly one of quantity/price entered — a half-filled section.
    pub fn is_partial(&self) -> bool {
        self.quantity.is_some() != self.price.is_some()
    }
}

/// Full intake-form values, as assembled by the creation wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderForm {
    pub customer: CustomerSectionForm,
    pub bouquets: Vec<BouquetForm>,
    pub paperweight: PaperweightSectionForm,
}

/// Edit-mode snapshot: the form defaults rebuilt from a loaded aggregate plus
/// the identity block the reconciliation engine diffs against.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSnapshot {
    pub customer_id: CustomerId,
    pub order_id: Option<OrderId>,
    /// Header revision at load time; relation patches are guarded with it.
    pub order_revision: Option<Revision>,
    pub paperweight_item_id: Option<PaperweightItemId>,
    pub has_paperweight: bool,
    pub customer: CustomerSectionForm,
    /// Each row carries the frame item id it was loaded from.
    pub bouquets: Vec<BouquetForm>,
    pub paperweight: PaperweightSectionForm,
}
