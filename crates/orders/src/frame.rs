//! Frame ("bouquet") line item records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloomframe_core::impl_record_id_newtype;
use bloomframe_store::Collection;

impl_record_id_newtype!(FrameItemId);

/// Bouquet arrangement within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    #[serde(rename = "Hand tied birds eye")]
    HandTiedBirdsEye,
    #[serde(rename = "Hand tied side profile")]
    HandTiedSideProfile,
    #[serde(rename = "Hand tied side profile diagonal")]
    HandTiedSideProfileDiagonal,
    #[serde(rename = "Straight on shower or teardrop")]
    StraightOnShowerOrTeardrop,
    Meadow,
}

/// Frame moulding finish, as listed in the workshop catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    Black,
    #[serde(rename = "Dark wood gold line")]
    DarkWoodGoldLine,
    Oak,
    Beech,
    #[serde(rename = "Cottage pine")]
    CottagePine,
    Bronze,
    #[serde(rename = "Antique gold")]
    AntiqueGold,
    #[serde(rename = "Speckled gold")]
    SpeckledGold,
    #[serde(rename = "Antique silver")]
    AntiqueSilver,
    #[serde(rename = "Speckled silver")]
    SpeckledSilver,
    #[serde(rename = "New modern silver")]
    NewModernSilver,
    #[serde(rename = "Distressed white")]
    DistressedWhite,
    #[serde(rename = "Modern white")]
    ModernWhite,
    #[serde(rename = "Distressed white wide")]
    DistressedWhiteWide,
    Pewter,
    #[serde(rename = "New pewter gunmetal")]
    NewPewterGunmetal,
    #[serde(rename = "Flat white")]
    FlatWhite,
    #[serde(rename = "Brushed silver")]
    BrushedSilver,
    #[serde(rename = "Stone gold")]
    StoneGold,
    #[serde(rename = "Stone silver")]
    StoneSilver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlassType {
    #[serde(rename = "Clearview uv glass")]
    ClearviewUv,
    #[serde(rename = "Conservation glass")]
    Conservation,
}

/// Whether extra flowers/buttonhole are included in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inclusions {
    Yes,
    No,
    Buttonhole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreservationType {
    #[serde(rename = "3D")]
    ThreeD,
    #[serde(rename = "pressed")]
    Pressed,
}

/// Opaque bag of raw intake inputs, preserved verbatim on the record so the
/// wizard can be reopened and the invoice recomputed without data loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameExtras {
    pub measured_width_in: Option<f64>,
    pub measured_height_in: Option<f64>,
    pub recommended_width_in: Option<f64>,
    pub recommended_height_in: Option<f64>,
    pub frame_price: Option<f64>,
    pub mount_price: Option<f64>,
    pub glass_price: Option<f64>,
    pub glass_engraving_price: Option<f64>,
}

/// Stored fields of an `order_frame_items` record.
///
/// `price` is the frame price plus the mount price (absent inputs count as
/// zero). `size_x`/`size_y` hold the recommended size when one was given,
/// otherwise the measured size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameItemFields {
    pub price: f64,
    pub layout: Layout,
    pub frame_type: FrameType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mount_colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub glass_type: Option<GlassType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub glass_engraving: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inclusions: Option<Inclusions>,
    pub preservation_type: PreservationType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preservation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub artist_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub special_notes: Option<String>,
    #[serde(default)]
    pub artwork_complete: bool,
    #[serde(default)]
    pub framing_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extras: Option<FrameExtras>,
}

/// Patch for the two completion flags toggled from the order detail view.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FrameCompletionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framing_complete: Option<bool>,
}

/// `order_frame_items` collection marker.
#[derive(Debug, Clone, Copy)]
pub struct FrameItems;

impl Collection for FrameItems {
    const NAME: &'static str = "order_frame_items";
    type Fields = FrameItemFields;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalogue_enums_serialize_to_their_labels() {
        assert_eq!(
            serde_json::to_value(Layout::StraightOnShowerOrTeardrop).unwrap(),
            json!("Straight on shower or teardrop")
        );
        assert_eq!(
            serde_json::to_value(FrameType::NewPewterGunmetal).unwrap(),
            json!("New pewter gunmetal")
        );
        assert_eq!(serde_json::to_value(PreservationType::ThreeD).unwrap(), json!("3D"));
    }

    #[test]
    fn extras_bag_round_trips() {
        let extras = FrameExtras {
            measured_width_in: Some(18.0),
            measured_height_in: Some(24.0),
            recommended_width_in: Some(20.0),
            recommended_height_in: Some(28.0),
            frame_price: Some(100.0),
            mount_price: Some(20.0),
            glass_price: None,
            glass_engraving_price: None,
        };
        let value = serde_json::to_value(extras).unwrap();
        let back: FrameExtras = serde_json::from_value(value).unwrap();
        assert_eq!(back, extras);
    }
}
