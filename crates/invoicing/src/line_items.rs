//! Line item derivation.

use serde::{Deserialize, Serialize};

use bloomframe_orders::{FrameDisplay, Inclusions, PaperweightDisplay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Frame,
    Paperweight,
    Extra,
}

/// One priced invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub description: String,
    pub qty: u32,
    pub unit_price: f64,
    pub total: f64,
    pub kind: LineItemKind,
}

/// Expand frames and the optional paperweight into invoice lines.
///
/// Each frame yields one base line at its stored price plus up to three extra
/// lines — mount, glass, engraving — each included only when its price in the
/// extras bag is a positive number.
pub fn build_line_items(
    frames: &[FrameDisplay],
    paperweight: Option<&PaperweightDisplay>,
) -> Vec<LineItem> {
    let mut items = Vec::new();

    for frame in frames {
        let base_id = frame.frame_item_id.to_string();

        let description = [
            frame.size_label.clone(),
            Some(catalogue_label(&frame.frame_type)),
            frame.glass_type.as_ref().map(catalogue_label),
            Some(catalogue_label(&frame.preservation_type)),
            frame.mount_colour.as_ref().map(|c| format!("Mount: {c}")),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        items.push(LineItem {
            id: base_id.clone(),
            description,
            qty: 1,
            unit_price: frame.price,
            total: frame.price,
            kind: LineItemKind::Frame,
        });

        let Some(extras) = frame.extras else {
            continue;
        };

        if let Some(mount_price) = positive(extras.mount_price) {
            let colour = frame.mount_colour.as_deref();
            let suffix = match frame.inclusions {
                Some(Inclusions::Buttonhole) => " - Buttonhole",
                _ => "",
            };
            let description = match colour {
                Some(colour) => format!("Mount - {colour}{suffix}"),
                None => format!("Mount{suffix}"),
            };
            items.push(extra_line(&base_id, "mount", description, mount_price));
        }

        if let Some(glass_price) = positive(extras.glass_price) {
            let description = match frame.glass_type.as_ref() {
                Some(glass) => format!("Glass - {}", catalogue_label(glass)),
                None => "Glass".to_string(),
            };
            items.push(extra_line(&base_id, "glass", description, glass_price));
        }

        if let Some(engraving_price) = positive(extras.glass_engraving_price) {
            let text = frame
                .glass_engraving
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty());
            let description = match text {
                Some(text) => format!("Glass engraving - {text}"),
                None => "Glass engraving".to_string(),
            };
            items.push(extra_line(
                &base_id,
                "glass-engraving",
                description,
                engraving_price,
            ));
        }
    }

    if let Some(pw) = paperweight {
        let qty = pw.quantity;
        // Stored price is the total; derive the unit price, dodging a zero
        // quantity.
        let unit_price = if qty > 0 { pw.price / qty as f64 } else { pw.price };
        items.push(LineItem {
            id: pw.paperweight_item_id.to_string(),
            description: "Paperweight".to_string(),
            qty,
            unit_price,
            total: pw.price,
            kind: LineItemKind::Paperweight,
        });
    }

    items
}

fn extra_line(base_id: &str, suffix: &str, description: String, price: f64) -> LineItem {
    LineItem {
        id: format!("{base_id}-{suffix}"),
        description,
        qty: 1,
        unit_price: price,
        total: price,
        kind: LineItemKind::Extra,
    }
}

fn positive(price: Option<f64>) -> Option<f64> {
    price.filter(|p| *p > 0.0)
}

/// The catalogue enums' wire labels double as display labels.
fn catalogue_label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloomframe_core::RecordId;
    use bloomframe_orders::{
        FrameExtras, FrameItemId, FrameType, GlassType, Layout, PaperweightItemId,
        PreservationType,
    };

    fn frame(extras: Option<FrameExtras>) -> FrameDisplay {
        FrameDisplay {
            frame_item_id: FrameItemId::new(RecordId::new()),
            size_label: Some("20x28 inches".into()),
            size_x: Some(20.0),
            size_y: Some(28.0),
            price: 120.0,
            layout: Layout::Meadow,
            frame_type: FrameType::Oak,
            mount_colour: Some("Ivory".into()),
            glass_type: Some(GlassType::Conservation),
            glass_engraving: Some("In memory".into()),
            inclusions: Some(Inclusions::Buttonhole),
            preservation_type: PreservationType::ThreeD,
            preservation_date: None,
            artist_hours: None,
            special_notes: None,
            artwork_complete: false,
            framing_complete: false,
            extras,
        }
    }

    #[test]
    fn base_line_joins_descriptive_parts() {
        let items = build_line_items(&[frame(None)], None);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].description,
            "20x28 inches, Oak, Conservation glass, 3D, Mount: Ivory"
        );
        assert_eq!(items[0].total, 120.0);
        assert_eq!(items[0].kind, LineItemKind::Frame);
    }

    #[test]
    fn extra_lines_appear_only_for_positive_prices() {
        let extras = FrameExtras {
            mount_price: Some(20.0),
            glass_price: Some(0.0),
            glass_engraving_price: Some(15.0),
            ..FrameExtras::default()
        };
        let items = build_line_items(&[frame(Some(extras))], None);

        let descriptions: Vec<_> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(descriptions[1], "Mount - Ivory - Buttonhole");
        assert_eq!(descriptions[2], "Glass engraving - In memory");
        assert!(items.iter().all(|i| i.total > 0.0));
    }

    #[test]
    fn paperweight_unit_price_divides_total_by_quantity() {
        let pw = PaperweightDisplay {
            paperweight_item_id: PaperweightItemId::new(RecordId::new()),
            quantity: 4,
            price: 60.0,
            received: false,
        };
        let items = build_line_items(&[], Some(&pw));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].qty, 4);
        assert_eq!(items[0].unit_price, 15.0);
        assert_eq!(items[0].total, 60.0);
    }

    #[test]
    fn zero_quantity_paperweight_falls_back_to_total() {
        let pw = PaperweightDisplay {
            paperweight_item_id: PaperweightItemId::new(RecordId::new()),
            quantity: 0,
            price: 30.0,
            received: false,
        };
        let items = build_line_items(&[], Some(&pw));
        assert_eq!(items[0].unit_price, 30.0);
    }
}
