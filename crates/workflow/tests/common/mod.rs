//! Shared fixtures for the workflow test suites.

use chrono::NaiveDate;

use bloomframe_orders::{
    denormalize, get_customer_by_order_id, in_memory_store, Address, BouquetForm,
    CustomerSectionForm, FrameType, Layout, OrderForm, OrderId, PaperweightSectionForm,
    PreservationType, WizardSnapshot,
};
use bloomframe_store::{DocumentStore, InMemoryStore};
use bloomframe_workflow::{CreatedOrder, CreationPipeline, PipelineOutcome};

pub fn store() -> InMemoryStore {
    // Idempotent; keeps reconciliation decisions visible under RUST_LOG.
    bloomframe_observability::init();
    in_memory_store()
}

pub fn occasion() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 20).expect("valid date")
}

pub fn customer_section() -> CustomerSectionForm {
    CustomerSectionForm {
        title: None,
        first_name: "Ann".into(),
        surname: "Price".into(),
        email: "ann@example.com".into(),
        telephone: "01234 567890".into(),
        how_recommended: None,
        order_no: 41,
        occasion_date: Some(occasion()),
        billing: Address {
            line1: "1 Garden Lane".into(),
            line2: None,
            town: "York".into(),
            county: None,
            postcode: "YO1 1AA".into(),
        },
        delivery_same_as_billing: true,
        delivery: None,
    }
}

/// A complete bouquet row with the given frame/mount prices.
pub fn bouquet(frame_price: f64, mount_price: f64) -> BouquetForm {
    BouquetForm {
        frame_item_id: None,
        measured_width_in: Some(18.0),
        measured_height_in: Some(24.0),
        layout: Some(Layout::Meadow),
        recommended_width_in: Some(20.0),
        recommended_height_in: Some(28.0),
        preservation_type: Some(PreservationType::ThreeD),
        preservation_date: None,
        frame_type: Some(FrameType::Oak),
        frame_price: Some(frame_price),
        mount_colour: Some("Ivory".into()),
        mount_price: Some(mount_price),
        glass_type: None,
        glass_price: None,
        glass_engraving: None,
        glass_engraving_price: None,
        inclusions: None,
        artwork_complete: false,
        framing_complete: false,
    }
}

pub fn form(bouquets: Vec<BouquetForm>, paperweight: PaperweightSectionForm) -> OrderForm {
    OrderForm {
        customer: customer_section(),
        bouquets,
        paperweight,
    }
}

pub fn paperweight(quantity: u32, price: f64) -> PaperweightSectionForm {
    PaperweightSectionForm {
        quantity: Some(quantity),
        price: Some(price),
        received: None,
    }
}

/// Run the creation pipeline and panic on rejection.
pub async fn seed(store: &dyn DocumentStore, form: &OrderForm) -> CreatedOrder {
    match CreationPipeline::new(store).create(form).await.expect("pipeline run") {
        PipelineOutcome::Created(created) => *created,
        PipelineOutcome::Rejected { message } => panic!("seed rejected: {message}"),
    }
}

/// Load the aggregate fresh from the store and rebuild the edit snapshot.
pub async fn load_snapshot(store: &dyn DocumentStore, order_id: OrderId) -> WizardSnapshot {
    let display = get_customer_by_order_id(store, order_id)
        .await
        .expect("aggregate loads");
    denormalize(&display)
}
