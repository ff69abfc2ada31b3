//! The customer list view: expansion, filtering and sort order end to end
//! against the in-memory store.

use chrono::NaiveDate;

use bloomframe_orders::{
    get_customer_by_order_id, in_memory_store, list_customers, Address, CustomerFields,
    CustomerQuery, Customers, FrameItemFields, FrameItemId, FrameItems, FrameType, Layout,
    OrderFields, OrderId, OrderStatus, Orders, PaymentStatus, PreservationType,
};
use bloomframe_store::{collection, DocumentStore};

async fn seed_order(
    store: &dyn DocumentStore,
    order_no: u32,
    surname: &str,
    email: &str,
) -> OrderId {
    let frame = collection::<FrameItems>(store)
        .create(&FrameItemFields {
            price: 120.0,
            layout: Layout::Meadow,
            frame_type: FrameType::Oak,
            mount_colour: Some("Ivory".into()),
            size_x: Some(20.0),
            size_y: Some(28.0),
            glass_type: None,
            glass_engraving: None,
            inclusions: None,
            preservation_type: PreservationType::Pressed,
            preservation_date: None,
            artist_hours: None,
            special_notes: None,
            artwork_complete: false,
            framing_complete: false,
            extras: None,
        })
        .await
        .expect("frame created");

    let order = collection::<Orders>(store)
        .create(&OrderFields {
            order_no,
            occasion_date: NaiveDate::from_ymd_opt(2026, 6, 20).expect("valid date"),
            notes: String::new(),
            billing: Address {
                line1: "1 Garden Lane".into(),
                line2: None,
                town: "York".into(),
                county: None,
                postcode: "YO1 1AA".into(),
            },
            delivery_same_as_billing: true,
            delivery: Address {
                line1: "1 Garden Lane".into(),
                line2: None,
                town: "York".into(),
                county: None,
                postcode: "YO1 1AA".into(),
            },
            order_status: OrderStatus::Draft,
            payment_status: PaymentStatus::WaitingFirstDeposit,
            frame_item_ids: vec![FrameItemId::new(frame.id)],
            paperweight_item_id: None,
        })
        .await
        .expect("order created");
    let order_id = OrderId::new(order.id);

    collection::<Customers>(store)
        .create(&CustomerFields {
            title: None,
            first_name: "Ann".into(),
            surname: surname.into(),
            email: email.into(),
            telephone: "01234 567890".into(),
            how_recommended: None,
            order_id,
        })
        .await
        .expect("customer created");

    order_id
}

#[tokio::test]
async fn list_is_sorted_by_order_number_descending() {
    let store = in_memory_store();
    seed_order(&store, 11, "Early", "early@example.com").await;
    seed_order(&store, 31, "Late", "late@example.com").await;
    seed_order(&store, 21, "Middle", "middle@example.com").await;

    let listed = list_customers(&store, &CustomerQuery::default())
        .await
        .expect("list loads");
    let order_nos: Vec<_> = listed
        .iter()
        .filter_map(|d| d.order.as_ref().map(|o| o.order_no))
        .collect();
    assert_eq!(order_nos, [31, 21, 11]);

    // Children came through the expansion.
    assert_eq!(listed[0].frames.len(), 1);
    assert_eq!(listed[0].frames[0].size_label.as_deref(), Some("20x28 inches"));
}

#[tokio::test]
async fn list_filters_combine_on_customer_and_header_fields() {
    let store = in_memory_store();
    seed_order(&store, 11, "Bloom", "bloom@example.com").await;
    seed_order(&store, 12, "Thorn", "thorn@example.com").await;

    let listed = list_customers(
        &store,
        &CustomerQuery {
            surname: "bloo".into(),
            occasion_date: "2026-06".into(),
            ..CustomerQuery::default()
        },
    )
    .await
    .expect("list loads");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].customer.surname, "Bloom");
}

#[tokio::test]
async fn lookup_by_order_id_returns_the_full_aggregate() {
    let store = in_memory_store();
    let order_id = seed_order(&store, 11, "Bloom", "bloom@example.com").await;

    let display = get_customer_by_order_id(&store, order_id)
        .await
        .expect("aggregate loads");
    assert_eq!(display.order.as_ref().map(|o| o.order_id), Some(order_id));
    assert_eq!(display.customer.display_name, "Ann Bloom");
    assert_eq!(display.frames.len(), 1);
    assert!(display.paperweight.is_none());
}
