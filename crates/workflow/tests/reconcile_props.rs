//! Property: whatever the shapes of the existing and submitted bouquet
//! lists, reconciliation leaves the header's frame-id list equal to the set
//! of surviving frame records, with every listed id resolving.

mod common;

use common::*;

use proptest::prelude::*;

use bloomframe_orders::{FrameItemId, FrameItems, OrderFields, OrderId, Orders};
use bloomframe_store::{Collection, DocumentStore, Expand, ListQuery};
use bloomframe_workflow::ReconciliationEngine;

async fn check_shapes(existing: usize, submitted: usize) {
    let store = store();

    // Seed with a paperweight so an order with zero bouquets is valid.
    let bouquets = (0..existing).map(|i| bouquet(10.0 * (i + 1) as f64, 0.0)).collect();
    let created = seed(&store, &form(bouquets, paperweight(1, 30.0))).await;
    let order_id = OrderId::new(created.order.record.id);
    let snapshot = load_snapshot(&store, order_id).await;

    let seeded_keys: Vec<Option<FrameItemId>> = snapshot
        .bouquets
        .iter()
        .map(|b| b.frame_item_id)
        .collect();

    // Reuse the first min(existing, submitted) rows (they carry their keys),
    // then append keyless new rows.
    let mut rows = Vec::with_capacity(submitted);
    for i in 0..submitted {
        match snapshot.bouquets.get(i) {
            Some(row) => rows.push(row.clone()),
            None => rows.push(bouquet(5.0, 0.0)),
        }
    }

    let result = ReconciliationEngine::new(&store)
        .sync_bouquet_section(&snapshot, &rows)
        .await
        .expect("sync runs");

    if existing == 0 && submitted == 0 {
        assert!(!result.is_accepted());
        return;
    }
    assert!(result.is_accepted());

    let header = store
        .get_one(Orders::NAME, order_id.record_id(), &Expand::none())
        .await
        .expect("header loads")
        .fields_as::<OrderFields>()
        .expect("header parses");
    let surviving = store
        .get_full_list(FrameItems::NAME, &ListQuery::new())
        .await
        .expect("list frames");

    // List length equals the number of surviving records...
    assert_eq!(header.frame_item_ids.len(), submitted);
    assert_eq!(surviving.len(), submitted);

    // ...every listed id resolves...
    for id in &header.frame_item_ids {
        store
            .get_one(FrameItems::NAME, id.record_id(), &Expand::none())
            .await
            .expect("listed id resolves");
    }

    // ...and kept slots preserved their identity.
    for i in 0..existing.min(submitted) {
        assert_eq!(Some(header.frame_item_ids[i]), seeded_keys[i]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn header_list_matches_surviving_records(existing in 0usize..4, submitted in 0usize..4) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        rt.block_on(check_shapes(existing, submitted));
    }
}
