//! Small in-place patches from the order detail view.
//!
//! These never touch the header's relation fields, so they run unguarded;
//! each invalidates the cached aggregate on success.

use bloomframe_core::ExpectedRevision;
use bloomframe_orders::{
    AggregateCache, FrameCompletionPatch, FrameItemId, FrameItems, OrderId, Orders,
    OrderStatusPatch, PaperweightItemId, PaperweightItems, PaperweightReceivedPatch,
};
use bloomframe_store::{collection, DocumentStore};

use crate::error::WorkflowResult;

/// Save the order/payment status pair.
pub async fn set_order_statuses(
    store: &dyn DocumentStore,
    cache: &AggregateCache,
    order_id: OrderId,
    patch: OrderStatusPatch,
) -> WorkflowResult<()> {
    collection::<Orders>(store)
        .patch(order_id, &patch, ExpectedRevision::Any)
        .await?;
    cache.invalidate(order_id);
    Ok(())
}

/// Toggle a frame's artwork/framing completion flags.
pub async fn set_frame_completion(
    store: &dyn DocumentStore,
    cache: &AggregateCache,
    order_id: OrderId,
    frame_item_id: FrameItemId,
    patch: FrameCompletionPatch,
) -> WorkflowResult<()> {
    collection::<FrameItems>(store)
        .patch(frame_item_id, &patch, ExpectedRevision::Any)
        .await?;
    cache.invalidate(order_id);
    Ok(())
}

/// Toggle the paperweight's received flag.
pub async fn set_paperweight_received(
    store: &dyn DocumentStore,
    cache: &AggregateCache,
    order_id: OrderId,
    paperweight_item_id: PaperweightItemId,
    received: bool,
) -> WorkflowResult<()> {
    collection::<PaperweightItems>(store)
        .patch(
            paperweight_item_id,
            &PaperweightReceivedPatch { received },
            ExpectedRevision::Any,
        )
        .await?;
    cache.invalidate(order_id);
    Ok(())
}
