//! Read-side queries over the aggregate.

use bloomframe_store::{collection, DocumentStore, Filter, ListQuery, StoreResult};

use crate::customer::Customers;
use crate::display::{normalize, OrderDisplay};
use crate::order::OrderId;
use crate::view::OrderAggregate;

/// Contains-filters for the customer list view. Empty fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    pub occasion_date: String,
    pub email: String,
    pub telephone: String,
    pub surname: String,
}

impl CustomerQuery {
    fn to_filter(&self) -> Filter {
        let mut clauses = Vec::new();
        // The occasion date lives on the related order header.
        if !self.occasion_date.is_empty() {
            clauses.push(Filter::contains("order_id.occasion_date", &self.occasion_date));
        }
        if !self.email.is_empty() {
            clauses.push(Filter::contains("email", &self.email));
        }
        if !self.telephone.is_empty() {
            clauses.push(Filter::contains("telephone", &self.telephone));
        }
        if !self.surname.is_empty() {
            clauses.push(Filter::contains("surname", &self.surname));
        }
        Filter::and(clauses)
    }
}

/// Fetch the customer list with full aggregate expansion, newest order first,
/// normalized for display.
pub async fn list_customers(
    store: &dyn DocumentStore,
    query: &CustomerQuery,
) -> StoreResult<Vec<OrderDisplay>> {
    let records = collection::<Customers>(store)
        .list(
            &ListQuery::new()
                .filter(query.to_filter())
                .expand(OrderAggregate::expand())
                .sort("-order_id.order_no"),
        )
        .await?;

    records
        .iter()
        .map(|record| OrderAggregate::from_record(record).map(|agg| normalize(&agg)))
        .collect()
}

/// Fetch one customer's aggregate by the order it references.
pub async fn get_customer_by_order_id(
    store: &dyn DocumentStore,
    order_id: OrderId,
) -> StoreResult<OrderDisplay> {
    let record = collection::<Customers>(store)
        .first_matching(
            &Filter::eq("order_id", &order_id.to_string()),
            &OrderAggregate::expand(),
        )
        .await?;
    let aggregate = OrderAggregate::from_record(&record)?;
    Ok(normalize(&aggregate))
}
