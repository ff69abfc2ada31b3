//! Customer records.

use serde::{Deserialize, Serialize};

use bloomframe_core::impl_record_id_newtype;
use bloomframe_store::Collection;

use crate::order::OrderId;

impl_record_id_newtype!(CustomerId);

/// Salutation options offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerTitle {
    Mrs,
    Mr,
    Miss,
}

/// How the customer found the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferralSource {
    Google,
    #[serde(rename = "Friend / Family")]
    FriendOrFamily,
    Florist,
    #[serde(rename = "Wedding planner")]
    WeddingPlanner,
}

/// Stored fields of a `customers` record.
///
/// A customer always references exactly one order header; the header is
/// created first, so the reference is never dangling on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFields {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<CustomerTitle>,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub telephone: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub how_recommended: Option<ReferralSource>,
    pub order_id: OrderId,
}

impl CustomerFields {
    /// Joined display name: title, first name, surname — skipping blanks.
    pub fn display_name(&self) -> String {
        let title = self.title.map(|t| match t {
            CustomerTitle::Mrs => "Mrs",
            CustomerTitle::Mr => "Mr",
            CustomerTitle::Miss => "Miss",
        });
        [title, Some(self.first_name.as_str()), Some(self.surname.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Patch for the customer's editable fields.
///
/// `None` leaves a field untouched; the identity reference to the order is
/// never patched through here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<CustomerTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub how_recommended: Option<ReferralSource>,
}

/// `customers` collection marker.
#[derive(Debug, Clone, Copy)]
pub struct Customers;

impl Collection for Customers {
    const NAME: &'static str = "customers";
    type Fields = CustomerFields;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloomframe_core::RecordId;

    #[test]
    fn display_name_skips_missing_title() {
        let fields = CustomerFields {
            title: None,
            first_name: "Ann".into(),
            surname: "Price".into(),
            email: "ann@example.com".into(),
            telephone: "0123".into(),
            how_recommended: Some(ReferralSource::Florist),
            order_id: OrderId::new(RecordId::new()),
        };
        assert_eq!(fields.display_name(), "Ann Price");
    }

    #[test]
    fn referral_source_uses_form_labels() {
        let json = serde_json::to_value(ReferralSource::FriendOrFamily).unwrap();
        assert_eq!(json, serde_json::json!("Friend / Family"));
    }
}
