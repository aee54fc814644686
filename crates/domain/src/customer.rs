use chrono::{DateTime, Utc};
use marquee_core::{AppError, AppResult, SecurityIdentity};
use serde::{Deserialize, Serialize};

/// Customer profile stored in the brand tenant the customer signed in to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Identity id of the customer.
    pub id: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email, if provided.
    pub email: Option<String>,
    /// Phone, if provided.
    pub phone: Option<String>,
}

impl Customer {
    /// Builds a first-login profile from the customer identity.
    pub fn from_identity(identity: &SecurityIdentity) -> AppResult<Self> {
        let (Some(first_name), Some(last_name)) = (identity.first_name(), identity.last_name())
        else {
            return Err(AppError::Validation(format!(
                "identity '{}' carries no customer profile",
                identity.id()
            )));
        };

        Ok(Self {
            id: identity.id().to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: identity.email().map(str::to_owned),
            phone: identity.phone().map(str::to_owned),
        })
    }
}

/// Product a customer bought from a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedProduct {
    /// Purchased product id.
    pub product_id: String,
    /// Purchase timestamp.
    pub date_purchased: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use marquee_core::{IdentityType, SecurityIdentity};

    use super::Customer;

    #[test]
    fn profile_requires_customer_names() {
        let bare = SecurityIdentity::new("c-1", IdentityType::Customer, "Grace Hopper");
        assert!(Customer::from_identity(&bare).is_err());

        let profiled = bare.with_profile("Grace", "Hopper", Some("grace@example.com".to_owned()), None);
        let customer = Customer::from_identity(&profiled);
        assert!(matches!(customer, Ok(customer) if customer.first_name == "Grace"));
    }
}
