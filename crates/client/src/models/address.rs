//! Shipping address model.

use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Delivery address collected at checkout.
///
/// Also the shape mirrored under the checkout address key and posted inside
/// the order request, so field names follow the backend's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub recipient_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl ShippingAddress {
    /// Pre-fill from the profile's stored address block.
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            recipient_name: profile.name.clone(),
            email: profile.email.as_str().to_string(),
            phone: field(&profile.phone),
            street: field(&profile.address),
            number: field(&profile.house_number),
            complement: field(&profile.complement),
            neighborhood: field(&profile.neighborhood),
            city: field(&profile.city),
            state: field(&profile.state),
            zip_code: field(&profile.zip_code),
        }
    }
}
