//! User profile model.

use serde::{Deserialize, Serialize};

use caju_core::{Email, UserId, UserRole};

/// Profile of the authenticated user.
///
/// Field names follow the backend's JSON (camelCase). Everything beyond
/// identity is optional: profiles are filled in gradually and the address
/// block pre-fills the checkout form when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl UserProfile {
    /// Whether the profile carries enough address data to pre-fill checkout.
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.address.as_deref().is_some_and(|s| !s.is_empty())
            && self.city.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn minimal_profile_json() -> &'static str {
        r#"{"id":7,"name":"Ana","email":"ana@example.com"}"#
    }

    #[test]
    fn test_optional_fields_default() {
        let profile: UserProfile = serde_json::from_str(minimal_profile_json()).unwrap();
        assert_eq!(profile.id, UserId::new(7));
        assert_eq!(profile.role, UserRole::Customer);
        assert!(profile.store_name.is_none());
        assert!(!profile.has_address());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id":7,"name":"Ana","email":"ana@example.com","storeName":"Loja da Ana","zipCode":"01000-000"}"#,
        )
        .unwrap();
        assert_eq!(profile.store_name.as_deref(), Some("Loja da Ana"));
        assert_eq!(profile.zip_code.as_deref(), Some("01000-000"));
    }

    #[test]
    fn test_has_address() {
        let mut profile: UserProfile = serde_json::from_str(minimal_profile_json()).unwrap();
        assert!(!profile.has_address());

        profile.address = Some("Rua das Laranjeiras".to_string());
        assert!(!profile.has_address());

        profile.city = Some("Fortaleza".to_string());
        assert!(profile.has_address());
    }
}
