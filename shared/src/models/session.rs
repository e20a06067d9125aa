//! Session, user and profile models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display name used when the profile does not carry one
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// The signed-in user as kept in local storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<AgronomicProfile>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            profile: None,
        }
    }
}

/// An authenticated identity: both token and user, never one without the other
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Agronomic fields stored on the user's profile.
///
/// The profile service is loose about types, so values may arrive as numbers
/// or strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgronomicProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrogen: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phosphorus: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Value>,
}

/// `GET /api/profile` response body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Option<AgronomicProfile>,
}

impl ProfileResponse {
    /// The stored user record refreshed with this profile
    pub fn to_user(&self) -> User {
        User {
            name: self
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: self.email.clone().unwrap_or_default(),
            profile: self.profile.clone(),
        }
    }

    pub fn defaults(&self) -> AgronomicDefaults {
        self.profile
            .as_ref()
            .map(AgronomicDefaults::from_profile)
            .unwrap_or_default()
    }
}

/// Pre-fill values for the fertilizer form, as raw form text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgronomicDefaults {
    pub crop_type: Option<String>,
    pub nitrogen: Option<String>,
    pub phosphorous: Option<String>,
    pub potassium: Option<String>,
}

impl AgronomicDefaults {
    pub fn from_profile(profile: &AgronomicProfile) -> Self {
        Self {
            crop_type: profile.crop.as_ref().and_then(form_text),
            nitrogen: profile.nitrogen.as_ref().and_then(form_text),
            phosphorous: profile.phosphorus.as_ref().and_then(form_text),
            potassium: profile.potassium.as_ref().and_then(form_text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.crop_type.is_none()
            && self.nitrogen.is_none()
            && self.phosphorous.is_none()
            && self.potassium.is_none()
    }
}

fn form_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_defaults_accept_numbers_and_strings() {
        let response: ProfileResponse = serde_json::from_value(json!({
            "name": "Asha",
            "email": "asha@farm.in",
            "profile": {"nitrogen": 50, "phosphorus": "30", "potassium": 40.5, "crop": "Wheat"}
        }))
        .unwrap();

        let defaults = response.defaults();
        assert_eq!(defaults.nitrogen.as_deref(), Some("50"));
        assert_eq!(defaults.phosphorous.as_deref(), Some("30"));
        assert_eq!(defaults.potassium.as_deref(), Some("40.5"));
        assert_eq!(defaults.crop_type.as_deref(), Some("Wheat"));
    }

    #[test]
    fn test_profile_without_agronomic_fields() {
        let response: ProfileResponse =
            serde_json::from_value(json!({"name": "Asha", "email": "asha@farm.in"})).unwrap();
        assert!(response.defaults().is_empty());
    }

    #[test]
    fn test_missing_name_falls_back_to_user() {
        let response = ProfileResponse::default();
        let user = response.to_user();
        assert_eq!(user.name, DEFAULT_DISPLAY_NAME);
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_blank_and_null_profile_values_are_ignored() {
        let profile = AgronomicProfile {
            nitrogen: Some(json!("  ")),
            phosphorus: Some(Value::Null),
            potassium: None,
            crop: Some(json!(true)),
        };
        assert!(AgronomicDefaults::from_profile(&profile).is_empty());
    }
}
