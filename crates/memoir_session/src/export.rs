//! Self-contained export bundles for download and re-import.

use crate::error::{SessionError, SessionResult};
use chrono::{DateTime, Utc};
use memoir_core::Document;
use serde::{Deserialize, Serialize};

/// The identity slice of an export bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedUser {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Original account creation time.
    pub created_at: DateTime<Utc>,
}

/// A self-contained file a person can download and later feed back into
/// import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// Who the biography belongs to.
    pub user: ExportedUser,
    /// The full content graph.
    pub biography: Document,
    /// When the export was produced.
    pub exported_at: DateTime<Utc>,
}

impl ExportBundle {
    /// Parses and shape-validates a bundle from untrusted JSON.
    ///
    /// Requires `user.name`, `user.email`, and `biography` to be present
    /// and non-empty; everything inside `biography` is defaulted leniently
    /// so older exports still load.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidImport`] naming what is missing or
    /// malformed.
    pub fn from_value(value: &serde_json::Value) -> SessionResult<Self> {
        let user = value
            .get("user")
            .ok_or_else(|| SessionError::invalid_import("missing `user`"))?;

        let name = require_string(user, "name", "user.name")?;
        let email = require_string(user, "email", "user.email")?;

        let biography = value
            .get("biography")
            .ok_or_else(|| SessionError::invalid_import("missing `biography`"))?;
        let biography: Document = serde_json::from_value(biography.clone())
            .map_err(|e| SessionError::invalid_import(format!("malformed `biography`: {e}")))?;

        let created_at = user
            .get("createdAt")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_else(Utc::now);
        let exported_at = value
            .get("exportedAt")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_else(Utc::now);

        Ok(Self {
            user: ExportedUser {
                name,
                email,
                created_at,
            },
            biography,
            exported_at,
        })
    }
}

fn require_string(
    object: &serde_json::Value,
    field: &str,
    label: &str,
) -> SessionResult<String> {
    match object.get(field).and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        Some(_) => Err(SessionError::invalid_import(format!("empty `{label}`"))),
        None => Err(SessionError::invalid_import(format!("missing `{label}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roundtrip_through_json() {
        let bundle = ExportBundle {
            user: ExportedUser {
                name: "Ada".into(),
                email: "ada@x.io".into(),
                created_at: Utc::now(),
            },
            biography: Document::with_standard_sections(),
            exported_at: Utc::now(),
        };

        let value = serde_json::to_value(&bundle).unwrap();
        assert!(value.get("exportedAt").is_some());

        let parsed = ExportBundle::from_value(&value).unwrap();
        assert_eq!(parsed, bundle);
    }

    #[test]
    fn missing_email_is_invalid_import() {
        let value = json!({
            "user": { "name": "Bo" },
            "biography": { "sections": {} }
        });
        let err = ExportBundle::from_value(&value).unwrap_err();
        assert!(matches!(err, SessionError::InvalidImport { ref reason } if reason.contains("user.email")));
    }

    #[test]
    fn missing_biography_is_invalid_import() {
        let value = json!({ "user": { "name": "Bo", "email": "bo@x.io" } });
        let err = ExportBundle::from_value(&value).unwrap_err();
        assert!(matches!(err, SessionError::InvalidImport { ref reason } if reason.contains("biography")));
    }

    #[test]
    fn empty_name_is_invalid_import() {
        let value = json!({
            "user": { "name": "   ", "email": "bo@x.io" },
            "biography": {}
        });
        assert!(ExportBundle::from_value(&value).is_err());
    }

    #[test]
    fn lenient_biography_defaults() {
        let value = json!({
            "user": { "name": "Bo", "email": "bo@x.io" },
            "biography": { "sections": { "aboutMe": "Hi" } }
        });
        let bundle = ExportBundle::from_value(&value).unwrap();
        assert_eq!(bundle.biography.sections["aboutMe"], "Hi");
        assert!(bundle.biography.photos.is_empty());
    }
}
