/// Shared data structures for the application state
///
/// These structs are the typed shapes of the API's JSON responses.
/// They are decoded once at the API boundary; everything downstream
/// (derived views, screens) works with these types and never
/// re-checks response shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single photo as stored by the remote API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Photo {
    /// Server-assigned ID
    pub id: i64,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Absolute URL of the stored image
    pub url: String,
    /// Category reference (None = uncategorized)
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Denormalized category name for display
    #[serde(default)]
    pub category_name: Option<String>,
    /// Denormalized category slug for filtering
    #[serde(default)]
    pub category_slug: Option<String>,
    /// Owning work (None = unassigned photo)
    #[serde(default)]
    pub work_id: Option<i64>,
    /// Featured flag (highlighted in the public gallery)
    #[serde(default)]
    pub is_featured: bool,
    /// Display position within its work
    #[serde(default)]
    pub order: i64,
    /// Server-side creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A work: a named grouping of photos shown as one gallery entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Work {
    /// Server-assigned ID
    pub id: i64,
    /// Display title
    pub title: String,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Category reference
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Denormalized category name for display
    #[serde(default)]
    pub category_name: Option<String>,
    /// Denormalized category slug for filtering
    #[serde(default)]
    pub category_slug: Option<String>,
    /// Cover image URL chosen by the server (None until a photo exists)
    #[serde(default)]
    pub cover_photo_url: Option<String>,
    /// Featured flag
    #[serde(default)]
    pub is_featured: bool,
    /// Number of photos currently assigned to this work
    #[serde(default)]
    pub photo_count: i64,
}

/// A category: flat lookup list referenced by photos and works
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// The authenticated admin user, echoed by login/verify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /api/auth/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of `POST /api/contact`
#[derive(Debug, Clone, Deserialize)]
pub struct ContactResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub jwt_configured: bool,
    #[serde(default)]
    pub database_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_decodes_with_nullable_fields_absent() {
        // The API omits or nulls work/category fields for unassigned,
        // uncategorized photos; decoding must not require them.
        let json = r#"{"id": 7, "title": "Dunes", "url": "https://cdn.example/p/7.jpg"}"#;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(photo.id, 7);
        assert_eq!(photo.work_id, None);
        assert_eq!(photo.category_slug, None);
        assert!(!photo.is_featured);
    }

    #[test]
    fn test_work_decodes_without_cover() {
        let json = r#"{"id": 3, "title": "Spring Session", "photo_count": 0}"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.cover_photo_url, None);
        assert_eq!(work.photo_count, 0);
    }

    #[test]
    fn test_login_response_shapes() {
        let ok: LoginResponse =
            serde_json::from_str(r#"{"success":true,"token":"abc","user":{"username":"admin"}}"#)
                .unwrap();
        assert!(ok.success);
        assert_eq!(ok.token.as_deref(), Some("abc"));

        let rejected: LoginResponse =
            serde_json::from_str(r#"{"success":false,"error":"invalid credentials"}"#).unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.error.as_deref(), Some("invalid credentials"));
    }
}
