/// Typed operations on the portfolio API
///
/// One method per endpoint. Responses are decoded into the model
/// structs from `state::data` right here, so screens never touch raw
/// JSON.

use serde_json::json;

use super::client::{ApiClient, ApiError};
use crate::state::data::{
    Category, ContactResponse, Health, LoginResponse, Photo, VerifyResponse, Work,
};

/// Fields for `POST /api/works`
#[derive(Debug, Clone)]
pub struct NewWork {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub is_featured: bool,
}

/// Fields for `PUT /api/photos/:id`
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpdate {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub work_id: Option<i64>,
    pub is_featured: bool,
}

/// One file plus its metadata for `POST /api/photos` (multipart)
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub work_id: Option<i64>,
    pub is_featured: bool,
}

/// Fields for `POST /api/contact`
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ApiClient {
    /// List every photo.
    pub async fn list_photos(&self) -> Result<Vec<Photo>, ApiError> {
        self.get_json("/api/photos").await
    }

    /// List every work.
    pub async fn list_works(&self) -> Result<Vec<Work>, ApiError> {
        self.get_json("/api/works").await
    }

    /// List the photos assigned to one work.
    pub async fn work_photos(&self, work_id: i64) -> Result<Vec<Photo>, ApiError> {
        self.get_json(&format!("/api/works/{}/photos", work_id))
            .await
    }

    /// List the category lookup table.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json("/api/categories").await
    }

    /// Create a work.
    ///
    /// The response body is not decoded into a `Work`: the server also
    /// assigns the cover photo and photo count, so callers reload the
    /// works collection instead of trusting a partial echo.
    pub async fn create_work(&self, work: &NewWork) -> Result<(), ApiError> {
        let body = json!({
            "title": work.title,
            "description": work.description,
            "category_id": work.category_id,
            "is_featured": work.is_featured,
        });
        let _: serde_json::Value = self.post_json("/api/works", &body).await?;
        Ok(())
    }

    /// Delete a work. The server detaches its photos (their `work_id`
    /// becomes null), so callers must reload the photo collection.
    pub async fn delete_work(&self, work_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/works/{}", work_id)).await
    }

    /// Update one photo's metadata.
    pub async fn update_photo(&self, update: &PhotoUpdate) -> Result<(), ApiError> {
        let body = json!({
            "id": update.id,
            "title": update.title,
            "description": update.description,
            "category_id": update.category_id,
            "work_id": update.work_id,
            "is_featured": update.is_featured,
        });
        let _: serde_json::Value = self
            .put_json(&format!("/api/photos/{}", update.id), &body)
            .await?;
        Ok(())
    }

    /// Delete one photo.
    pub async fn delete_photo(&self, photo_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/photos/{}", photo_id)).await
    }

    /// Upload one photo file with its metadata.
    ///
    /// Returns the created record so the caller can report it upward.
    /// Optional references are sent as empty strings, which the API
    /// treats as "none".
    pub async fn upload_photo(&self, upload: PhotoUpload) -> Result<Photo, ApiError> {
        // image_mime only returns fixed, known-valid MIME strings
        let mime = image_mime(&upload.file_name);
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(mime)
            .expect("static MIME type");

        let form = reqwest::multipart::Form::new()
            .part("photo", part)
            .text("title", upload.title)
            .text("description", upload.description)
            .text(
                "category_id",
                upload.category_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .text(
                "work_id",
                upload.work_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .text("is_featured", upload.is_featured.to_string());

        self.post_multipart("/api/photos", form).await
    }

    /// Exchange credentials for a session token.
    ///
    /// Some deployments answer a rejected login with 401 and a JSON
    /// error body; `check_status` already surfaces that message, so a
    /// `Status` error here means "rejected", not "broken".
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = json!({ "username": username, "password": password });
        self.post_json("/api/auth/login", &body).await
    }

    /// Validate the current bearer token (200 = valid, 401 = stale).
    pub async fn verify(&self) -> Result<VerifyResponse, ApiError> {
        self.get_json("/api/auth/verify").await
    }

    /// Submit the public contact form.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<ContactResponse, ApiError> {
        let body = json!({
            "name": message.name,
            "email": message.email,
            "message": message.message,
        });
        self.post_json("/api/contact", &body).await
    }

    /// Liveness probe.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.get_json("/api/health").await
    }

    /// Download image bytes. Relative URLs (e.g. `/uploads/7.jpg`) are
    /// resolved against the API base URL.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let absolute;
        let target = if url.starts_with('/') {
            absolute = format!("{}{}", self.base_url(), url);
            &absolute
        } else {
            url
        };
        self.get_bytes(target).await
    }
}

/// Supported image extensions for upload and folder import
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff"];

/// MIME type for an image file name, by extension
fn image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// True if the path has a supported image extension
pub fn is_image_file(path: &std::path::Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_image_mime_by_extension() {
        assert_eq!(image_mime("DSC_0001.JPG"), "image/jpeg");
        assert_eq!(image_mime("cover.png"), "image/png");
        assert_eq!(image_mime("weird.raw"), "application/octet-stream");
        assert_eq!(image_mime("no_extension"), "application/octet-stream");
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("/photos/a.jpeg")));
        assert!(is_image_file(Path::new("b.WEBP")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("Makefile")));
    }
}
