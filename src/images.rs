/// Image loading for the gallery grids and upload previews
///
/// Two sources of pixels:
/// - Remote photos, fetched once per URL and kept in a disk cache
///   under the user's cache directory (~/.cache/portfolio-studio/images
///   on Linux), so revisiting a gallery doesn't refetch anything.
/// - Upload previews, decoded and downscaled from the picked files in
///   a blocking task so the UI thread never decodes an image.
///
/// Collections themselves are still loaded per screen; this cache
/// only holds bytes for URLs the server already gave us.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use iced::widget::image::Handle;
use sha2::{Digest, Sha256};

use crate::api::ApiClient;
use crate::state::collection::RemoteError;

/// Longest edge of a draft preview thumbnail
const PREVIEW_SIZE: u32 = 256;

/// Get the image cache directory, creating it if needed.
pub fn image_cache_dir() -> PathBuf {
    let mut path = dirs_next::cache_dir()
        .or_else(dirs_next::home_dir)
        .expect("Could not determine cache directory");
    path.push("portfolio-studio");
    path.push("images");

    if let Err(err) = std::fs::create_dir_all(&path) {
        tracing::warn!("could not create image cache directory: {}", err);
    }
    path
}

/// Cache file for a URL: SHA-256 of the URL, content-addressed like a
/// browser cache, so any URL shape maps to a flat file name.
pub fn cache_file_name(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{:x}", digest)
}

/// Fetch one image, reading the disk cache first.
pub async fn load_remote(api: ApiClient, url: String) -> Result<Handle, RemoteError> {
    let cached = image_cache_dir().join(cache_file_name(&url));
    if cached.exists() {
        return Ok(Handle::from_path(cached));
    }

    let bytes = api.fetch_image(&url).await.map_err(RemoteError::from)?;

    if let Err(err) = tokio::fs::write(&cached, &bytes).await {
        // A full or read-only cache just means refetching next time
        tracing::warn!("could not cache image {}: {}", url, err);
    }

    Ok(Handle::from_bytes(bytes))
}

/// Decode a picked file into a small preview thumbnail.
///
/// Decoding is CPU-bound, so it runs on the blocking pool; the raw
/// RGBA pixels go straight into an iced handle with no re-encode.
pub async fn draft_preview(path: PathBuf) -> Result<Handle, String> {
    tokio::task::spawn_blocking(move || {
        let img = image::open(&path)
            .map_err(|e| format!("Could not decode {}: {}", path.display(), e))?;

        let thumb = img.resize(
            PREVIEW_SIZE,
            PREVIEW_SIZE,
            image::imageops::FilterType::Lanczos3,
        );
        let rgba = thumb.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Handle::from_rgba(width, height, rgba.into_raw()))
    })
    .await
    .map_err(|e| format!("Preview task failed: {}", e))?
}

/// In-memory handle store shared by the screens.
///
/// Tracks which URLs are already fetched or in flight so each URL is
/// requested at most once per run.
#[derive(Debug, Default)]
pub struct ImageStore {
    handles: HashMap<String, Handle>,
    pending: HashSet<String>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for a URL, if it has arrived.
    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.handles.get(url)
    }

    /// Of `urls`, the ones not yet fetched or in flight. Marks them
    /// in flight; the caller spawns one fetch per returned URL.
    pub fn request<'a>(&mut self, urls: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut fresh = Vec::new();
        for url in urls {
            if url.is_empty() || self.handles.contains_key(url) || self.pending.contains(url) {
                continue;
            }
            self.pending.insert(url.to_string());
            fresh.push(url.to_string());
        }
        fresh
    }

    /// Record an arrived image.
    pub fn insert(&mut self, url: String, handle: Handle) {
        self.pending.remove(&url);
        self.handles.insert(url, handle);
    }

    /// Record a failed fetch. The URL becomes requestable again, so a
    /// later screen visit retries it.
    pub fn forget(&mut self, url: &str) {
        self.pending.remove(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_name_is_stable_and_flat() {
        let a = cache_file_name("https://cdn.example/uploads/a b/photo.jpg?v=2");
        let b = cache_file_name("https://cdn.example/uploads/a b/photo.jpg?v=2");
        assert_eq!(a, b);
        // Hex digest only: safe as a flat file name on any platform
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));

        let c = cache_file_name("https://cdn.example/uploads/other.jpg");
        assert_ne!(a, c);
    }

    #[test]
    fn test_store_requests_each_url_once() {
        let mut store = ImageStore::new();
        let urls = ["https://cdn.example/1.jpg", "https://cdn.example/2.jpg"];

        let first = store.request(urls.iter().copied());
        assert_eq!(first.len(), 2);

        // Same URLs again: already in flight, nothing to fetch
        let second = store.request(urls.iter().copied());
        assert!(second.is_empty());

        // Once one arrives it stays served from memory
        store.insert(
            urls[0].to_string(),
            Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
        );
        assert!(store.get(urls[0]).is_some());
        assert!(store.request(std::iter::once(urls[0])).is_empty());
    }

    #[test]
    fn test_failed_fetch_is_retryable() {
        let mut store = ImageStore::new();
        let url = "https://cdn.example/1.jpg";

        assert_eq!(store.request(std::iter::once(url)).len(), 1);
        store.forget(url);
        assert_eq!(store.request(std::iter::once(url)).len(), 1);
    }

    #[test]
    fn test_empty_urls_are_ignored() {
        let mut store = ImageStore::new();
        assert!(store.request(std::iter::once("")).is_empty());
    }
}
