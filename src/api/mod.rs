/// Remote portfolio API
///
/// This module owns all HTTP communication:
/// - Request plumbing, auth headers, and error mapping (client.rs)
/// - One typed method per API operation (endpoints.rs)

pub mod client;
pub mod endpoints;

pub use client::{ApiClient, ApiError};

/// Fixed production API URL
const PRODUCTION_API_URL: &str = "https://photography-api-e6oq.onrender.com";

/// Local development API URL
const DEVELOPMENT_API_URL: &str = "http://localhost:3001";

/// Resolve the API base URL for this process.
///
/// Checked once at startup, in order:
/// 1. The `PORTFOLIO_API_URL` environment variable
/// 2. The localhost development URL in debug builds
/// 3. The fixed production URL
pub fn resolve_base_url() -> String {
    if let Ok(url) = std::env::var("PORTFOLIO_API_URL") {
        let url = url.trim_end_matches('/').to_string();
        if !url.is_empty() {
            tracing::info!("API base URL from environment: {}", url);
            return url;
        }
    }

    if cfg!(debug_assertions) {
        tracing::info!("development build, using {}", DEVELOPMENT_API_URL);
        DEVELOPMENT_API_URL.to_string()
    } else {
        tracing::info!("release build, using {}", PRODUCTION_API_URL);
        PRODUCTION_API_URL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_has_no_trailing_slash() {
        // Request paths always start with '/', so the base must not
        // end with one or URLs would contain "//api/...".
        assert!(!PRODUCTION_API_URL.ends_with('/'));
        assert!(!DEVELOPMENT_API_URL.ends_with('/'));
    }
}
