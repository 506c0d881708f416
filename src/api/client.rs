/// HTTP plumbing for the portfolio API
///
/// `ApiClient` wraps a shared `reqwest::Client` with the base URL and
/// the current bearer token. Endpoint methods live in endpoints.rs;
/// this file only knows how to send requests and turn responses into
/// typed values or `ApiError`s.

use serde::de::DeserializeOwned;

/// Errors from the remote API layer.
///
/// Everything a screen needs to show the user is in `message()`;
/// mutation handlers additionally inspect `status()` (e.g. a DELETE
/// that 404s is reconciled as already-done).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (offline, DNS, refused connection).
    #[error("Could not reach the server. Check your connection and try again.")]
    Connection(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Human-readable message extracted from the response body.
        message: String,
    },

    /// A 2xx response whose body did not decode into the expected shape.
    #[error("The server returned an unexpected response.")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 404 answer (used to treat deletes of already-gone
    /// resources as benign).
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Extract a user-facing message from a non-2xx response body.
///
/// - JSON bodies surface their `error` (or `message`) field verbatim
/// - HTML bodies (error pages from an intermediary) are detected by
///   sniffing and replaced with a generic message, never shown raw
/// - anything else falls back to "HTTP <status>"
pub fn error_message(status: u16, body: &str) -> String {
    let trimmed = body.trim_start();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(msg) = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(|v| v.as_str())
        {
            if !msg.is_empty() {
                return msg.to_string();
            }
        }
    }

    let looks_like_html = trimmed.starts_with('<')
        || trimmed
            .get(..15)
            .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype html>"));
    if looks_like_html {
        return "The server returned an unexpected response.".to_string();
    }

    format!("HTTP {}", status)
}

/// Client for the portfolio API.
///
/// Cheap to clone (reqwest pools connections behind an `Arc`), so each
/// background task gets its own copy. The token is attached as
/// `Authorization: Bearer <token>` when present; it is set by the
/// session layer on login/logout, never read from storage ad hoc.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given base URL, unauthenticated.
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// Replace the bearer token (None clears it).
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET `path` and decode the JSON body.
    pub(super) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self
            .authorize(self.http.get(self.url(path)))
            .header(reqwest::header::ACCEPT, "application/json");
        Self::read_json(request.send().await.map_err(ApiError::Connection)?).await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub(super) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.http.post(self.url(path)))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        Self::read_json(request.send().await.map_err(ApiError::Connection)?).await
    }

    /// PUT a JSON body to `path` and decode the JSON response.
    pub(super) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.http.put(self.url(path)))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        Self::read_json(request.send().await.map_err(ApiError::Connection)?).await
    }

    /// DELETE `path`, ignoring any response body.
    pub(super) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self
            .authorize(self.http.delete(self.url(path)))
            .header(reqwest::header::ACCEPT, "application/json");
        let response = request.send().await.map_err(ApiError::Connection)?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// POST a multipart form to `path` and decode the JSON response.
    ///
    /// No explicit content type here: reqwest sets
    /// `multipart/form-data` with the generated boundary.
    pub(super) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.http.post(self.url(path)))
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form);
        Self::read_json(request.send().await.map_err(ApiError::Connection)?).await
    }

    /// GET `path` and return the raw body bytes (image downloads).
    pub(super) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiError::Connection)?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(ApiError::Connection)?;
        Ok(bytes.to_vec())
    }

    /// Fail on non-2xx, extracting a user-facing message from the body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), %message, "API request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Check status, then decode the 2xx body as JSON.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        response.json::<T>().await.map_err(ApiError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_body_is_surfaced_verbatim() {
        let msg = error_message(401, r#"{"error":"invalid credentials"}"#);
        assert_eq!(msg, "invalid credentials");
    }

    #[test]
    fn test_json_message_field_is_accepted() {
        let msg = error_message(500, r#"{"message":"database unavailable"}"#);
        assert_eq!(msg, "database unavailable");
    }

    #[test]
    fn test_html_body_is_not_leaked() {
        let msg = error_message(502, "<html><body><h1>502 Bad Gateway</h1></body></html>");
        assert_eq!(msg, "The server returned an unexpected response.");

        let msg = error_message(503, "<!DOCTYPE html>\n<html>...</html>");
        assert_eq!(msg, "The server returned an unexpected response.");
    }

    #[test]
    fn test_plain_body_falls_back_to_status() {
        assert_eq!(error_message(500, "something broke"), "HTTP 500");
        assert_eq!(error_message(404, ""), "HTTP 404");
    }

    #[test]
    fn test_json_without_error_field_falls_back_to_status() {
        assert_eq!(error_message(400, r#"{"ok":false}"#), "HTTP 400");
    }

    #[test]
    fn test_not_found_detection() {
        let err = ApiError::Status {
            status: 404,
            message: "HTTP 404".to_string(),
        };
        assert!(err.is_not_found());

        let err = ApiError::Status {
            status: 500,
            message: "HTTP 500".to_string(),
        };
        assert!(!err.is_not_found());
    }
}
