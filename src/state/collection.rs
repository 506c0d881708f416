/// Remote collection state
///
/// Every screen holds its collections as `Tracked<T>`: a tagged load
/// state plus a load generation. The generation implements
/// last-trigger-wins: when a reload is triggered while an earlier
/// load is still in flight, the earlier result is discarded no matter
/// which response arrives first. (Navigating away drops the screen's
/// state wholesale, so cross-screen staleness cannot arise at all.)

use std::fmt;
use std::future::Future;

use crate::api::ApiError;
use crate::state::data::{Category, Photo, Work};

/// Cloneable error snapshot carried inside messages.
///
/// `ApiError` wraps `reqwest::Error` and cannot cross the message
/// boundary (messages must be `Clone`), so tasks convert to this
/// before resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    /// HTTP status, when the server answered at all
    pub status: Option<u16>,
    /// User-facing message
    pub message: String,
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl From<ApiError> for RemoteError {
    fn from(err: ApiError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Load state of one remote collection
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    /// A load is in flight and nothing is held yet
    Loading,
    /// The collection as of its last successful load
    Ready(Vec<T>),
    /// The last load failed; the message renders as an error banner
    Failed(String),
}

/// A remote collection plus its load generation
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    state: Remote<T>,
    generation: u64,
}

impl<T> Default for Tracked<T> {
    fn default() -> Self {
        Self {
            state: Remote::Loading,
            generation: 0,
        }
    }
}

impl<T> Tracked<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a (re)load: bumps the generation and enters `Loading`.
    /// Returns the generation to tag the in-flight task with.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = Remote::Loading;
        self.generation
    }

    /// Apply a load result if `generation` still matches the latest
    /// trigger. Returns whether the result was applied.
    pub fn resolve(&mut self, generation: u64, result: Result<Vec<T>, RemoteError>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding stale collection load"
            );
            return false;
        }
        self.state = match result {
            Ok(items) => Remote::Ready(items),
            Err(err) => Remote::Failed(err.message),
        };
        true
    }

    /// The held items; always a slice, empty while loading or failed.
    pub fn items(&self) -> &[T] {
        match &self.state {
            Remote::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, Remote::Loading)
    }

    /// Error message of a failed load, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            Remote::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T: Keyed> Tracked<T> {
    /// Remove one item by id after a successful delete. Keeps `Ready`
    /// so the list updates in place instead of flashing a loader.
    pub fn remove(&mut self, id: i64) {
        if let Remote::Ready(items) = &mut self.state {
            items.retain(|item| item.key() != id);
        }
    }

    /// Patch one item in place after a successful update.
    pub fn patch(&mut self, id: i64, apply: impl FnOnce(&mut T)) {
        if let Remote::Ready(items) = &mut self.state {
            if let Some(item) = items.iter_mut().find(|item| item.key() == id) {
                apply(item);
            }
        }
    }
}

/// Identity of a collection item, for in-place reconciliation
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for Photo {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Work {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Category {
    fn key(&self) -> i64 {
        self.id
    }
}

/// First-non-empty-source-wins fallback.
///
/// Awaits `primary`; its items win unless it resolves empty or 404,
/// in which case `fallback` is consulted instead. Other primary
/// errors propagate without touching the fallback. The fallback
/// future is not polled unless needed.
pub async fn first_non_empty<T>(
    primary: impl Future<Output = Result<Vec<T>, ApiError>>,
    fallback: impl Future<Output = Result<Vec<T>, ApiError>>,
) -> Result<Vec<T>, ApiError> {
    match primary.await {
        Ok(items) if !items.is_empty() => Ok(items),
        Ok(_) => fallback.await,
        Err(err) if err.is_not_found() => fallback.await,
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(status: u16) -> RemoteError {
        RemoteError {
            status: Some(status),
            message: format!("HTTP {}", status),
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64, &'static str);

    impl Keyed for Row {
        fn key(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_stale_load_is_discarded() {
        // Trigger 1, then trigger 2 while 1 is still pending. When 1
        // resolves after 2, state must reflect 2's result.
        let mut rows: Tracked<Row> = Tracked::new();
        let gen1 = rows.begin();
        let gen2 = rows.begin();

        assert!(rows.resolve(gen2, Ok(vec![Row(2, "second")])));
        assert!(!rows.resolve(gen1, Ok(vec![Row(1, "first")])));

        assert_eq!(rows.items(), &[Row(2, "second")]);
    }

    #[test]
    fn test_stale_failure_cannot_clobber_fresh_result() {
        let mut rows: Tracked<Row> = Tracked::new();
        let gen1 = rows.begin();
        let gen2 = rows.begin();

        assert!(rows.resolve(gen2, Ok(vec![Row(7, "kept")])));
        assert!(!rows.resolve(gen1, Err(err(500))));

        assert!(rows.error().is_none());
        assert_eq!(rows.items().len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_items_empty_and_sets_error() {
        let mut rows: Tracked<Row> = Tracked::new();
        let generation = rows.begin();
        rows.resolve(generation, Err(err(502)));

        assert_eq!(rows.items(), &[] as &[Row]);
        assert_eq!(rows.error(), Some("HTTP 502"));
        assert!(!rows.is_loading());
    }

    #[test]
    fn test_mutations_reconcile_in_place() {
        let mut rows: Tracked<Row> = Tracked::new();
        let generation = rows.begin();
        rows.resolve(generation, Ok(vec![Row(1, "a"), Row(2, "b"), Row(3, "c")]));

        rows.remove(2);
        assert_eq!(rows.items(), &[Row(1, "a"), Row(3, "c")]);

        rows.patch(3, |row| row.1 = "patched");
        assert_eq!(rows.items()[1], Row(3, "patched"));

        // Neither mutation re-enters the loading state.
        assert!(!rows.is_loading());
    }

    #[tokio::test]
    async fn test_first_non_empty_prefers_primary() {
        let result = first_non_empty(
            async { Ok::<_, ApiError>(vec![1, 2]) },
            async { Ok(vec![9]) },
        )
        .await
        .unwrap();
        assert_eq!(result, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_first_non_empty_falls_back_on_empty_and_404() {
        let result = first_non_empty(
            async { Ok::<_, ApiError>(Vec::<i32>::new()) },
            async { Ok(vec![9]) },
        )
        .await
        .unwrap();
        assert_eq!(result, vec![9]);

        let result = first_non_empty(
            async {
                Err::<Vec<i32>, _>(ApiError::Status {
                    status: 404,
                    message: "HTTP 404".to_string(),
                })
            },
            async { Ok(vec![9]) },
        )
        .await
        .unwrap();
        assert_eq!(result, vec![9]);
    }

    #[tokio::test]
    async fn test_first_non_empty_propagates_other_errors() {
        let result = first_non_empty(
            async {
                Err::<Vec<i32>, _>(ApiError::Status {
                    status: 500,
                    message: "HTTP 500".to_string(),
                })
            },
            async { Ok(vec![9]) },
        )
        .await;
        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
    }
}
