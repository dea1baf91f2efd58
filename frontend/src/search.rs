//! Debounced location search.
//!
//! Each keystroke schedules a delayed geocoding request and aborts the one
//! scheduled before it. A request already on the wire is also tied to a
//! [`Ticket`](crate::sync::Ticket), so its result is dropped once a newer
//! keystroke arrives.

use crate::api::GoGreenApi;
use crate::sync::RequestGuard;
use crate::web::http::{FetchTransport, Transport};
use crate::web::timer::{self, SleepFn};
use futures::future::{AbortHandle, Abortable};
use gogreen_shared::protocol::GeocodeQuery;
use gogreen_shared::{ApiResult, DEFAULT_COUNTRY, GeocodeResult};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Input quiescence required before a lookup is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Clone)]
pub struct LocationSearch<T = FetchTransport> {
    api: GoGreenApi<T>,
    guard: RequestGuard,
    pending: Arc<Mutex<Option<AbortHandle>>>,
    sleep: SleepFn,
}

impl<T: Transport + Clone + 'static> LocationSearch<T> {
    pub fn new(api: GoGreenApi<T>) -> Self {
        Self::with_sleep(api, timer::sleep)
    }

    pub fn with_sleep(api: GoGreenApi<T>, sleep: SleepFn) -> Self {
        Self {
            api,
            guard: RequestGuard::new(),
            pending: Arc::new(Mutex::new(None)),
            sleep,
        }
    }

    /// Handles one keystroke.
    ///
    /// Returns `None` when the trimmed query is too short (nothing is sent).
    /// Otherwise returns a future resolving to `None` if it was superseded, or
    /// to the lookup result.
    pub fn input(
        &self,
        query: &str,
    ) -> Option<impl Future<Output = Option<ApiResult<Vec<GeocodeResult>>>> + use<T>> {
        self.cancel();

        let query = query.trim().to_string();
        if query.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        let ticket = self.guard.begin();
        let (handle, registration) = AbortHandle::new_pair();
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(handle);
        }

        let api = self.api.clone();
        let sleep = self.sleep;
        let task = Abortable::new(
            async move {
                sleep(SEARCH_DEBOUNCE).await;
                let result = api
                    .call(&GeocodeQuery {
                        q: query,
                        country: DEFAULT_COUNTRY.to_string(),
                    })
                    .await
                    .map(|response| response.results);
                ticket.is_current().then_some(result)
            },
            registration,
        );

        Some(async move { task.await.ok().flatten() })
    }

    /// Aborts the scheduled lookup and invalidates any in-flight one.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().ok().and_then(|mut p| p.take()) {
            handle.abort();
        }
        self.guard.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::web::http::tests::MockTransport;
    use futures::FutureExt;
    use futures::future::LocalBoxFuture;
    use gogreen_shared::protocol::HttpMethod;
    use serde_json::json;

    fn tokio_sleep(duration: Duration) -> LocalBoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed_local()
    }

    fn search() -> (LocationSearch<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/trees/geocode/?q=Pune&country=IN",
            200,
            json!({"results": [{"place_name": "Pune, Maharashtra", "latitude": 18.52, "longitude": 73.85}]}),
        );
        let api = GoGreenApi::with_transport(ApiConfig::new("http://api.test"), mock.clone());
        (LocationSearch::with_sleep(api, tokio_sleep), mock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_sends_nothing() {
        let (search, mock) = search();

        assert!(search.input("Pu").is_none());
        assert!(search.input("  P  ").is_none());
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_request_after_quiescence() {
        let (search, mock) = search();
        let start = tokio::time::Instant::now();

        let results = search.input("Pune").unwrap().await.unwrap().unwrap();

        assert!(start.elapsed() >= SEARCH_DEBOUNCE);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_name, "Pune, Maharashtra");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_within_window_cancels_pending() {
        let (search, mock) = search();

        let first = search.input("Pun").unwrap();
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            search.input("Pune").unwrap().await
        };
        let (first, second) = futures::join!(first, second);

        assert_eq!(first, None);
        assert!(matches!(second, Some(Ok(ref r)) if r.len() == 1));
        assert_eq!(mock.request_count(), 1);
        assert_eq!(
            mock.count_for(HttpMethod::Get, "http://api.test/api/trees/geocode/?q=Pun&country=IN"),
            0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shortening_query_cancels_pending() {
        let (search, mock) = search();

        let pending = search.input("Pune").unwrap();
        assert!(search.input("Pu").is_none());

        assert_eq!(pending.await, None);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_error_is_reported() {
        let (search, _mock) = search();

        // unmocked route answers 404 with a non-JSON body
        let result = search.input("Nowhere").unwrap().await.unwrap();
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unable to fetch locations"
        );
    }
}
