//! Fan-out coordination with fail-fast error handling.

use super::aggregator;
use crate::server::error::{Error, Result};
use crate::server::source::IntegerSource;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use stddev_core::StdDevResult;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

/// Runs `requests` concurrent source invocations of `length` integers each
/// and aggregates their standard deviations.
///
/// Each invocation runs as its own task, racing a shared cancellation token
/// against its upstream draw. Completions are observed in completion order;
/// the first error cancels the remaining invocations and becomes the
/// returned error, with no results delivered. When every invocation
/// succeeds, the hand-off channel closes and the aggregator's output is
/// drained into the returned collection: one result per set plus the final
/// cumulative result.
///
/// The hand-off channel is sized to `requests` so a producer can always
/// complete its send without waiting for the aggregator to be scheduled.
pub async fn collect<S>(
    source: Arc<S>,
    requests: usize,
    length: usize,
    buffer: usize,
) -> Result<Vec<StdDevResult>>
where
    S: IntegerSource + Send + Sync + 'static,
{
    let (set_tx, set_rx) = mpsc::channel(requests.max(1));
    let results = aggregator::aggregate(set_rx, buffer);

    let cancelled = CancellationToken::new();
    let mut invocations: FuturesUnordered<_> = (0..requests)
        .map(|_| {
            let source = Arc::clone(&source);
            let set_tx = set_tx.clone();
            let cancelled = cancelled.clone();
            tokio::spawn(async move {
                let set = tokio::select! {
                    () = cancelled.cancelled() => return Err(Error::Cancelled),
                    fetched = source.integers(length) => fetched?,
                };
                set_tx.send(set).await.map_err(|_| Error::Channel {
                    context: "hand-off channel closed before send".to_owned(),
                })
            })
        })
        .collect();
    // The aggregator's input must close once every producer clone is gone.
    drop(set_tx);

    let mut first_error = None;
    while let Some(joined) = invocations.next().await {
        let outcome = joined.unwrap_or_else(|e| Err(Error::Join(e)));
        if let Err(error) = outcome {
            if first_error.is_none() {
                cancelled.cancel();
                first_error = Some(error);
            }
        }
    }

    if let Some(error) = first_error {
        return Err(error);
    }

    Ok(ReceiverStream::new(results).collect().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core::time::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stddev_core::types::Integer;

    const BUFFER: usize = 8;

    /// Source that returns `0..quantity` after an optional delay, counting
    /// started and completed draws. A draw whose start index is listed in
    /// `fail_on` fails immediately instead.
    struct StubSource {
        started: AtomicUsize,
        completed: AtomicUsize,
        fail_on: Option<usize>,
        delay: Option<Duration>,
        random_delay: bool,
    }

    impl StubSource {
        fn succeeding() -> Self {
            Self {
                started: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                fail_on: None,
                delay: None,
                random_delay: false,
            }
        }

        fn failing_on(index: usize, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                fail_on: Some(index),
                ..Self::succeeding()
            }
        }

        fn randomly_slow() -> Self {
            Self {
                random_delay: true,
                ..Self::succeeding()
            }
        }
    }

    #[async_trait]
    impl IntegerSource for StubSource {
        async fn integers(&self, quantity: usize) -> Result<Vec<Integer>> {
            let index = self.started.fetch_add(1, Ordering::SeqCst);

            if self.fail_on == Some(index) {
                return Err(Error::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "stub failure".to_owned(),
                });
            }

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.random_delay {
                let millis = rand::random_range(0..50_u64);
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }

            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok((0..quantity as Integer).collect())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn collects_one_result_per_set_plus_a_cumulative_one() {
        let source = Arc::new(StubSource::succeeding());
        let results = collect(Arc::clone(&source), 4, 5, BUFFER).await.unwrap();

        assert_eq!(results.len(), 5);
        let per_set = results.iter().filter(|r| r.data.len() == 5).count();
        let cumulative = results.iter().filter(|r| r.data.len() == 20).count();
        assert_eq!(per_set, 4);
        assert_eq!(cumulative, 1);
        // The cumulative result is computed only after the input closes, so
        // it is always the last emission.
        assert_eq!(results.last().unwrap().data.len(), 20);
        assert_eq!(source.completed.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn yields_an_empty_collection_for_zero_requests() {
        let source = Arc::new(StubSource::succeeding());
        let results = collect(Arc::clone(&source), 0, 5, BUFFER).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(source.started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn returns_the_injected_error_and_cancels_siblings() {
        let source = Arc::new(StubSource::failing_on(0, Duration::from_secs(5)));
        let err = collect(Arc::clone(&source), 8, 5, BUFFER).await.unwrap_err();

        match err {
            Error::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "stub failure");
            }
            other => panic!("expected the injected status error, got {other:?}"),
        }

        // Siblings were parked on a long sleep; cancellation must have cut
        // them short rather than letting their draws complete.
        assert_eq!(source.completed.load(Ordering::SeqCst), 0);
        assert!(source.started.load(Ordering::SeqCst) <= 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn fifty_concurrent_draws_settle_without_loss() {
        const REQUESTS: usize = 50;
        const LENGTH: usize = 5;

        let source = Arc::new(StubSource::randomly_slow());
        let results = collect(Arc::clone(&source), REQUESTS, LENGTH, BUFFER)
            .await
            .unwrap();

        assert_eq!(results.len(), REQUESTS + 1);

        let cumulative = results.last().unwrap();
        assert_eq!(cumulative.data.len(), REQUESTS * LENGTH);

        let mut union: Vec<Integer> = results[..REQUESTS]
            .iter()
            .flat_map(|r| {
                assert_eq!(r.data.len(), LENGTH);
                r.data.iter().copied()
            })
            .collect();
        let mut combined = cumulative.data.clone();
        union.sort_unstable();
        combined.sort_unstable();
        assert_eq!(union, combined);
    }
}
