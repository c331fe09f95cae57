//! Streaming standard-deviation aggregation.

use stddev_core::StdDevResult;
use stddev_core::stats::standard_deviation;
use stddev_core::types::Integer;
use tokio::sync::mpsc;

/// Spawns the aggregation task over a stream of integer sets.
///
/// For every set received (in arrival order), one [`StdDevResult`] for that
/// set is emitted immediately and the set is appended to a running
/// concatenation. When the input channel closes, a single cumulative result
/// over the concatenation is emitted, provided at least one set arrived.
/// The output channel closes when the task returns; nothing is ever emitted
/// after that.
///
/// The task never outlives an abandoned run: if the output receiver is
/// dropped, the next send fails and the task exits without emitting further
/// results.
pub fn aggregate(
    mut sets: mpsc::Receiver<Vec<Integer>>,
    buffer: usize,
) -> mpsc::Receiver<StdDevResult> {
    let (tx, rx) = mpsc::channel(buffer.max(1));

    tokio::spawn(async move {
        let mut combined: Vec<Integer> = Vec::new();

        while let Some(set) = sets.recv().await {
            combined.extend_from_slice(&set);
            let result = StdDevResult {
                stddev: standard_deviation(&set),
                data: set,
            };
            if tx.send(result).await.is_err() {
                tracing::debug!("Aggregator output dropped; abandoning run");
                return;
            }
        }

        if combined.is_empty() {
            return;
        }

        let result = StdDevResult {
            stddev: standard_deviation(&combined),
            data: combined,
        };
        if tx.send(result).await.is_err() {
            tracing::debug!("Aggregator output dropped before cumulative result");
        }
    });

    rx
}
