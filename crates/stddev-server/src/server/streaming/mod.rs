//! The fan-out/aggregation pipeline.
//!
//! [`coordinator`] dispatches concurrent source invocations into a bounded
//! hand-off channel; [`aggregator`] consumes that channel and streams
//! per-set and cumulative statistics back out. Each run owns a fresh
//! channel pair and aggregator task, so concurrent runs never interfere.

pub mod aggregator;
pub mod coordinator;
