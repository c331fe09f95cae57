//! # Shared Wire Types
//!
//! The types in this module are the contract between the aggregation
//! pipeline and whatever serializes its results to a caller. They are kept
//! free of transport concerns so that both the service binary and any future
//! client crate can depend on the same definitions.

use serde::{Deserialize, Serialize};

/// The integer type produced by the upstream random source.
///
/// Upstream values are treated as opaque signed integers; 64 bits covers the
/// full range the integers API can be asked for.
pub type Integer = i64;

/// One statistic emitted by the aggregation pipeline.
///
/// Every received integer set yields one result carrying that set unchanged;
/// a completed run additionally yields a final result whose `data` is the
/// concatenation of every set received, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdDevResult {
    /// Population standard deviation of `data`.
    pub stddev: f64,
    /// The integers the statistic was computed over.
    pub data: Vec<Integer>,
}
