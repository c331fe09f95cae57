//! Upstream integer acquisition.
//!
//! [`IntegerSource`] is the seam between the fan-out pipeline and the
//! outside world; [`RandomOrgSource`] is the production implementation
//! backed by the random.org integers API.

mod random_org;

pub use random_org::RandomOrgSource;

use crate::server::error::Result;
use async_trait::async_trait;
use stddev_core::types::Integer;

/// A source of uniformly random integers.
#[async_trait]
pub trait IntegerSource {
    /// Fetches `quantity` random integers as one ordered set.
    ///
    /// Performs at most one outbound call and never returns partial data:
    /// the call either yields exactly the requested set or an error. Retry
    /// policy, if any, belongs to the implementation's transport.
    async fn integers(&self, quantity: usize) -> Result<Vec<Integer>>;
}
