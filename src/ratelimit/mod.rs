//! Per-client admission control.

mod bucket;
mod registry;

pub use bucket::TokenBucket;
pub use registry::{BucketKey, RateLimitRegistry, RegistryConfig, SweeperHandle};
