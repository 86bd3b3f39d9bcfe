pub mod event_stream;
pub mod invalidation;
pub mod sse;

pub use event_stream::{ConnectionState, EventStreamClient, StreamConfig, StreamUpdate};
pub use invalidation::{invalidation_keys, CacheKey};
