pub mod broker;
pub mod types;

pub use broker::EventBroker;
pub use types::{ClientIdentity, Envelope, EventName};
