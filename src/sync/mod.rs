// Realtime reconciliation: typed change events from a push feed applied to
// an in-memory mirror of a remote table

pub mod adapter;
pub mod collection;

pub use adapter::{ChangeFeed, FeedConnector, FeedError, SyncAdapter, RECONNECT_DELAY};
pub use collection::{ChangeEvent, LiveCollection, SyncRecord};
