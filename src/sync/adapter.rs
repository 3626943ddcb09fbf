use crate::sync::collection::{ChangeEvent, LiveCollection, SyncRecord};
use async_trait::async_trait;
use log::warn;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Fixed delay before re-establishing a dropped change feed. No backoff
/// growth and no attempt cap; the adapter retries until unsubscribed.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("change feed disconnected: {0}")]
    Disconnected(String),
    #[error("change feed timed out")]
    TimedOut,
    #[error("failed to connect to change feed: {0}")]
    Connect(String),
}

/// One established push channel. An `Err` from `next_event` tears the
/// subscription down and triggers the reconnect cycle.
#[async_trait]
pub trait ChangeFeed<T>: Send {
    async fn next_event(&mut self) -> Result<ChangeEvent<T>, FeedError>;
}

/// Factory for change feeds; called again on every reconnect
#[async_trait]
pub trait FeedConnector<T>: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn ChangeFeed<T>>, FeedError>;
}

/// Keeps a `LiveCollection` synchronized with a remote table.
///
/// `subscribe` spawns a pump task that connects, applies events in delivery
/// order, and on any channel error sleeps the reconnect delay and connects
/// again. At most one subscription is active per adapter; subscribing again
/// aborts the previous pump first so events are never delivered twice.
pub struct SyncAdapter<T> {
    collection: Arc<Mutex<LiveCollection<T>>>,
    pump: Option<JoinHandle<()>>,
    reconnect_delay: Duration,
}

impl<T: SyncRecord + Send + 'static> SyncAdapter<T> {
    pub fn new() -> Self {
        Self::with_reconnect_delay(RECONNECT_DELAY)
    }

    /// Adapter with a non-default reconnect delay (tests use short delays)
    pub fn with_reconnect_delay(reconnect_delay: Duration) -> Self {
        Self {
            collection: Arc::new(Mutex::new(LiveCollection::default())),
            pump: None,
            reconnect_delay,
        }
    }

    /// Shared handle to the synchronized collection
    pub fn collection(&self) -> Arc<Mutex<LiveCollection<T>>> {
        Arc::clone(&self.collection)
    }

    /// Seed the collection from an initial fetch
    pub fn seed(&self, records: Vec<T>) {
        self.collection
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace_all(records);
    }

    /// Start (or restart) the subscription. Must be called from within a
    /// tokio runtime.
    pub fn subscribe(&mut self, connector: Arc<dyn FeedConnector<T>>) {
        self.unsubscribe();

        let collection = Arc::clone(&self.collection);
        let delay = self.reconnect_delay;
        self.pump = Some(tokio::spawn(async move {
            loop {
                match connector.connect().await {
                    Ok(mut feed) => loop {
                        match feed.next_event().await {
                            Ok(event) => {
                                collection
                                    .lock()
                                    .unwrap_or_else(|e| e.into_inner())
                                    .apply(event);
                            }
                            Err(e) => {
                                warn!("change feed dropped: {}", e);
                                break;
                            }
                        }
                    },
                    Err(e) => {
                        warn!("change feed connect failed: {}", e);
                    }
                }
                tokio::time::sleep(delay).await;
            }
        }));
    }

    /// Tear down the active subscription, if any
    pub fn unsubscribe(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.pump.as_ref().map(|p| !p.is_finished()).unwrap_or(false)
    }
}

impl<T: SyncRecord + Send + 'static> Default for SyncAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SyncAdapter<T> {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}
