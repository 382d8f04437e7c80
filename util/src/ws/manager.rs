//! Topic registry for live feeds.
//!
//! Each topic owns one Tokio broadcast channel. Publishing never waits on a slow
//! socket; a receiver that falls more than `TOPIC_CAPACITY` frames behind skips
//! ahead and is told how many it lost.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Frames buffered per topic before lagging receivers start dropping.
const TOPIC_CAPACITY: usize = 100;

#[derive(Clone, Default)]
pub struct WebSocketManager {
    topics: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
}

impl WebSocketManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins `topic`, opening it on first use.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<String> {
        let mut topics = self.topics.write().await;
        topics
            .entry(topic.to_owned())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Sends `frame` to everyone on `topic` and returns how many receivers got it.
    ///
    /// Publishing to a topic nobody has joined is a no-op. A topic whose last
    /// receiver has gone is closed afterwards.
    pub async fn broadcast<T: Into<String>>(&self, topic: &str, frame: T) -> usize {
        let delivered = {
            let topics = self.topics.read().await;
            match topics.get(topic) {
                Some(sender) => sender.send(frame.into()).unwrap_or(0),
                None => return 0,
            }
        };
        if delivered == 0 {
            self.prune(topic).await;
        }
        delivered
    }

    /// Number of live receivers on `topic`.
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .await
            .get(topic)
            .map_or(0, |s| s.receiver_count())
    }

    async fn prune(&self, topic: &str) {
        let mut topics = self.topics.write().await;
        if topics.get(topic).is_some_and(|s| s.receiver_count() == 0) {
            tracing::debug!(topic, "closing topic with no subscribers");
            topics.remove(topic);
        }
    }
}
