//! Subscriber Hub
//!
//! Forwards center lifecycle events to registered subscribers. Each delivery
//! is bounded by a timeout and a failing subscriber never blocks the others.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use log::{debug, error, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::notifications::center::NotificationCenter;
use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::events::CenterEvent;
use crate::notifications::traits::{DeliveryStats, Subscriber};

struct SubscriberInfo {
    subscriber: Arc<dyn Subscriber>,
    stats: SubscriberStats,
}

/// Statistics for individual subscribers
#[derive(Debug, Clone, Default)]
pub struct SubscriberStats {
    pub events_received: u64,
    pub events_processed: u64,
    pub processing_failures: u64,
    pub total_processing_time_us: u64,
    pub last_event_at: Option<SystemTime>,
}

/// Fan-out of center events to subscribers
#[derive(Clone)]
pub struct SubscriberHub {
    subscribers: Arc<RwLock<HashMap<String, SubscriberInfo>>>,
    global_stats: Arc<RwLock<DeliveryStats>>,
    delivery_timeout: Duration,
    shutdown: CancellationToken,
    pumps: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SubscriberHub {
    pub fn new(delivery_timeout: Duration) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            global_stats: Arc::new(RwLock::new(DeliveryStats::default())),
            delivery_timeout,
            shutdown: CancellationToken::new(),
            pumps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a subscriber
    pub async fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> NotificationResult<()> {
        if self.shutdown.is_cancelled() {
            return Err(NotificationError::SystemShutdown);
        }

        let subscriber_id = subscriber.subscriber_id().to_string();
        let mut subscribers = self.subscribers.write().await;
        if subscribers.contains_key(&subscriber_id) {
            return Err(NotificationError::subscriber_already_exists(subscriber_id));
        }

        subscribers.insert(
            subscriber_id.clone(),
            SubscriberInfo {
                subscriber,
                stats: SubscriberStats::default(),
            },
        );
        debug!("Subscribed '{}' to notifications", subscriber_id);
        Ok(())
    }

    pub async fn unsubscribe(&self, subscriber_id: &str) -> NotificationResult<()> {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(subscriber_id).is_some() {
            debug!("Unsubscribed '{}' from notifications", subscriber_id);
            Ok(())
        } else {
            Err(NotificationError::subscriber_not_found(subscriber_id))
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    pub async fn has_subscriber(&self, subscriber_id: &str) -> bool {
        self.subscribers.read().await.contains_key(subscriber_id)
    }

    pub async fn list_subscribers(&self) -> Vec<String> {
        self.subscribers.read().await.keys().cloned().collect()
    }

    pub async fn get_stats(&self) -> DeliveryStats {
        self.global_stats.read().await.clone()
    }

    pub async fn get_subscriber_stats(&self, subscriber_id: &str) -> Option<SubscriberStats> {
        self.subscribers
            .read()
            .await
            .get(subscriber_id)
            .map(|info| info.stats.clone())
    }

    async fn deliver_to_subscriber(
        info: &mut SubscriberInfo,
        event: &CenterEvent,
        timeout_duration: Duration,
    ) -> NotificationResult<()> {
        let subscriber_id = info.subscriber.subscriber_id().to_string();

        info.stats.events_received += 1;
        info.stats.last_event_at = Some(SystemTime::now());

        let start_time = Instant::now();
        let result = timeout(timeout_duration, info.subscriber.handle_event(event.clone())).await;
        info.stats.total_processing_time_us += start_time.elapsed().as_micros() as u64;

        match result {
            Ok(Ok(())) => {
                info.stats.events_processed += 1;
                Ok(())
            }
            Ok(Err(e)) => {
                info.stats.processing_failures += 1;
                error!("Subscriber '{}' failed to process event: {}", subscriber_id, e);
                Err(NotificationError::delivery_failed(subscriber_id, e.to_string()))
            }
            Err(_) => {
                info.stats.processing_failures += 1;
                error!("Timeout delivering event to subscriber '{}'", subscriber_id);
                Err(NotificationError::timeout(
                    "event_delivery",
                    timeout_duration.as_millis() as u64,
                ))
            }
        }
    }

    /// Deliver one event to every interested subscriber
    pub async fn dispatch(&self, event: CenterEvent) {
        let mut subscribers = self.subscribers.write().await;
        let mut global_stats = self.global_stats.write().await;
        global_stats.events_published += 1;

        for (subscriber_id, info) in subscribers.iter_mut() {
            if !info.subscriber.event_filter().should_accept(&event) {
                global_stats.events_filtered += 1;
                continue;
            }
            match Self::deliver_to_subscriber(info, &event, self.delivery_timeout).await {
                Ok(()) => global_stats.events_delivered += 1,
                Err(e) => {
                    global_stats.delivery_failures += 1;
                    warn!("Failed to deliver event to '{}': {}", subscriber_id, e);
                }
            }
        }
    }

    /// Start forwarding events from `center` until the hub shuts down
    pub async fn attach(&self, center: &NotificationCenter) {
        let mut receiver = center.events();
        let hub = self.clone();
        let shutdown = self.shutdown.clone();

        let pump = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    received = receiver.recv() => match received {
                        Ok(event) => hub.dispatch(event).await,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Subscriber hub lagged behind, {} events dropped", skipped);
                            hub.global_stats.write().await.events_lagged += skipped;
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = shutdown.cancelled() => break,
                }
            }
            debug!("Subscriber hub detached from notification center");
        });

        self.pumps.lock().await.push(pump);
    }

    /// Deliver already queued events, stop forwarding and drop all subscribers
    pub async fn shutdown(&self) {
        debug!("Shutting down subscriber hub");
        self.shutdown.cancel();

        let pumps: Vec<JoinHandle<()>> = self.pumps.lock().await.drain(..).collect();
        for pump in pumps {
            if let Err(e) = pump.await {
                warn!("Subscriber hub pump ended abnormally: {}", e);
            }
        }

        let mut subscribers = self.subscribers.write().await;
        let count = subscribers.len();
        subscribers.clear();
        debug!("Subscriber hub shutdown complete ({} subscribers removed)", count);
    }
}
