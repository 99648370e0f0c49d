//! Single-slot notification manager
//!
//! At most one notification is live at a time. Showing a new one replaces the
//! current one and cancels its pending expiry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Where notification text ends up
pub trait NotificationSink: Send + Sync {
    fn display(&self, text: &str);

    /// Called when a notification expires without being replaced
    fn dismiss(&self, _text: &str) {}
}

/// Prints notifications to stdout
pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn display(&self, text: &str) {
        println!("{text}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
}

struct Active {
    notification: Notification,
    expiry: JoinHandle<()>,
}

#[derive(Default)]
struct Slot {
    next_id: u64,
    active: Option<Active>,
}

pub struct NotificationManager {
    slot: Arc<Mutex<Slot>>,
    sink: Arc<dyn NotificationSink>,
    display_for: Duration,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl NotificationManager {
    pub fn new(sink: Arc<dyn NotificationSink>, display_for: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            sink,
            display_for,
        }
    }

    /// Replace the live notification with `text` and schedule its expiry.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, text: impl Into<String>) -> Notification {
        let mut slot = lock(&self.slot);
        slot.next_id += 1;
        let notification = Notification {
            id: slot.next_id,
            text: text.into(),
        };

        if let Some(previous) = slot.active.take() {
            previous.expiry.abort();
            debug!("Replacing notification {}", previous.notification.id);
        }

        self.sink.display(&notification.text);

        let expiry = {
            let slot = Arc::clone(&self.slot);
            let sink = Arc::clone(&self.sink);
            let id = notification.id;
            let delay = self.display_for;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let mut slot = lock(&slot);
                // a newer notification owns the slot now
                if slot.active.as_ref().is_some_and(|a| a.notification.id == id) {
                    if let Some(expired) = slot.active.take() {
                        debug!("Notification {} expired", id);
                        sink.dismiss(&expired.notification.text);
                    }
                }
            })
        };

        slot.active = Some(Active {
            notification: notification.clone(),
            expiry,
        });
        notification
    }

    /// Text of the live notification, if any
    #[must_use]
    pub fn current(&self) -> Option<String> {
        lock(&self.slot)
            .active
            .as_ref()
            .map(|active| active.notification.text.clone())
    }

    /// Remove the live notification immediately
    pub fn clear(&self) {
        if let Some(active) = lock(&self.slot).active.take() {
            active.expiry.abort();
        }
    }
}

impl Drop for NotificationManager {
    fn drop(&mut self) {
        self.clear();
    }
}
