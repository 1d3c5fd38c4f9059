//! Thread-safe queue for platform DPI notifications using mpsc channels.
//!
//! - Any thread can post via `NotificationSender::post()`
//! - The UI thread polls via `NotificationQueue::drain()`
//!
//! The queue is the only part of the core that crosses threads. Everything
//! the drained notifications touch stays on the UI thread.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::types::DpiNotification;

/// Multi-producer, single-consumer queue of [`DpiNotification`]s.
///
/// # Example
///
/// ```
/// use zoomscale::events::{DpiNotification, NotificationQueue};
/// use zoomscale::zoom::MonitorId;
///
/// let queue = NotificationQueue::new();
/// let sender = queue.sender();
///
/// sender.post(DpiNotification { monitor: MonitorId::PRIMARY, dpi: 144 });
///
/// let pending = queue.drain();
/// assert_eq!(pending.len(), 1);
/// ```
pub struct NotificationQueue {
    sender: Sender<DpiNotification>,
    receiver: Receiver<DpiNotification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Get a sender handle that can be cloned and moved to other threads.
    pub fn sender(&self) -> NotificationSender {
        NotificationSender {
            sender: self.sender.clone(),
        }
    }

    /// Try to receive the next notification without blocking.
    pub fn try_recv(&self) -> Option<DpiNotification> {
        match self.receiver.try_recv() {
            Ok(notification) => Some(notification),
            // The queue holds its own sender, so it never disconnects
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all pending notifications, oldest first.
    pub fn drain(&self) -> Vec<DpiNotification> {
        let mut pending = Vec::new();
        while let Some(notification) = self.try_recv() {
            pending.push(notification);
        }
        pending
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe handle for posting DPI notifications.
#[derive(Clone)]
pub struct NotificationSender {
    sender: Sender<DpiNotification>,
}

impl NotificationSender {
    /// Queue a notification for the next drain on the UI thread.
    ///
    /// If the queue has been dropped (session torn down) the send silently
    /// fails.
    pub fn post(&self, notification: DpiNotification) {
        let _ = self.sender.send(notification);
    }
}
