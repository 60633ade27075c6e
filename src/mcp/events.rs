//! Typed re-emission of inbound session notifications.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::session::McpSession;
use super::types::{
    LoggingLevel, LoggingMessageNotification, Notification, ProgressNotification, ProgressToken,
    NOTIFICATION_MESSAGE, NOTIFICATION_PROGRESS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Observer list owned by a single client.
pub struct EventEmitter<E> {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Listener<E>)>>,
}

impl<E> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Returns false when `id` was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Call every listener, in registration order, before returning.
    pub fn emit(&self, event: &E) {
        // Snapshot so listeners can register or unregister while we dispatch.
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "progressToken")]
    pub progress_token: ProgressToken,
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingMessageEvent {
    pub level: LoggingLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationEvent {
    Progress(ProgressEvent),
    LoggingMessage(LoggingMessageEvent),
}

impl From<ProgressNotification> for NotificationEvent {
    fn from(n: ProgressNotification) -> Self {
        NotificationEvent::Progress(ProgressEvent {
            progress_token: n.progress_token,
            progress: n.progress,
            total: n.total,
        })
    }
}

impl From<LoggingMessageNotification> for NotificationEvent {
    fn from(n: LoggingMessageNotification) -> Self {
        NotificationEvent::LoggingMessage(LoggingMessageEvent {
            level: n.level,
            logger: n.logger,
            data: n.data,
        })
    }
}

pub struct NotificationBridge;

impl NotificationBridge {
    /// Register the progress and logging handlers with `session`. Each
    /// inbound message is decoded and emitted as it arrives.
    pub fn install<S>(session: &S, emitter: Arc<EventEmitter<NotificationEvent>>)
    where
        S: McpSession + ?Sized,
    {
        let progress = Arc::clone(&emitter);
        session.set_notification_handler(
            NOTIFICATION_PROGRESS,
            Arc::new(move |n: Notification| {
                forward::<ProgressNotification>(&progress, n);
            }),
        );

        session.set_notification_handler(
            NOTIFICATION_MESSAGE,
            Arc::new(move |n: Notification| {
                forward::<LoggingMessageNotification>(&emitter, n);
            }),
        );
    }
}

fn forward<N>(emitter: &EventEmitter<NotificationEvent>, notification: Notification)
where
    N: serde::de::DeserializeOwned + Into<NotificationEvent>,
{
    match serde_json::from_value::<N>(notification.params) {
        Ok(params) => {
            tracing::trace!(method = %notification.method, "re-emitting notification");
            emitter.emit(&params.into());
        }
        Err(e) => {
            tracing::warn!(
                method = %notification.method,
                error = %e,
                "dropping malformed notification"
            );
        }
    }
}
