#![allow(dead_code)]

use async_trait::async_trait;
use easy_mcp::error::{McpError, Result};
use easy_mcp::mcp::types::{CallToolParams, LoggingLevel, Notification};
use easy_mcp::mcp::{McpSession, NotificationHandler, SdkRequestOptions, Transport};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug)]
pub struct MockTransport {
    pub url: String,
    pub closed_log: Arc<Mutex<Vec<String>>>,
    pub fail_close: bool,
}

#[async_trait]
impl Transport for MockTransport {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn close(&self) -> Result<()> {
        self.closed_log.lock().push(self.url.clone());
        if self.fail_close {
            return Err(McpError::Connection(format!("close failed: {}", self.url)));
        }
        Ok(())
    }
}

/// Build a transport factory that records closes into `log`. URLs
/// containing "broken-close" fail when closed.
pub fn factory(
    log: Arc<Mutex<Vec<String>>>,
) -> impl Fn(&str) -> Result<MockTransport> + Send + Sync {
    move |url: &str| {
        Ok(MockTransport {
            url: url.to_string(),
            closed_log: Arc::clone(&log),
            fail_close: url.contains("broken-close"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub params: Option<Value>,
    pub had_options: bool,
    pub had_progress: bool,
    pub had_signal: bool,
    pub timeout: Option<std::time::Duration>,
}

/// Scripted session. List methods answer from per-method page queues and
/// `tools/call` knows a fixed set of tools. `cancel_me` and `too_slow` fail
/// the way the SDK reports an aborted or timed-out request.
#[derive(Default)]
pub struct MockSession {
    pub pages: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
    pub handlers: Mutex<HashMap<String, NotificationHandler>>,
    pub connected: Mutex<Vec<String>>,
    pub refuse_connect: bool,
    pub gate: Option<Arc<Notify>>,
    pub logging_level: Mutex<Option<LoggingLevel>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            refuse_connect: true,
            ..Self::default()
        }
    }

    /// A session whose handshake waits until `gate` is notified.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_page(&self, method: &str, page: Value) {
        self.pages
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(page));
    }

    pub fn push_error(&self, method: &str, error: McpError) {
        self.pages
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Err(error));
    }

    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    /// Deliver an inbound notification as the SDK would.
    pub fn notify(&self, method: &str, params: Value) {
        let handler = self.handlers.lock().get(method).cloned();
        if let Some(handler) = handler {
            handler(Notification {
                method: method.to_string(),
                params,
            });
        }
    }

    fn record(&self, method: &str, params: Option<Value>, options: &Option<SdkRequestOptions>) {
        self.requests.lock().push(RecordedRequest {
            method: method.to_string(),
            params,
            had_options: options.is_some(),
            had_progress: options.as_ref().map_or(false, |o| o.onprogress.is_some()),
            had_signal: options.as_ref().map_or(false, |o| o.signal.is_some()),
            timeout: options.as_ref().and_then(|o| o.timeout),
        });
    }
}

#[async_trait]
impl McpSession for MockSession {
    type Transport = MockTransport;

    async fn connect(&self, transport: Arc<MockTransport>) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.refuse_connect {
            return Err(McpError::Connection(format!(
                "handshake refused by {}",
                transport.url
            )));
        }
        self.connected.lock().push(transport.url.clone());
        Ok(())
    }

    async fn request(
        &self,
        method: &str,
        params: Option<Value>,
        options: Option<SdkRequestOptions>,
    ) -> Result<Value> {
        self.record(method, params, &options);
        let next = self
            .pages
            .lock()
            .get_mut(method)
            .and_then(|queue| queue.pop_front());
        next.unwrap_or_else(|| Err(McpError::method_not_found(method)))
    }

    async fn ping(&self, options: Option<SdkRequestOptions>) -> Result<Value> {
        self.record("ping", None, &options);
        Ok(json!({}))
    }

    async fn call_tool(
        &self,
        params: CallToolParams,
        options: Option<SdkRequestOptions>,
    ) -> Result<Value> {
        self.record(
            "tools/call",
            Some(serde_json::to_value(&params).unwrap()),
            &options,
        );

        match params.name.as_str() {
            "echo" => {
                let text = params
                    .arguments
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(json!({"content": [{"type": "text", "text": text}]}))
            }
            "slow_sum" => {
                self.notify(
                    "notifications/progress",
                    json!({"progressToken": 1, "progress": 1, "total": 2}),
                );
                Ok(json!({
                    "content": [{"type": "text", "text": "3"}],
                    "structuredContent": {"sum": 3}
                }))
            }
            "cancel_me" => Err(McpError::Cancelled),
            "too_slow" => Err(McpError::Timeout(Duration::from_millis(1500))),
            other => Err(McpError::protocol(
                easy_mcp::error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", other),
            )),
        }
    }

    async fn set_logging_level(&self, level: LoggingLevel) -> Result<()> {
        *self.logging_level.lock() = Some(level);
        Ok(())
    }

    fn set_notification_handler(&self, method: &str, handler: NotificationHandler) {
        self.handlers.lock().insert(method.to_string(), handler);
    }
}
