//! The contract an MCP SDK fulfils to sit underneath [`McpClient`].
//!
//! The facade owns no protocol logic. Everything that touches the wire,
//! including handshakes, framing, timeouts and cancellation, happens behind
//! these traits.
//!
//! [`McpClient`]: super::client::McpClient

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::options::SdkRequestOptions;
use super::types::{CallToolParams, LoggingLevel, Notification};
use crate::error::Result;

pub type NotificationHandler = Arc<dyn Fn(Notification) + Send + Sync>;

/// One connection to a remote endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    fn endpoint(&self) -> &str;

    /// Closing a transport that is already closed must succeed.
    async fn close(&self) -> Result<()>;
}

/// Builds transports from an endpoint address.
pub trait TransportFactory: Send + Sync {
    type Transport: Transport;

    fn create(&self, url: &str) -> Result<Self::Transport>;
}

impl<T, F> TransportFactory for F
where
    T: Transport,
    F: Fn(&str) -> Result<T> + Send + Sync,
{
    type Transport = T;

    fn create(&self, url: &str) -> Result<T> {
        self(url)
    }
}

#[async_trait]
pub trait McpSession: Send + Sync {
    type Transport: Transport;

    /// Runs the initialize handshake over `transport`.
    async fn connect(&self, transport: Arc<Self::Transport>) -> Result<()>;

    async fn request(
        &self,
        method: &str,
        params: Option<Value>,
        options: Option<SdkRequestOptions>,
    ) -> Result<Value>;

    async fn ping(&self, options: Option<SdkRequestOptions>) -> Result<Value>;

    async fn call_tool(
        &self,
        params: CallToolParams,
        options: Option<SdkRequestOptions>,
    ) -> Result<Value>;

    async fn set_logging_level(&self, level: LoggingLevel) -> Result<()>;

    /// Route every inbound notification named `method` to `handler`,
    /// replacing any handler previously set for it.
    fn set_notification_handler(&self, method: &str, handler: NotificationHandler);
}
