//! A convenience facade over an MCP client SDK.
//!
//! [`McpClient`] wraps any [`McpSession`] implementation and adds a simpler
//! connect/call/list surface, cursor-following list operations and typed
//! re-emission of progress and logging notifications.

pub mod config;
pub mod error;
pub mod mcp;

pub use config::ClientConfig;
pub use error::{error_codes, McpError, Result};
pub use mcp::{
    ClientState, McpClient, McpSession, NotificationEvent, RequestOptions, Transport,
    TransportFactory,
};
