use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// JSON-RPC and MCP error codes carried by [`McpError::Protocol`].
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const CONNECTION_CLOSED: i64 = -32000;
    pub const REQUEST_TIMEOUT: i64 = -32001;
}

#[derive(Debug)]
pub enum McpError {
    /// Transport construction or handshake failed.
    Connection(String),
    /// The peer answered with an error, or the session rejected the request.
    Protocol {
        code: i64,
        message: String,
        data: Option<Value>,
    },
    Timeout(Duration),
    Cancelled,
    /// A response did not match the shape its decoder expects.
    Decode(String),
    Json(serde_json::Error),
    NotConnected,
    Closed,
    PaginationLimit {
        method: String,
        max_pages: usize,
    },
    Config(String),
    Other(String),
}

impl McpError {
    pub fn protocol(code: i64, message: impl Into<String>) -> Self {
        McpError::Protocol {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::protocol(
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )
    }

    /// The numeric code a caller can match on, when the error has one.
    pub fn code(&self) -> Option<i64> {
        match self {
            McpError::Protocol { code, .. } => Some(*code),
            McpError::Timeout(_) => Some(error_codes::REQUEST_TIMEOUT),
            McpError::Connection(_) => Some(error_codes::CONNECTION_CLOSED),
            _ => None,
        }
    }

    pub fn is_method_not_found(&self) -> bool {
        self.code() == Some(error_codes::METHOD_NOT_FOUND)
    }
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McpError::Connection(msg) => write!(f, "Connection error: {}", msg),
            McpError::Protocol { code, message, .. } => {
                write!(f, "MCP error {}: {}", code, message)
            }
            McpError::Timeout(after) => write!(f, "Request timed out after {:?}", after),
            McpError::Cancelled => write!(f, "Request cancelled"),
            McpError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            McpError::Json(e) => write!(f, "JSON error: {}", e),
            McpError::NotConnected => write!(f, "Client is not connected"),
            McpError::Closed => write!(f, "Client is closed"),
            McpError::PaginationLimit { method, max_pages } => write!(
                f,
                "Pagination for '{}' exceeded {} pages without exhausting the cursor",
                method, max_pages
            ),
            McpError::Config(msg) => write!(f, "Configuration error: {}", msg),
            McpError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for McpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            McpError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Json(err)
    }
}

impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        McpError::Config(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, McpError>;
