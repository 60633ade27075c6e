pub mod client;
pub mod decoder;
pub mod events;
pub mod options;
pub mod pagination;
pub mod session;
pub mod types;

pub use client::{ClientState, McpClient};
pub use decoder::{Decoder, JsonDecoder, SchemaDecoder};
pub use events::{EventEmitter, ListenerId, NotificationEvent};
pub use options::{adapt, Progress, RequestOptions, SdkRequestOptions};
pub use session::{McpSession, NotificationHandler, Transport, TransportFactory};
