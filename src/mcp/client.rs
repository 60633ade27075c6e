use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use super::decoder::{Decoder, JsonDecoder};
use super::events::{EventEmitter, ListenerId, NotificationBridge, NotificationEvent};
use super::options::{adapt, RequestOptions};
use super::pagination::{fetch_all_pages, PageRequest};
use super::session::{McpSession, Transport, TransportFactory};
use super::types::{
    CallToolParams, CallToolResult, CompleteResult, CompletionArgument, CompletionReference,
    GetPromptResult, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
    ListToolsResult, LoggingLevel, Prompt, ReadResourceResult, Resource, ResourceTemplate, Tool,
    METHOD_COMPLETION_COMPLETE, METHOD_PROMPTS_GET, METHOD_PROMPTS_LIST,
    METHOD_RESOURCES_LIST, METHOD_RESOURCES_READ, METHOD_RESOURCES_SUBSCRIBE,
    METHOD_RESOURCES_UNSUBSCRIBE, METHOD_RESOURCE_TEMPLATES_LIST, METHOD_TOOLS_LIST,
};
use crate::config::ClientConfig;
use crate::error::{McpError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Unconnected,
    Connected,
    Closed,
}

struct Inner<T> {
    state: ClientState,
    transports: Vec<Arc<T>>,
}

/// Facade over an [`McpSession`].
///
/// Each `connect` creates and tracks one more transport. `close` shuts all
/// of them down in the order they were opened.
pub struct McpClient<S, F>
where
    S: McpSession,
    F: TransportFactory<Transport = S::Transport>,
{
    session: S,
    factory: F,
    config: ClientConfig,
    events: Arc<EventEmitter<NotificationEvent>>,
    inner: Mutex<Inner<S::Transport>>,
}

impl<S, F> McpClient<S, F>
where
    S: McpSession,
    F: TransportFactory<Transport = S::Transport>,
{
    pub fn new(session: S, factory: F) -> Self {
        Self::with_config(session, factory, ClientConfig::default())
    }

    pub fn with_config(session: S, factory: F, config: ClientConfig) -> Self {
        let events = Arc::new(EventEmitter::new());
        NotificationBridge::install(&session, Arc::clone(&events));

        Self {
            session,
            factory,
            config,
            events,
            inner: Mutex::new(Inner {
                state: ClientState::Unconnected,
                transports: Vec::new(),
            }),
        }
    }

    pub fn state(&self) -> ClientState {
        self.inner.lock().state
    }

    pub fn transport_count(&self) -> usize {
        self.inner.lock().transports.len()
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn connect(&self, url: &str) -> Result<Arc<S::Transport>> {
        let transport = {
            let mut inner = self.inner.lock();
            if inner.state == ClientState::Closed {
                return Err(McpError::Closed);
            }
            let transport = Arc::new(self.factory.create(url)?);
            inner.transports.push(Arc::clone(&transport));
            transport
        };

        tracing::debug!(endpoint = transport.endpoint(), "connecting");
        self.session.connect(Arc::clone(&transport)).await?;

        let mut inner = self.inner.lock();
        match inner.state {
            // close() ran while the handshake was pending and already shut
            // this transport down
            ClientState::Closed => Err(McpError::Closed),
            ClientState::Unconnected => {
                inner.state = ClientState::Connected;
                tracing::debug!(endpoint = transport.endpoint(), "connected");
                Ok(transport)
            }
            ClientState::Connected => Ok(transport),
        }
    }

    /// Connect to the server URL from the client configuration.
    pub async fn connect_configured(&self) -> Result<Arc<S::Transport>> {
        let url = self
            .config
            .server_url()
            .ok_or_else(|| McpError::Config("No server URL configured".to_string()))?;
        self.connect(&url).await
    }

    pub async fn ping(&self, options: Option<&RequestOptions>) -> Result<()> {
        self.ensure_connected()?;
        self.session.ping(adapt(options)).await?;
        Ok(())
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        options: Option<&RequestOptions>,
    ) -> Result<CallToolResult> {
        self.call_tool_with(name, arguments, &JsonDecoder::<CallToolResult>::new(), options)
            .await
    }

    /// Like [`call_tool`](Self::call_tool) but decodes the result with a
    /// caller-supplied decoder.
    pub async fn call_tool_with<D: Decoder>(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        decoder: &D,
        options: Option<&RequestOptions>,
    ) -> Result<D::Output> {
        self.ensure_connected()?;
        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };
        let raw = self.session.call_tool(params, adapt(options)).await?;
        decoder.decode(raw)
    }

    pub async fn list_tools(&self, options: Option<&RequestOptions>) -> Result<Vec<Tool>> {
        self.fetch_all::<ListToolsResult, _, _>(METHOD_TOOLS_LIST, |page| page.tools, options)
            .await
    }

    pub async fn list_resources(&self, options: Option<&RequestOptions>) -> Result<Vec<Resource>> {
        self.fetch_all::<ListResourcesResult, _, _>(
            METHOD_RESOURCES_LIST,
            |page| page.resources,
            options,
        )
        .await
    }

    pub async fn list_resource_templates(
        &self,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<ResourceTemplate>> {
        self.fetch_all::<ListResourceTemplatesResult, _, _>(
            METHOD_RESOURCE_TEMPLATES_LIST,
            |page| page.resource_templates,
            options,
        )
        .await
    }

    pub async fn list_prompts(&self, options: Option<&RequestOptions>) -> Result<Vec<Prompt>> {
        self.fetch_all::<ListPromptsResult, _, _>(METHOD_PROMPTS_LIST, |page| page.prompts, options)
            .await
    }

    pub async fn read_resource(
        &self,
        uri: &str,
        options: Option<&RequestOptions>,
    ) -> Result<ReadResourceResult> {
        self.request(METHOD_RESOURCES_READ, json!({ "uri": uri }), options)
            .await
    }

    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        options: Option<&RequestOptions>,
    ) -> Result<GetPromptResult> {
        self.request(
            METHOD_PROMPTS_GET,
            json!({ "name": name, "arguments": arguments }),
            options,
        )
        .await
    }

    pub async fn complete(
        &self,
        reference: CompletionReference,
        argument: CompletionArgument,
        options: Option<&RequestOptions>,
    ) -> Result<CompleteResult> {
        self.request(
            METHOD_COMPLETION_COMPLETE,
            json!({ "ref": reference, "argument": argument }),
            options,
        )
        .await
    }

    pub async fn subscribe_resource(&self, uri: &str) -> Result<()> {
        self.request::<Value>(METHOD_RESOURCES_SUBSCRIBE, json!({ "uri": uri }), None)
            .await?;
        Ok(())
    }

    pub async fn unsubscribe_resource(&self, uri: &str) -> Result<()> {
        self.request::<Value>(METHOD_RESOURCES_UNSUBSCRIBE, json!({ "uri": uri }), None)
            .await?;
        Ok(())
    }

    pub async fn set_logging_level(&self, level: LoggingLevel) -> Result<()> {
        self.ensure_connected()?;
        self.session.set_logging_level(level).await
    }

    /// Listen for progress and logging notifications from the server.
    pub fn on_notification<L>(&self, listener: L) -> ListenerId
    where
        L: Fn(&NotificationEvent) + Send + Sync + 'static,
    {
        self.events.on(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Close every transport this client opened, oldest first.
    ///
    /// All transports are attempted even if one fails. The first failure
    /// is returned once they have all been tried.
    pub async fn close(&self) -> Result<()> {
        let transports = {
            let mut inner = self.inner.lock();
            inner.state = ClientState::Closed;
            std::mem::take(&mut inner.transports)
        };

        let mut first_error = None;
        for transport in transports {
            tracing::debug!(endpoint = transport.endpoint(), "closing transport");
            if let Err(e) = transport.close().await {
                tracing::warn!(endpoint = transport.endpoint(), error = %e, "failed to close transport");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        match self.inner.lock().state {
            ClientState::Connected => Ok(()),
            ClientState::Unconnected => Err(McpError::NotConnected),
            ClientState::Closed => Err(McpError::Closed),
        }
    }

    async fn request<R>(
        &self,
        method: &str,
        params: Value,
        options: Option<&RequestOptions>,
    ) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        self.ensure_connected()?;
        let raw = self
            .session
            .request(method, Some(params), adapt(options))
            .await?;
        JsonDecoder::<R>::new().decode(raw)
    }

    async fn fetch_all<P, T, X>(
        &self,
        method: &str,
        extract: X,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<T>>
    where
        P: serde::de::DeserializeOwned + super::types::Paginated,
        X: FnMut(P) -> Vec<T>,
    {
        self.ensure_connected()?;
        let params = Map::new();
        fetch_all_pages(
            &self.session,
            PageRequest {
                method,
                params: &params,
                max_pages: self.config.pagination.max_pages(),
            },
            &JsonDecoder::<P>::new(),
            extract,
            options,
        )
        .await
    }
}
