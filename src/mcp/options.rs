//! Caller-facing request options and their translation into the shape the
//! session expects.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One progress report for an in-flight request.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub progress: f64,
    pub total: Option<f64>,
    pub message: Option<String>,
}

pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

#[derive(Clone, Default)]
pub struct RequestOptions {
    pub on_progress: Option<ProgressCallback>,
    pub signal: Option<CancellationToken>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("on_progress", &self.on_progress.is_some())
            .field("signal", &self.signal)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Options in the form a session consumes for a single delegated call.
#[derive(Clone, Default)]
pub struct SdkRequestOptions {
    pub onprogress: Option<ProgressCallback>,
    pub signal: Option<CancellationToken>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for SdkRequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkRequestOptions")
            .field("onprogress", &self.onprogress.is_some())
            .field("signal", &self.signal)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Map caller options onto session options. `None` stays `None` so the
/// session falls back to its own defaults.
pub fn adapt(options: Option<&RequestOptions>) -> Option<SdkRequestOptions> {
    options.map(|o| SdkRequestOptions {
        onprogress: o.on_progress.clone(),
        signal: o.signal.clone(),
        timeout: o.timeout,
    })
}
