//! Backend Gateway port
//!
//! Defines the interface for invoking reasoning backends.

use async_trait::async_trait;
use dxo_domain::BackendId;
use std::time::Duration;
use thiserror::Error;

/// What went wrong in a single backend call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendErrorKind {
    #[error("missing credential")]
    MissingCredential,

    #[error("backend not configured")]
    NotConfigured,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A failed backend call, tagged with the backend that failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{backend}: {kind}")]
pub struct BackendError {
    pub backend: BackendId,
    pub kind: BackendErrorKind,
}

impl BackendError {
    pub fn new(backend: BackendId, kind: BackendErrorKind) -> Self {
        Self { backend, kind }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, BackendErrorKind::Timeout(_))
    }
}

/// Gateway to the reasoning backends
///
/// One call is one stateless completion: no retries, no caching.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Send `prompt` to `backend` and return the generated text
    async fn invoke(
        &self,
        backend: &BackendId,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, BackendError>;

    /// Backends this gateway can reach, in fallback priority order
    fn backends(&self) -> Vec<BackendId>;
}
