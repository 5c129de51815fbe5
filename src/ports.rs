use async_trait::async_trait;
use layoutlens_core_types::{RawElement, Viewport};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("capture unavailable: {0}")]
    Unavailable(String),
    #[error("capture failed: {0}")]
    Failed(String),
}

impl CaptureError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Port the browser-extraction collaborator implements.
///
/// One call renders the named test case at the given viewport and returns the
/// extracted element tree. The engine never drives a browser itself.
#[async_trait]
pub trait LayoutCapturePort: Send + Sync {
    async fn capture(&self, case_id: &str, viewport: Viewport)
        -> Result<RawElement, CaptureError>;
}
