use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SummarizeError {
    #[error("viewport has zero area: {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
}
