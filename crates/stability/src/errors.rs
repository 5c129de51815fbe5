use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StabilityError {
    #[error("insufficient samples: got {got}, need at least 2")]
    InsufficientSamples { got: usize },
}
