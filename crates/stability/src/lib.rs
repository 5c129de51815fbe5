mod analyzer;
pub mod errors;
pub mod model;

pub use analyzer::analyze;
pub use errors::StabilityError;
pub use model::{NodeVariation, PositionBucket, StabilityReport, STABLE_THRESHOLD};
