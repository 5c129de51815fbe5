mod calibrate;
pub mod model;

pub use calibrate::calibrate;
pub use model::{CalibrationOptions, CalibrationSettings, Strictness, ToleranceScale};
