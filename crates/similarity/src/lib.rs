mod aggregate;
pub mod model;

pub use aggregate::similarity;
pub use model::{
    AccessibilityDetail, CoordinateDetail, SimilarityDetails, SimilarityResult, TextLengthDetail,
};
