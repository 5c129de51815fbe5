use layoutlens_matcher::TextComparison;
use serde::{Deserialize, Serialize};

/// Result of one two-snapshot comparison.
///
/// `overall` is a fixed convex combination of the four sub-scores; the
/// weights sum to 1 and are part of the contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub overall: f64,
    pub coordinate: f64,
    pub accessibility: f64,
    pub text: f64,
    pub text_length: f64,
    pub details: SimilarityDetails,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityDetails {
    pub coordinate: CoordinateDetail,
    pub accessibility: AccessibilityDetail,
    pub text: TextComparison,
    pub text_length: TextLengthDetail,
}

/// Supporting numbers behind the coordinate sub-score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateDetail {
    pub total_a: usize,
    pub total_b: usize,
    pub matched: usize,
    pub match_ratio: f64,
    pub avg_position_delta: f64,
    pub avg_size_delta: f64,
    pub position_score: f64,
    pub size_score: f64,
}

/// Supporting numbers behind the accessibility sub-score. A component with
/// zero applicable pairs scores 1 (vacuously similar).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityDetail {
    pub role_pairs: usize,
    pub role_matches: usize,
    pub label_pairs: usize,
    pub label_matches: usize,
    pub state_keys: usize,
    pub state_matches: usize,
    pub role_score: f64,
    pub label_score: f64,
    pub state_score: f64,
}

/// Supporting numbers behind the text-length sub-score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLengthDetail {
    pub total_len_a: usize,
    pub total_len_b: usize,
    pub total_ratio: f64,
    pub pair_ratio: f64,
    pub pairs: usize,
}
