pub mod coordinate;
pub mod model;
pub mod semantic;
pub mod text;

pub use coordinate::{match_nodes, unclaimed_in_b, ACCEPT_THRESHOLD};
pub use model::{Correspondence, MatchReason};
pub use semantic::{match_semantic, GROUP_ACCEPT_THRESHOLD};
pub use text::{compare_texts, levenshtein, text_similarity, TextComparison};
