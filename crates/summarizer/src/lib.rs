pub mod classify;
pub mod errors;
pub mod style;
mod summarize;

pub use classify::classify;
pub use errors::SummarizeError;
pub use summarize::{summarize, summarize_tree, GROUP_RADIUS_PX, MAX_TEXT_LEN};
