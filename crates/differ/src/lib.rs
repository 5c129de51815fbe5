mod differ;
pub mod model;

pub use differ::diff;
pub use model::{
    ChangedAttribute, DiffOptions, DiffPattern, LayoutDiff, NodeChange, Severity,
};
