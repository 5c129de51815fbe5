use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Axis-aligned rectangle in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Euclidean distance between the origins of two rectangles.
    pub fn origin_distance(&self, other: &Rect) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Euclidean norm of the width/height difference.
    pub fn size_delta(&self, other: &Rect) -> f64 {
        (self.width - other.width).hypot(self.height - other.height)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Size of the viewport a layout was captured under.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Accessibility attributes extracted alongside an element.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AriaProps {
    pub role: Option<String>,
    pub label: Option<String>,
    pub labelledby: Option<String>,
    pub describedby: Option<String>,
    pub hidden: Option<bool>,
    pub expanded: Option<bool>,
    pub selected: Option<bool>,
    pub checked: Option<bool>,
    pub disabled: Option<bool>,
    pub value_now: Option<f64>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
    pub tab_index: Option<i32>,
}

impl AriaProps {
    /// Boolean states keyed by attribute name, only where a value was observed.
    pub fn bool_states(&self) -> BTreeMap<String, bool> {
        let mut states = BTreeMap::new();
        let entries = [
            ("hidden", self.hidden),
            ("expanded", self.expanded),
            ("selected", self.selected),
            ("checked", self.checked),
            ("disabled", self.disabled),
        ];
        for (key, value) in entries {
            if let Some(flag) = value {
                states.insert(key.to_string(), flag);
            }
        }
        states
    }
}

/// One element of the raw tree handed over by the capture collaborator.
///
/// The parent exclusively owns its children; the tree is acyclic by
/// construction since it is derived from a DOM traversal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawElement {
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    pub text: Option<String>,
    pub rect: Rect,
    pub visible: bool,
    pub opacity: f64,
    pub aria: AriaProps,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<RawElement>,
}

impl RawElement {
    pub fn new(tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            tag: tag.into(),
            rect,
            visible: true,
            opacity: 1.0,
            ..Default::default()
        }
    }
}

/// Coarse role classification of a summarized node.
///
/// Classification rules are evaluated top-to-bottom in this order; the order
/// is part of the observable contract.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Heading,
    Navigation,
    Interactive,
    Media,
    List,
    Table,
    Content,
    Structural,
}

impl SemanticType {
    pub fn base_importance(&self) -> u8 {
        match self {
            SemanticType::Heading => 80,
            SemanticType::Navigation => 70,
            SemanticType::Interactive => 60,
            SemanticType::Content => 50,
            SemanticType::Media => 40,
            SemanticType::List | SemanticType::Table => 30,
            SemanticType::Structural => 20,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Heading => "heading",
            SemanticType::Navigation => "navigation",
            SemanticType::Interactive => "interactive",
            SemanticType::Media => "media",
            SemanticType::List => "list",
            SemanticType::Table => "table",
            SemanticType::Content => "content",
            SemanticType::Structural => "structural",
        };
        f.write_str(name)
    }
}

/// Flattened, classified view of one element.
///
/// Created once per summarization run and immutable afterwards;
/// re-summarization produces a fresh set. The `id` is deterministic within a
/// run (traversal ordinal) but not guaranteed stable across independent
/// captures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummarizedNode {
    pub id: String,
    pub dom_id: Option<String>,
    pub tag: String,
    pub role: Option<String>,
    pub class: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
    pub aria_describedby: Option<String>,
    pub states: BTreeMap<String, bool>,
    pub text: Option<String>,
    pub rect: Rect,
    pub semantic_type: SemanticType,
    pub importance: u8,
    pub child_count: usize,
    pub visible: bool,
    pub opacity: f64,
    pub style_flags: Vec<String>,
    pub descendant_signature: Vec<String>,
}

impl SummarizedNode {
    pub fn class_tokens(&self) -> Vec<&str> {
        self.class
            .as_deref()
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn text_len(&self) -> usize {
        self.text.as_deref().map(str::len).unwrap_or(0)
    }
}

/// Spatial cluster of nodes sharing a semantic type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeGroup {
    pub group_type: SemanticType,
    pub bounds: Rect,
    pub members: Vec<String>,
}

/// Identifier of one capture's summary.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SummaryId(pub String);

impl SummaryId {
    pub fn new() -> Self {
        SummaryId(Uuid::new_v4().to_string())
    }
}

impl Default for SummaryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SummaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level artifact of one capture: the summarized nodes, their spatial
/// groups, and the viewport the page was rendered under. Read-only for all
/// downstream components.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub id: SummaryId,
    pub viewport: Viewport,
    pub nodes: Vec<SummarizedNode>,
    pub groups: Vec<NodeGroup>,
}

impl LayoutSummary {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&SummarizedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(50.0, 25.0, 100.0, 50.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 150.0, 75.0));
    }

    #[test]
    fn rect_origin_distance_is_euclidean() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(3.0, 4.0, 10.0, 10.0);
        assert!((a.origin_distance(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn aria_bool_states_skips_unobserved() {
        let aria = AriaProps {
            hidden: Some(false),
            expanded: Some(true),
            ..Default::default()
        };
        let states = aria.bool_states();
        assert_eq!(states.len(), 2);
        assert_eq!(states.get("expanded"), Some(&true));
        assert!(!states.contains_key("checked"));
    }

    #[test]
    fn summary_round_trips_through_json() {
        let summary = LayoutSummary {
            id: SummaryId::new(),
            viewport: Viewport::new(1280, 720),
            nodes: Vec::new(),
            groups: Vec::new(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: LayoutSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
    }
}
