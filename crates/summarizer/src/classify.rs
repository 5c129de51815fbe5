use layoutlens_core_types::SemanticType;

const INTERACTIVE_TAGS: &[&str] = &["button", "a", "input", "textarea", "select", "form"];
const INTERACTIVE_ROLES: &[&str] = &[
    "button", "link", "checkbox", "radio", "textbox", "combobox", "tab", "menuitem",
];
const MEDIA_TAGS: &[&str] = &["img", "video", "audio", "svg", "picture"];
const LIST_TAGS: &[&str] = &["ul", "ol", "li"];
const TABLE_TAGS: &[&str] = &["table", "thead", "tbody", "tr", "td", "th"];
const CONTENT_TAGS: &[&str] = &["p", "article", "section", "main"];

/// Classify an element into its coarse semantic type.
///
/// Rules are evaluated top-to-bottom and the first match wins; the order is a
/// contract, not an implementation detail.
pub fn classify(
    tag: &str,
    role: Option<&str>,
    class: Option<&str>,
    text: Option<&str>,
) -> SemanticType {
    let tag = tag.to_ascii_lowercase();
    let role = role.map(str::to_ascii_lowercase);
    let role = role.as_deref();
    let class_lower = class.map(str::to_ascii_lowercase);
    let class_lower = class_lower.as_deref().unwrap_or("");

    if is_heading_tag(&tag) || role == Some("heading") {
        return SemanticType::Heading;
    }
    if tag == "nav"
        || role == Some("navigation")
        || class_lower.contains("nav")
        || class_lower.contains("menu")
    {
        return SemanticType::Navigation;
    }
    if INTERACTIVE_TAGS.contains(&tag.as_str())
        || role.map_or(false, |r| INTERACTIVE_ROLES.contains(&r))
    {
        return SemanticType::Interactive;
    }
    if MEDIA_TAGS.contains(&tag.as_str()) {
        return SemanticType::Media;
    }
    if LIST_TAGS.contains(&tag.as_str()) {
        return SemanticType::List;
    }
    if TABLE_TAGS.contains(&tag.as_str()) {
        return SemanticType::Table;
    }
    if CONTENT_TAGS.contains(&tag.as_str()) || text.map_or(false, |t| !t.trim().is_empty()) {
        return SemanticType::Content;
    }
    SemanticType::Structural
}

fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}
