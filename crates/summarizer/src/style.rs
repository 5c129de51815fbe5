//! Normalization of inline `style` attributes into comparison-relevant flags.

/// Extract stacking and overflow hints from an inline style declaration.
///
/// Only properties that influence stacking order or scrollability are kept;
/// everything else in the declaration is ignored.
pub fn style_flags(style: &str) -> Vec<String> {
    let lower = style.to_ascii_lowercase();
    let mut flags = Vec::new();

    for chunk in lower.split(';') {
        let entry = chunk.trim();
        if entry.is_empty() {
            continue;
        }
        let (property, value) = match entry.split_once(':') {
            Some((p, v)) => (p.trim(), v.trim()),
            None => continue,
        };
        match property {
            "z-index" => flags.push(format!("z-index:{value}")),
            "opacity" => flags.push(format!("opacity:{value}")),
            "transform" if value != "none" => flags.push("transform".into()),
            "position" if matches!(value, "fixed" | "sticky") => {
                flags.push(format!("position:{value}"));
            }
            "overflow" | "overflow-x" | "overflow-y" if matches!(value, "auto" | "scroll") => {
                flags.push(format!("overflow:{value}"));
            }
            _ => {}
        }
    }

    flags.sort();
    flags.dedup();
    flags
}

/// True when a flag set marks an element as scrollable or viewport-pinned.
pub fn is_overflow_capable(flags: &[String]) -> bool {
    flags
        .iter()
        .any(|flag| flag.starts_with("overflow:") || flag.starts_with("position:fixed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_stacking_properties_only() {
        let flags = style_flags("color: red; z-index: 10; transform: translateX(2px)");
        assert_eq!(flags, vec!["transform".to_string(), "z-index:10".to_string()]);
    }

    #[test]
    fn overflow_and_fixed_are_capable() {
        assert!(is_overflow_capable(&["overflow:auto".into()]));
        assert!(is_overflow_capable(&["position:fixed".into()]));
        assert!(!is_overflow_capable(&["z-index:2".into()]));
    }

    #[test]
    fn static_overflow_is_ignored() {
        assert!(style_flags("overflow: visible; position: relative").is_empty());
    }
}
