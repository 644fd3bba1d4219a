//! Positioning strategy for the bar.

use crate::host::Document;
use crate::settings::Direction;
use serde::Serialize;

const VENDOR_PREFIXES: &[&str] = &["", "Webkit", "Moz", "O", "ms"];

/// How the bar's offset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Positioning {
    /// `transform: translate3d(x,0,0)`, composited.
    Translate3d,
    /// `transform: translate(x,0)`.
    Translate,
    /// `margin-left: x`.
    Margin,
}

impl Positioning {
    /// Pick the best strategy the document supports. Not cached: hosts may
    /// answer differently over time.
    pub fn detect(document: &dyn Document) -> Self {
        if supports_any(document, "perspective") {
            Positioning::Translate3d
        } else if supports_any(document, "transform") {
            Positioning::Translate
        } else {
            Positioning::Margin
        }
    }

    /// The style declaration placing the bar at `offset` percent.
    pub fn declaration(self, offset: f64) -> (&'static str, String) {
        let pct = percent(offset);
        match self {
            Positioning::Translate3d => ("transform", format!("translate3d({pct},0,0)")),
            Positioning::Translate => ("transform", format!("translate({pct},0)")),
            Positioning::Margin => ("margin-left", pct),
        }
    }
}

/// Horizontal offset, in percent of the bar width, for a progress value.
pub fn bar_offset(value: f64, dir: Direction) -> f64 {
    match dir {
        Direction::Ltr => (value - 1.0) * 100.0,
        Direction::Rtl => (1.0 - value) * 100.0,
    }
}

fn supports_any(document: &dyn Document, property: &str) -> bool {
    VENDOR_PREFIXES
        .iter()
        .any(|prefix| document.supports_style(&prefixed(prefix, property)))
}

fn prefixed(prefix: &str, property: &str) -> String {
    if prefix.is_empty() {
        return property.to_string();
    }
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("{prefix}{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

fn percent(offset: f64) -> String {
    let fixed = format!("{offset:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0%".to_string()
    } else {
        format!("{trimmed}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryDocument;

    #[test]
    fn test_detect_prefers_3d() {
        let doc = MemoryDocument::with_style_properties(["perspective", "transform"]);
        assert_eq!(Positioning::detect(&doc), Positioning::Translate3d);
    }

    #[test]
    fn test_detect_vendor_prefixed() {
        let doc = MemoryDocument::with_style_properties(["WebkitPerspective"]);
        assert_eq!(Positioning::detect(&doc), Positioning::Translate3d);
        let doc = MemoryDocument::with_style_properties(["msTransform"]);
        assert_eq!(Positioning::detect(&doc), Positioning::Translate);
    }

    #[test]
    fn test_detect_falls_back_to_margin() {
        let doc = MemoryDocument::with_style_properties([]);
        assert_eq!(Positioning::detect(&doc), Positioning::Margin);
    }

    #[test]
    fn test_offsets_and_declarations() {
        assert_eq!(
            Positioning::Translate3d.declaration(bar_offset(0.08, Direction::Ltr)),
            ("transform", "translate3d(-92%,0,0)".to_string())
        );
        assert_eq!(
            Positioning::Translate.declaration(bar_offset(0.5, Direction::Rtl)),
            ("transform", "translate(50%,0)".to_string())
        );
        assert_eq!(
            Positioning::Margin.declaration(bar_offset(1.0, Direction::Rtl)),
            ("margin-left", "0%".to_string())
        );
        assert_eq!(percent(-12.3456), "-12.346%");
    }
}
