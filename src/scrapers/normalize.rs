//! Text normalization for extracted fields.
//!
//! Absent values stay `None` all the way to the row assembler, which is the
//! only place a sentinel is substituted. An element that exists but holds no
//! text normalizes to the empty string, not to a sentinel.

use crate::models::Field;
use clap::ValueEnum;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Rate suffix attached to the hourly comment counter ("per hour").
pub const COMMENT_NOISE: &str = "件/時";

/// Sentinel for a missing comment counter, whatever the sentinel style.
pub const NOT_AVAILABLE: &str = "N/A";

/// Trimmed text content of a node.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed `href` of a link node; a link without `href` counts as absent.
pub fn element_href(element: ElementRef<'_>) -> Option<String> {
    element.value().attr("href").map(|href| href.trim().to_string())
}

/// Strip every `件/時` from a comment counter and trim what is left.
///
/// Idempotent: applying it to its own output changes nothing.
pub fn normalize_comment(raw: &str) -> String {
    raw.replace(COMMENT_NOISE, "").trim().to_string()
}

/// How missing optional fields are spelled in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SentinelStyle {
    /// `No rank`, `No title`, `No media`, `No date`, `No link`
    #[default]
    Descriptive,
    /// `N/A` for every field
    Na,
}

impl SentinelStyle {
    /// Placeholder for `field` when it could not be extracted.
    pub fn sentinel(self, field: Field) -> String {
        if field == Field::Comment {
            return NOT_AVAILABLE.to_string();
        }
        match self {
            SentinelStyle::Descriptive => format!("No {}", field.name()),
            SentinelStyle::Na => NOT_AVAILABLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_normalize_comment_strips_suffix() {
        assert_eq!(normalize_comment("120件/時"), "120");
        assert_eq!(normalize_comment("  1,024件/時 \n"), "1,024");
        assert_eq!(normalize_comment("件/時5件/時"), "5");
    }

    #[test]
    fn test_normalize_comment_is_idempotent() {
        for raw in ["120件/時", " 42 ", "件/時", "N/A", "7 件/時 件/時"] {
            let once = normalize_comment(raw);
            assert_eq!(normalize_comment(&once), once);
            assert!(!once.contains(COMMENT_NOISE));
        }
    }

    #[test]
    fn test_sentinels() {
        let d = SentinelStyle::Descriptive;
        assert_eq!(d.sentinel(Field::Date), "No date");
        assert_eq!(d.sentinel(Field::Media), "No media");
        assert_eq!(d.sentinel(Field::Comment), "N/A");
        assert_eq!(SentinelStyle::Na.sentinel(Field::Title), "N/A");
        assert_eq!(SentinelStyle::Na.sentinel(Field::Comment), "N/A");
    }

    #[test]
    fn test_element_text_and_href() {
        let html = Html::parse_fragment(
            r#"<a class="x" href="  https://news.yahoo.co.jp/articles/1 ">
                 <span> 見出し </span>
               </a><a class="y">no href</a>"#,
        );
        let x = Selector::parse("a.x").unwrap();
        let y = Selector::parse("a.y").unwrap();
        let a = html.select(&x).next().unwrap();
        assert_eq!(element_text(a), "見出し");
        assert_eq!(
            element_href(a).as_deref(),
            Some("https://news.yahoo.co.jp/articles/1")
        );
        assert_eq!(element_href(html.select(&y).next().unwrap()), None);
    }
}
