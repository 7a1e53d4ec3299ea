//! Data models for genres and captured ranking rows.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Genre`]: One topical ranking page on the portal
//! - [`Field`]: The semantic fields extracted from a single listing entry
//! - [`Record`]: One persisted CSV row
//!
//! Genres are fixed at startup and never mutated. Records are produced one per
//! extracted listing entry and are immutable once assembled.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A topical news category with its own ranking page.
///
/// # Fields
///
/// * `code` - Machine-readable English id, used in file names (e.g. `world`)
/// * `label` - Display name as shown on the portal (e.g. `国際`)
/// * `url` - The comment ranking page for this genre
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Genre {
    pub code: String,
    pub label: String,
    pub url: Url,
}

impl Genre {
    pub fn new(code: &str, label: &str, url: Url) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            url,
        }
    }
}

/// The semantic fields of a listing entry.
///
/// Every field has its own selector candidates and its own failure policy.
/// `Comment` is the hourly comment counter shown next to each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Rank,
    Title,
    Media,
    Date,
    Link,
    Comment,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Rank,
        Field::Title,
        Field::Media,
        Field::Date,
        Field::Link,
        Field::Comment,
    ];

    /// Position of the field in [`Field::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Rank => "rank",
            Field::Title => "title",
            Field::Media => "media",
            Field::Date => "date",
            Field::Link => "link",
            Field::Comment => "comment",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single captured ranking row.
///
/// The serialized column order is the output contract of every CSV file and
/// must not change:
///
/// ```text
/// capture_date,capture_time,genre_code,genre_label,rank,media,title,comment_count,link,published_date_original
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    /// Capture date in `YYYY-MM-DD`, shared by every row of a run.
    pub capture_date: String,
    /// Capture time in `HH:MM`, shared by every row of a run.
    pub capture_time: String,
    pub genre_code: String,
    pub genre_label: String,
    pub rank: String,
    /// Publishing outlet name.
    pub media: String,
    pub title: String,
    /// Hourly comment count with the `件/時` suffix removed, or `N/A`.
    pub comment_count: String,
    pub link: String,
    /// Publication date exactly as displayed on the page.
    #[serde(rename = "published_date_original")]
    pub published_date: String,
}

impl Record {
    /// CSV header names, in column order.
    pub const HEADERS: [&'static str; 10] = [
        "capture_date",
        "capture_time",
        "genre_code",
        "genre_label",
        "rank",
        "media",
        "title",
        "comment_count",
        "link",
        "published_date_original",
    ];

    /// The row as an ordered array of column values.
    pub fn columns(&self) -> [&str; 10] {
        [
            &self.capture_date,
            &self.capture_time,
            &self.genre_code,
            &self.genre_label,
            &self.rank,
            &self.media,
            &self.title,
            &self.comment_count,
            &self.link,
            &self.published_date,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            capture_date: "2025-05-06".into(),
            capture_time: "09:05".into(),
            genre_code: "world".into(),
            genre_label: "国際".into(),
            rank: "1".into(),
            media: "共同通信".into(),
            title: "Title".into(),
            comment_count: "120".into(),
            link: "https://news.yahoo.co.jp/articles/abc".into(),
            published_date: "5/6(火) 8:12".into(),
        }
    }

    #[test]
    fn test_columns_follow_header_order() {
        let record = sample();
        let columns = record.columns();
        assert_eq!(columns.len(), Record::HEADERS.len());
        assert_eq!(columns[0], "2025-05-06");
        assert_eq!(columns[2], "world");
        assert_eq!(columns[7], "120");
        assert_eq!(columns[9], "5/6(火) 8:12");
    }

    #[test]
    fn test_field_names() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["rank", "title", "media", "date", "link", "comment"]);
        assert_eq!(Field::Date.to_string(), "date");
    }
}
