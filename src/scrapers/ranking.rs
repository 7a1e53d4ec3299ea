//! Comment ranking page extraction.
//!
//! Turns one ranking page into rows: locate the listing entries, resolve the
//! fields of each entry through the [`SelectorProfile`], normalize them, and
//! assemble a [`Record`] stamped with the run's capture time and genre.
//!
//! Each entry yields an [`ItemOutcome`]. A missing required field produces
//! [`ItemOutcome::Skipped`] with the reason; what to do about it (drop the
//! entry or fail the genre) is decided by the caller.

use crate::clock::CaptureStamp;
use crate::error::ExtractionError;
use crate::models::{Field, Genre, Record};
use crate::scrapers::normalize::{SentinelStyle, element_href, element_text, normalize_comment};
use crate::scrapers::selectors::{ResolvedItem, SelectorProfile};
use scraper::{ElementRef, Html};
use tracing::{debug, instrument};

/// Which fields must be present and how missing optional ones are spelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRules {
    pub required: Vec<Field>,
    pub sentinel: SentinelStyle,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            required: vec![Field::Rank],
            sentinel: SentinelStyle::default(),
        }
    }
}

impl ExtractionRules {
    pub fn is_required(&self, field: Field) -> bool {
        self.required.contains(&field)
    }
}

/// What became of one listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Extracted(Record),
    Skipped(ExtractionError),
}

/// Extract every listing entry of a ranking page, in page order.
///
/// Listing entries are located with the first item selector candidate that
/// matches anything; each field of an entry is then resolved on its own.
/// Missing optional fields become sentinels, a missing required field turns
/// the entry into [`ItemOutcome::Skipped`].
///
/// # Arguments
///
/// * `html` - Raw body of the ranking page
/// * `genre` - Genre whose code and label fill the genre columns
/// * `stamp` - Capture time for the date and time columns
/// * `profile` - Compiled selector candidates
/// * `rules` - Required fields and sentinel style
///
/// # Returns
///
/// One [`ItemOutcome`] per listing entry. A page without any listing entry
/// returns an empty vector.
#[instrument(level = "debug", skip_all, fields(genre = %genre.code))]
pub fn extract_page(
    html: &str,
    genre: &Genre,
    stamp: &CaptureStamp,
    profile: &SelectorProfile,
    rules: &ExtractionRules,
) -> Vec<ItemOutcome> {
    let document = Html::parse_document(html);
    let items = profile.item.select_all(document.root_element());
    debug!(count = items.len(), "Located listing items");

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match extract_item(index, item, profile, rules) {
            Ok(values) => ItemOutcome::Extracted(assemble(genre, stamp, values)),
            Err(e) => ItemOutcome::Skipped(e),
        })
        .collect()
}

/// Normalized values of one entry, indexed like [`Field::ALL`].
pub type FieldValues = [String; 6];

/// Resolve and normalize the fields of one entry.
pub fn extract_item(
    index: usize,
    item: ElementRef<'_>,
    profile: &SelectorProfile,
    rules: &ExtractionRules,
) -> Result<FieldValues, ExtractionError> {
    let resolved = profile.resolve(item);
    let mut values: FieldValues = Default::default();

    for field in Field::ALL {
        values[field.index()] = match raw_value(&resolved, field) {
            Some(value) => value,
            None if rules.is_required(field) => return Err(ExtractionError { index, field }),
            None => {
                debug!(index, %field, "Optional field missing; using sentinel");
                rules.sentinel.sentinel(field)
            }
        };
    }
    Ok(values)
}

fn raw_value(resolved: &ResolvedItem<'_>, field: Field) -> Option<String> {
    let node = resolved.get(field)?;
    match field {
        Field::Link => element_href(node),
        Field::Comment => Some(normalize_comment(&element_text(node))),
        _ => Some(element_text(node)),
    }
}

/// Build the fixed 10-column row for one entry.
pub fn assemble(genre: &Genre, stamp: &CaptureStamp, values: FieldValues) -> Record {
    let [rank, title, media, date, link, comment] = values;
    Record {
        capture_date: stamp.date_column(),
        capture_time: stamp.time_column(),
        genre_code: genre.code.clone(),
        genre_label: genre.label.clone(),
        rank,
        media,
        title,
        comment_count: comment,
        link,
        published_date: date,
    }
}
