//! # Comment Ranking
//!
//! Captures the Yahoo! News comment ranking ("コメント数ランキング") of every
//! genre and stores each genre's listing as a CSV file, grouped by capture
//! date.
//!
//! ## Architecture
//!
//! One run is a sequential pipeline per genre:
//! 1. **Fetching**: GET the genre's ranking page ([`fetch`])
//! 2. **Extraction**: resolve and normalize the fields of every listing entry
//!    ([`scrapers`])
//! 3. **Output**: write the rows to `<YYYY_MMDD>_cmnt/<YYYY_MMDD_HHMM>_cmnt_<genre>.csv`
//!    ([`outputs`])
//!
//! The [`scheduler`] drives the loop with a fixed pause between requests and
//! applies the strict or lenient failure policy. All rows of a run share one
//! capture timestamp taken in UTC+9 ([`clock`]).

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod scheduler;
pub mod scrapers;
