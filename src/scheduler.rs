//! The per-genre capture loop.
//!
//! Genres are processed strictly one after another: fetch the ranking page,
//! extract its rows, write them, then wait out the configured pause before the
//! next request. Every genre ends in a [`GenreOutcome`]; under
//! [`FailurePolicy::Strict`] the first failure ends the run, under
//! [`FailurePolicy::Lenient`] it is recorded and the loop moves on.

use crate::clock::CaptureStamp;
use crate::config::{FailurePolicy, MissingRequired, Settings};
use crate::error::GenreError;
use crate::fetch::Fetch;
use crate::models::Genre;
use crate::outputs::csv::{WriteOutcome, write_batch};
use crate::scrapers::ranking::{ItemOutcome, extract_page};
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// How one genre ended.
#[derive(Debug)]
pub enum GenreOutcome {
    /// Rows were written to `path`; `skipped` entries were dropped.
    Written {
        path: PathBuf,
        rows: usize,
        skipped: usize,
    },
    /// The page had no usable entries; no file was created.
    NoData { skipped: usize },
    Failed(GenreError),
}

impl GenreOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, GenreOutcome::Failed(_))
    }
}

#[derive(Debug)]
pub struct GenreReport {
    pub genre: String,
    pub outcome: GenreOutcome,
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Every genre was attempted.
    Completed,
    /// A genre failed under the strict policy; later genres were not attempted.
    Aborted,
}

#[derive(Debug)]
pub struct RunReport {
    pub genres: Vec<GenreReport>,
    pub state: RunState,
}

impl RunReport {
    /// Process exit status: 1 for an aborted run, 0 otherwise.
    pub fn exit_status(&self) -> u8 {
        match self.state {
            RunState::Completed => 0,
            RunState::Aborted => 1,
        }
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, GenreOutcome::Written { .. }))
    }

    pub fn no_data(&self) -> usize {
        self.count(|o| matches!(o, GenreOutcome::NoData { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(GenreOutcome::is_failure)
    }

    fn count(&self, pred: impl Fn(&GenreOutcome) -> bool) -> usize {
        self.genres.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Capture every configured genre once, stamped with `stamp`.
///
/// Genres are processed sequentially in configured order, pausing
/// `settings.pause` between consecutive fetches. A failed genre is logged;
/// under [`FailurePolicy::Strict`] it also stops the run before the next
/// genre is fetched.
///
/// # Arguments
///
/// * `fetcher` - Source of ranking pages
/// * `settings` - Resolved genres, policies, selectors and writer options
/// * `stamp` - Capture time shared by every file of the run
///
/// # Returns
///
/// A [`RunReport`] with one entry per attempted genre and whether the run
/// completed or was aborted. Use [`RunReport::exit_status`] for the process
/// exit code.
#[instrument(level = "info", skip_all, fields(genres = settings.genres.len(), policy = ?settings.policy))]
pub async fn run<F: Fetch>(fetcher: &F, settings: &Settings, stamp: &CaptureStamp) -> RunReport {
    let mut reports = Vec::with_capacity(settings.genres.len());

    for (i, genre) in settings.genres.iter().enumerate() {
        if i > 0 && !settings.pause.is_zero() {
            sleep(settings.pause).await;
        }

        let outcome = match capture_genre(fetcher, settings, stamp, genre).await {
            Ok(outcome) => outcome,
            Err(e) => GenreOutcome::Failed(e),
        };
        report(genre, &outcome);

        let abort = outcome.is_failure() && settings.policy == FailurePolicy::Strict;
        reports.push(GenreReport {
            genre: genre.code.clone(),
            outcome,
        });
        if abort {
            error!(genre = %genre.code, "Strict policy; aborting run");
            return RunReport {
                genres: reports,
                state: RunState::Aborted,
            };
        }
    }

    RunReport {
        genres: reports,
        state: RunState::Completed,
    }
}

/// Fetch, extract and write a single genre.
///
/// # Arguments
///
/// * `fetcher` - Source of the genre's ranking page
/// * `settings` - Selectors, extraction rules and writer options
/// * `stamp` - Capture time of the run
/// * `genre` - Genre to capture
///
/// # Returns
///
/// [`GenreOutcome::Written`] or [`GenreOutcome::NoData`], both carrying the
/// number of skipped entries.
///
/// # Errors
///
/// [`GenreError::Network`] when the page cannot be fetched,
/// [`GenreError::Extraction`] when an entry misses a required field under
/// [`MissingRequired::FailGenre`], and [`GenreError::Filesystem`] when the CSV
/// cannot be written.
#[instrument(level = "info", skip_all, fields(genre = %genre.code))]
pub async fn capture_genre<F: Fetch>(
    fetcher: &F,
    settings: &Settings,
    stamp: &CaptureStamp,
    genre: &Genre,
) -> Result<GenreOutcome, GenreError> {
    let page = fetcher.fetch(&genre.url).await?;
    debug!(status = page.status, bytes = page.body.len(), "Page received");
    let outcomes = extract_page(&page.body, genre, stamp, &settings.selectors, &settings.rules);

    let mut records = Vec::with_capacity(outcomes.len());
    let mut skipped = 0;
    for outcome in outcomes {
        match outcome {
            ItemOutcome::Extracted(record) => records.push(record),
            ItemOutcome::Skipped(e) => match settings.on_missing_required {
                MissingRequired::SkipItem => {
                    warn!(reason = %e, "Skipping listing item");
                    skipped += 1;
                }
                MissingRequired::FailGenre => return Err(e.into()),
            },
        }
    }

    let outcome = match write_batch(&settings.writer, stamp, &genre.code, &records).await? {
        WriteOutcome::Written { path, rows } => GenreOutcome::Written {
            path,
            rows,
            skipped,
        },
        WriteOutcome::NoData => GenreOutcome::NoData { skipped },
    };
    Ok(outcome)
}

fn report(genre: &Genre, outcome: &GenreOutcome) {
    match outcome {
        GenreOutcome::Written {
            path,
            rows,
            skipped,
        } => info!(genre = %genre.code, path = %path.display(), rows, skipped, "CSV file saved"),
        GenreOutcome::NoData { skipped } => {
            warn!(genre = %genre.code, url = %genre.url, skipped, "No data to save")
        }
        GenreOutcome::Failed(e) => error!(genre = %genre.code, url = %genre.url, error = %e, "Genre failed"),
    }
}
