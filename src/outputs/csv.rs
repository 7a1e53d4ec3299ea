//! CSV output for one genre of one run.
//!
//! # Output Structure
//!
//! ```text
//! output_root/
//! └── [subdir/]
//!     └── 2025_0506_cmnt/
//!         ├── 2025_0506_0830_cmnt_TTL.csv
//!         ├── 2025_0506_0830_cmnt_domestic.csv
//!         └── ...
//! ```
//!
//! A file is named after the capture minute and the genre code, so a second
//! run inside the same minute overwrites the first one's file. The CSV is
//! rendered in memory, written to a `.tmp` sibling and renamed into place.

use crate::clock::CaptureStamp;
use crate::error::WriteError;
use crate::models::Record;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// UTF-8 byte order mark, for spreadsheet tools that need it to detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where and how run files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    pub root: PathBuf,
    /// Optional fixed directory between `root` and the per-day directory.
    pub subdir: Option<String>,
    pub bom: bool,
}

/// Result of writing one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf, rows: usize },
    /// The batch was empty; nothing was created.
    NoData,
}

impl WriterOptions {
    /// The per-day directory of `stamp`.
    pub fn day_dir(&self, stamp: &CaptureStamp) -> PathBuf {
        let mut dir = self.root.clone();
        if let Some(subdir) = &self.subdir {
            dir.push(subdir);
        }
        dir.push(stamp.dir_name());
        dir
    }

    /// Full path of the file for `genre_code` captured at `stamp`.
    pub fn file_path(&self, stamp: &CaptureStamp, genre_code: &str) -> PathBuf {
        self.day_dir(stamp).join(stamp.file_name(genre_code))
    }
}

/// Serialize records as CSV with a header row.
pub fn render(records: &[Record], bom: bool) -> Result<Vec<u8>, WriteError> {
    let mut buf = Vec::new();
    if bom {
        buf.extend_from_slice(UTF8_BOM);
    }
    let mut writer = csv::Writer::from_writer(buf);
    writer.write_record(Record::HEADERS)?;
    for record in records {
        writer.write_record(record.columns())?;
    }
    writer
        .into_inner()
        .map_err(|e| WriteError::Csv(csv::Error::from(e.into_error())))
}

/// Write one genre's batch of records.
///
/// The file is written next to its final name with a `.tmp` suffix and then
/// renamed into place, so a reader never sees a half-written CSV. A file left
/// by an earlier run in the same minute is replaced.
///
/// # Arguments
///
/// * `options` - Output root, optional subdirectory and BOM flag.
/// * `stamp` - Capture time that names the day directory and the file.
/// * `genre_code` - Code used as the file name suffix.
/// * `records` - Rows in page order.
///
/// # Returns
///
/// [`WriteOutcome::Written`] with the final path and row count, or
/// [`WriteOutcome::NoData`] without touching the filesystem when `records` is
/// empty.
///
/// # Errors
///
/// [`WriteError::Io`] when the directory, the temporary file or the rename
/// fails; the temporary file is removed before returning.
#[instrument(level = "info", skip_all, fields(genre = %genre_code, rows = records.len()))]
pub async fn write_batch(
    options: &WriterOptions,
    stamp: &CaptureStamp,
    genre_code: &str,
    records: &[Record],
) -> Result<WriteOutcome, WriteError> {
    if records.is_empty() {
        return Ok(WriteOutcome::NoData);
    }

    let dir = options.day_dir(stamp);
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| WriteError::io(&dir, e))?;

    let bytes = render(records, options.bom)?;
    let path = options.file_path(stamp, genre_code);
    let tmp = tmp_path(&path);
    if let Err(e) = fs::write(&tmp, bytes).await {
        discard_tmp(&tmp).await;
        return Err(WriteError::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, &path).await {
        discard_tmp(&tmp).await;
        return Err(WriteError::io(&path, e));
    }

    info!(path = %path.display(), "Wrote CSV file");
    Ok(WriteOutcome::Written {
        path,
        rows: records.len(),
    })
}

async fn discard_tmp(tmp: &Path) {
    match fs::remove_file(tmp).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %tmp.display(), error = %e, "Failed removing temporary file"),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
