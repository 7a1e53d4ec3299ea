//! Output generation.
//!
//! # Submodules
//!
//! - [`csv`]: Writes one genre's rows of a run to a date-grouped CSV file
//!
//! CSV is the only durable artifact; there is no index or database to update.

pub mod csv;
