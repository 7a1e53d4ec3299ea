//! HTML extraction for the comment ranking pages.
//!
//! Extraction runs in three steps, one submodule each:
//!
//! 1. **Resolution** ([`selectors`]): find the listing entries on the page and
//!    the sub-node of each field, trying selector candidates in priority order
//! 2. **Normalization** ([`normalize`]): trim text, strip the `件/時` counter
//!    suffix, pick sentinels for fields that were not found
//! 3. **Assembly** ([`ranking`]): stamp the values with capture time and genre
//!    into a fixed 10-column [`Record`](crate::models::Record)
//!
//! Nothing here does I/O; the HTML is fetched by [`crate::fetch`] and the rows
//! are written by [`crate::outputs`].

pub mod normalize;
pub mod ranking;
pub mod selectors;
