//! Report renderers for the donation summary.
//!
//! - [`terminal`] — headline plus a table of authors and teams with their
//!   donate pages; respects `--quiet`.
//! - [`json`] — machine-readable output for `--report json`.

pub mod json;
pub mod terminal;
