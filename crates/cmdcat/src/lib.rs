//! Command catalog reporting CLI.
//!
//! The `cmdcat` binary scans a directory of installed extensions,
//! builds the command catalog, and renders it:
//!
//! ```bash
//! cmdcat extensions/                     # aligned text tables
//! cmdcat extensions/ --format json      # machine-readable, with warnings
//! cmdcat extensions/ --format html -o report.html
//! cmdcat extensions/ --extension backup  # only the named extension
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod render;
