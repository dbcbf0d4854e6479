//! Command implementation for the CLI binary.
//!
//! The module contains the full implementation, invoked by a thin
//! wrapper binary.

pub mod catalog;
