//! pyident: detection of Python identity comparisons against literal values.
//!
//! `is` / `is not` tests object identity, not equality, and the identity of
//! two textually identical literals is an implementation detail of the
//! interpreter. This crate parses Python source with ruff's parser and flags
//! such comparisons with two diagnostic codes, `literal-comparison` and
//! `comparison-of-constants`.
//!
//! The detection core lives in [`check`]; [`runner`] adds file discovery and
//! parallel execution for the bundled command line tool.

pub mod check;
pub mod cli;
pub mod config;
pub mod output;
pub mod runner;
pub mod utils;
