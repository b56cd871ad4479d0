//! Command-line front end: argument parsing, solving and reporting.

pub(crate) mod cli;
