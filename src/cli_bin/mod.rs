//! CLI module for the sitematter command-line interface
//!
//! Argument parsing lives in [`args`]; [`commands`] turns parsed arguments
//! into library calls and prints the reports.

pub mod args;
pub mod commands;
