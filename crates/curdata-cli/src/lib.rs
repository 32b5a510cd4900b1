#![forbid(unsafe_code)]

//! `curdata` command-line tool.
//!
//! Answers lookups, listings and metadata queries over a currency data
//! directory, and keeps that directory valid and canonical.

pub mod cli;
pub mod commands;
pub mod logging;
