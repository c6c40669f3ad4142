//! CLI module for postsmith - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for synthesis, replies,
//! and showing the effective configuration.

pub mod commands;

pub use commands::Cli;
