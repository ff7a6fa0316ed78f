//! CLI module for revise - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
