//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - add/ingest: record a solved problem
//! - complete: finish a revision
//! - due/upcoming/list/stats/show: inspect the schedule
//! - calendar/tasks: reminder payloads for a problem
//! - remove/clear/export/import: manage the store

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Revise - spaced-repetition scheduler for solved coding problems
#[derive(Parser, Debug)]
#[command(name = "revise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Track a solved problem
    Add {
        /// Problem name
        name: String,

        /// Problem URL, used to recognise re-submissions
        link: String,

        /// Failed attempts before the accepted submission
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        mistakes: i64,

        /// Minutes spent solving
        #[arg(short = 't', long)]
        minutes: f64,

        /// When the problem was solved (RFC 3339), defaults to now
        #[arg(long)]
        solved_at: Option<DateTime<Utc>>,
    },

    /// Track a solved problem from a JSON event
    Ingest {
        /// Event file, stdin when omitted
        file: Option<PathBuf>,
    },

    /// Record a finished revision
    Complete {
        /// Problem ID
        id: String,

        /// The revision did not go well
        #[arg(long)]
        hard: bool,
    },

    /// List problems due for revision
    Due,

    /// List problems coming due soon
    Upcoming {
        /// Look-ahead window in days (defaults to config)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// List all tracked problems
    List,

    /// Show revision statistics
    Stats,

    /// Show one problem in detail
    Show {
        /// Problem ID
        id: String,
    },

    /// Print a calendar link for the next revision
    Calendar {
        /// Problem ID
        id: String,
    },

    /// Print reminder tasks for upcoming revisions as JSON
    Tasks {
        /// Problem ID
        id: String,

        /// Number of revisions to project (defaults to config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Stop tracking a problem
    Remove {
        /// Problem ID
        id: String,
    },

    /// Delete all revision data
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Write the revision store as JSON
    Export {
        /// Output file, stdout when omitted
        file: Option<PathBuf>,
    },

    /// Replace the revision store from a JSON export
    Import {
        /// Exported store file
        file: PathBuf,
    },
}
