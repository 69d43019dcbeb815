// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  fieldkit init --api-url https://api.example.com --operator op-7
  fieldkit pull                      Cache assigned tickets
  fieldkit tickets --status open     Browse cached tickets
  fieldkit vacation request --from 2026-07-01 --to 2026-07-05
  fieldkit drain                     Replay requests queued while offline";

#[derive(Parser)]
#[command(
    name = "fieldkit",
    version,
    about = "Offline-first client for field operations",
    after_help = QUICKSTART_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Configure this device for an operator and backend
    Init {
        /// Base URL of the REST API
        #[arg(long, value_name = "URL")]
        api_url: String,

        /// Operator id this device acts for
        #[arg(long, value_name = "ID")]
        operator: String,

        /// Bearer token for the API
        #[arg(long)]
        token: Option<String>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Show queue and cache status
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Inspect or reset the offline queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Replay queued requests now
    Drain {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Refresh cached tickets from the server
    Pull,

    /// List cached tickets
    #[command(after_help = "\
Examples:
  fieldkit tickets                          All cached tickets, newest first
  fieldkit tickets -s open,in_progress      Open or in-progress tickets
  fieldkit tickets --search pump            Tickets mentioning \"pump\"
  fieldkit tickets --sort priority          Most urgent first")]
    Tickets {
        /// Filter by status (comma-separated or repeated)
        #[arg(long, short, value_delimiter = ',')]
        status: Vec<String>,

        /// Case-insensitive text search over title, description and asset
        #[arg(long, short = 'q')]
        search: Option<String>,

        /// Sort order (newest, oldest, priority)
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Manage vacation requests
    #[command(subcommand)]
    Vacation(VacationCommand),

    /// Raise a corrective work order from a cached ticket
    #[command(arg_required_else_help = true)]
    Corrective {
        /// Ticket id
        ticket_id: String,

        /// Description for the work order (defaults to the ticket's)
        #[arg(long, short)]
        note: Option<String>,
    },

    /// Run background sync until interrupted
    Run,
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// List pending jobs in replay order
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List dead-lettered jobs
    Dead {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Drop every pending job
    Clear,
}

#[derive(Subcommand)]
pub enum VacationCommand {
    /// Request time off (queued when offline)
    Request {
        /// First day, YYYY-MM-DD
        #[arg(long, value_name = "DATE")]
        from: String,

        /// Last day, YYYY-MM-DD
        #[arg(long, value_name = "DATE")]
        to: String,

        /// Reason shown to the approver
        #[arg(long, short)]
        reason: Option<String>,
    },

    /// List known requests
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Approve a request (online only)
    Approve { id: String },

    /// Reject a request (online only)
    Reject { id: String },

    /// Cancel a request (online only)
    Cancel { id: String },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
