use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for userjs
#[derive(Parser, Debug)]
#[command(name = "userjs", version)]
#[command(about = "Check, inspect and install Firefox user.js preference overrides")]
pub struct Cli {
    /// More log output on stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint a user.js (the bundled list if FILE is omitted)
    Check {
        file: Option<PathBuf>,

        /// Fail on warnings too
        #[arg(long)]
        deny_warnings: bool,

        /// Warn on 0/1 integers assigned to *.enabled keys
        #[arg(long)]
        strict_types: bool,

        /// Section glob allowed to override earlier values (repeatable)
        #[arg(long = "override-section", value_name = "GLOB")]
        override_sections: Vec<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        output: ReportFormat,
    },

    /// Print the effective preferences
    Show {
        file: Option<PathBuf>,

        /// Glob pattern on preference names (repeatable, OR logic)
        #[arg(short, long = "query", value_name = "PATTERN")]
        queries: Vec<String>,

        /// Only entries whose section starts with NAME
        #[arg(short, long, value_name = "NAME")]
        section: Option<String>,

        /// Print the raw value of a single preference
        #[arg(long, value_name = "KEY", conflicts_with_all = ["queries", "section"])]
        get: Option<String>,

        #[arg(short, long, value_enum, default_value = "json-object")]
        output: OutputType,
    },

    /// Print the canonical serialization
    Fmt {
        file: Option<PathBuf>,

        /// Keep trailing rationale comments
        #[arg(long)]
        comments: bool,

        /// Emit section and group headings
        #[arg(long)]
        sections: bool,

        /// Collapse duplicate keys to their effective value
        #[arg(long)]
        dedup: bool,
    },

    /// List Firefox profiles as JSON
    Profiles {
        #[arg(long, value_name = "DIR")]
        profiles_dir: Option<PathBuf>,
    },

    /// Install a user.js into a profile
    Install {
        /// Profile name (see `userjs profiles`)
        #[arg(short, long, default_value = "default")]
        profile: String,

        #[arg(long, value_name = "DIR")]
        profiles_dir: Option<PathBuf>,

        /// File to install instead of the bundled list
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Do not keep user.js.bak when replacing
        #[arg(long)]
        no_backup: bool,

        /// Show what would happen without writing
        #[arg(long)]
        dry_run: bool,

        /// Install even if the linter reports errors
        #[arg(long)]
        force: bool,
    },

    /// Compare a user.js with the profile's live prefs.js
    Drift {
        #[arg(short, long, default_value = "default")]
        profile: String,

        #[arg(long, value_name = "DIR")]
        profiles_dir: Option<PathBuf>,

        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Also list overrides that are applied or absent
        #[arg(long)]
        all: bool,

        #[arg(short, long, value_enum, default_value = "text")]
        output: ReportFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// {"key": value, ...}
    JsonObject,
    /// [{"key": ..., "value": ..., ...}, ...]
    JsonArray,
    /// key = value lines
    Text,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}
