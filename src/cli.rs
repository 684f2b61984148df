//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::OutputFormat;
use crate::models::{Priority, Role};
use clap::Parser;
use std::path::PathBuf;

/// HawkAI - code-analysis agent dashboard
///
/// Browse agents, repositories and analysis reports, and render a report
/// the way a developer, tech lead or architect sees it.
///
/// Examples:
///   hawkai --overview
///   hawkai --list reports
///   hawkai --report report-1
///   hawkai --report report-1 --role architect --format json
///   hawkai --report report-2 --fail-on p0
///   hawkai --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Report to render
    #[arg(short, long, value_name = "ID")]
    pub report: Option<String>,

    /// View the report as this role instead of the role it was created for
    #[arg(long, value_name = "ROLE", requires = "report")]
    pub role: Option<RoleArg>,

    /// List a collection and exit
    #[arg(short, long, value_name = "WHAT", conflicts_with = "report")]
    pub list: Option<Collection>,

    /// Print overview numbers and exit
    #[arg(long, conflicts_with_all = ["report", "list"])]
    pub overview: bool,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", env = "HAWKAI_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Width of a full rollup bar in characters
    #[arg(long, value_name = "CHARS")]
    pub bar_length: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .hawkai.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Fail if the report has issues at or above this priority
    ///
    /// Useful for CI pipelines. Exit code 2 when threshold is exceeded.
    /// Values: p0, p1, p2
    #[arg(long, value_name = "LEVEL", requires = "report")]
    pub fail_on: Option<FailOnLevel>,

    /// Generate a default .hawkai.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Collections that `--list` can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Collection {
    Agents,
    Repositories,
    Reports,
    Rules,
    LearnedRules,
    Tokens,
}

/// Viewer role for `--role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoleArg {
    Developer,
    TechLead,
    Architect,
    TechManager,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Developer => Role::Developer,
            RoleArg::TechLead => Role::TechLead,
            RoleArg::Architect => Role::Architect,
            RoleArg::TechManager => Role::TechManager,
        }
    }
}

/// Priority threshold for `--fail-on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FailOnLevel {
    P0,
    P1,
    P2,
}

impl From<FailOnLevel> for Priority {
    fn from(level: FailOnLevel) -> Self {
        match level {
            FailOnLevel::P0 => Priority::P0,
            FailOnLevel::P1 => Priority::P1,
            FailOnLevel::P2 => Priority::P2,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.report.is_none() && self.list.is_none() && !self.overview {
            return Err("Nothing to do: pass --report, --list or --overview".to_string());
        }

        if let Some(ref id) = self.report {
            if id.trim().is_empty() {
                return Err("Report id must not be empty".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.bar_length == Some(0) {
            return Err("Bar length must be at least 1".to_string());
        }

        Ok(())
    }
}
