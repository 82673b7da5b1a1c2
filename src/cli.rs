use crate::rule::{Rule, parse_rule_term};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// View, filter and highlight plain-text log files page by page
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config with pagination defaults and initial rules
    #[arg(short, long, global = true, env = "LOG_LENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// When to use terminal colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one page of the filtered file with highlighting
    View {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Print the raw text of one page of the filtered file
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Count filtered lines per severity level
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Log file to read
    pub file: PathBuf,

    /// Filter rule, `[and:|or:]kind[/c]:pattern` (repeatable, at most 8 in total)
    ///
    /// Kinds: include (i), exclude (x), starts_with (s), ends_with (e), regex (r).
    /// `/c` makes the rule case-sensitive.
    #[arg(short = 'r', long = "rule", value_name = "RULE", value_parser = parse_rule_term)]
    pub rules: Vec<Rule>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page to show; out-of-range values are clamped
    #[arg(short, long, allow_hyphen_values = true)]
    pub page: Option<String>,

    /// Lines per page for files over the single-page threshold
    #[arg(short = 's', long, allow_hyphen_values = true)]
    pub page_size: Option<String>,

    /// Show the whole filtered result on one page
    #[arg(long)]
    pub no_paginate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
