pub mod cli;
pub mod config;
pub mod decorate;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod highlight;
pub mod logging;
pub mod paginate;
pub mod predicate;
pub mod render;
pub mod rule;
pub mod session;

use anyhow::{Context, bail};
use std::path::Path;
use tracing::{info, warn};

pub use cli::{ColorMode, Commands, FilterArgs, OutputFormat, PageArgs, cli_parse};
pub use config::{ViewerConfig, load_config};
pub use document::{Document, LineRecord, load_document};
pub use error::{DocumentError, PatternError};
pub use evaluator::{Evaluation, FilterResult, FilterRun, evaluate, run_filter};
pub use highlight::{HighlightPattern, build_highlight};
pub use paginate::{DEFAULT_PAGE_SIZE, Page, PagePolicy, PaginationConfig, paginate};
pub use rule::{Join, MAX_RULES, Rule, RuleKind, RuleSet, parse_rule_term};
pub use session::Session;

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write output file '{}'", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

fn apply_color_mode(mode: ColorMode, output: Option<&Path>) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        // no escape codes in files
        ColorMode::Auto if output.is_some() => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

/// Build a session from config defaults plus command-line rules and page options
pub fn build_session(
    config: &ViewerConfig,
    filter: &FilterArgs,
    page: &PageArgs,
) -> anyhow::Result<Session> {
    let mut session = Session::from_config(config).context("Too many filter rules in config")?;

    if let Some(raw) = &page.page_size {
        let size = paginate::parse_page_size(raw).unwrap_or_else(|| {
            warn!(
                value = raw.as_str(),
                fallback = DEFAULT_PAGE_SIZE,
                "unusable page size, using default"
            );
            DEFAULT_PAGE_SIZE as i64
        });
        session.set_page_size(Some(size));
    }
    if page.no_paginate {
        session.set_pagination_enabled(false);
    }

    for rule in &filter.rules {
        session
            .add_rule(rule.clone())
            .context("Too many filter rules between config and command line")?;
    }

    session
        .load_path(&filter.file)
        .with_context(|| format!("Failed to load log file '{}'", filter.file.display()))?;

    if let Some(raw) = &page.page {
        let landed = session.jump_to(raw);
        info!(requested = raw.as_str(), page = landed, "page selected");
    }

    Ok(session)
}

/// A run where no rule compiled is an error; dropped rules were already logged
fn check_run(session: &Session) -> anyhow::Result<()> {
    let run = session.last_run();
    match run.error_message() {
        Some(message) if run.failed => bail!("No usable filter rules: {message}"),
        Some(message) => {
            warn!(errors = run.errors.len(), "filtered with some rules dropped: {message}");
            Ok(())
        }
        None => Ok(()),
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let output = cli.output.as_deref();
    apply_color_mode(cli.color, output);

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(path) = &cli.config {
        info!(path = %path.display(), rules = config.rules.len(), "config loaded");
    }

    match &cli.command {
        Commands::View { filter, page } => {
            let session = build_session(&config, filter, page)?;
            let content = match cli.format {
                OutputFormat::Text => render::format_page_text(&session),
                OutputFormat::Html => render::format_page_html(&session),
                OutputFormat::Json => {
                    let mut json = render::format_page_json(&session)
                        .context("Failed to serialize page")?;
                    json.push('\n');
                    json
                }
            };
            write_output(output, &content)?;
            check_run(&session)?;
        }
        Commands::Export { filter, page } => {
            let session = build_session(&config, filter, page)?;
            let mut content = session.export_page_text();
            if !content.is_empty() {
                content.push('\n');
            }
            write_output(output, &content)?;
            check_run(&session)?;
        }
        Commands::Stats { filter } => {
            let session = build_session(&config, filter, &PageArgs::default())?;
            let stats = render::LevelStats::from_session(&session);
            let content = match cli.format {
                OutputFormat::Text => render::format_stats_text(&stats),
                OutputFormat::Json => {
                    let mut json =
                        render::format_stats_json(&stats).context("Failed to serialize stats")?;
                    json.push('\n');
                    json
                }
                OutputFormat::Html => bail!("HTML output is not available for stats"),
            };
            write_output(output, &content)?;
            check_run(&session)?;
        }
    }

    Ok(())
}
