//! HawkAI - code-analysis agent dashboard
//!
//! A CLI for browsing analysis agents, repositories and reports, and for
//! rendering a report as a developer, tech lead or architect sees it.
//!
//! Exit codes:
//!   0 - Success (no issues above threshold, or no --fail-on set)
//!   1 - Runtime error (unknown report, bad config, write failure, etc.)
//!   2 - Issues found at or above --fail-on threshold

use anyhow::{Context, Result};
use hawkai::analysis::{at_or_above, select_view};
use hawkai::cli::{Args, Collection};
use hawkai::config::{Config, OutputFormat, CONFIG_FILE};
use hawkai::models::{Priority, Role};
use hawkai::report;
use hawkai::store::Store;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `verbose` from the file applies
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(args.quiet))?;

    info!("HawkAI v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(args, config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .hawkai.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize modules, output format, and hotspot counts.");
    Ok(())
}

/// Initialize logging. `RUST_LOG` overrides the level from -v/-q and the config file.
///
/// Logs go to stderr so rendered output on stdout stays clean.
fn init_logging(level: Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Run the requested command. Returns exit code (0 or 2).
fn run(args: Args, config: Config) -> Result<i32> {
    let store = Store::seeded();
    let format = config.report.format;

    let (output, exit_code) = if let Some(collection) = args.list {
        (render_listing(&store, collection, format)?, 0)
    } else if args.overview {
        let stats = store.overview();
        let output = match format {
            OutputFormat::Json => report::generate_json_listing(&stats)?,
            OutputFormat::Markdown => report::generate_overview_markdown(&stats),
        };
        (output, 0)
    } else if let Some(ref report_id) = args.report {
        let role = args.role.map(Role::from);
        let fail_on = args.fail_on.map(Priority::from);
        render_report(&store, &config, report_id, role, fail_on)?
    } else {
        anyhow::bail!("Nothing to do: pass --report, --list or --overview");
    };

    write_output(&output, config.general.output.as_deref())?;
    Ok(exit_code)
}

/// Render one report and check it against the --fail-on threshold.
fn render_report(
    store: &Store,
    config: &Config,
    report_id: &str,
    role: Option<Role>,
    fail_on: Option<Priority>,
) -> Result<(String, i32)> {
    let report = store
        .report(report_id)
        .with_context(|| format!("Cannot render report {}", report_id))?;

    let role = role.unwrap_or(report.created_by_role);
    info!("Rendering report {} as {}", report.id, role);

    let view = select_view(
        role,
        &report,
        &config.modules,
        config.report.view_options(),
    );

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_view(&report, &view)?,
        OutputFormat::Markdown => {
            report::generate_markdown_view(&report, &view, config.report.bar_length)
        }
    };

    // Check --fail-on threshold
    if let Some(threshold) = fail_on {
        if report.max_priority() >= Some(threshold) {
            let above = at_or_above(&report.issues(), threshold);
            eprintln!(
                "\n⛔ {} issue(s) found at or above {}. Failing (exit code 2).",
                above.len(),
                threshold
            );
            return Ok((output, 2));
        }
        debug!("Highest priority {:?} is below {}", report.max_priority(), threshold);
    }

    Ok((output, 0))
}

fn render_listing(store: &Store, collection: Collection, format: OutputFormat) -> Result<String> {
    debug!("Listing {:?}", collection);

    let json = format == OutputFormat::Json;
    let output = match collection {
        Collection::Agents if json => report::generate_json_listing(&store.agents())?,
        Collection::Agents => report::generate_agents_markdown(&store.agents()),
        Collection::Repositories if json => {
            report::generate_json_listing(&store.repositories())?
        }
        Collection::Repositories => report::generate_repositories_markdown(&store.repositories()),
        Collection::Reports if json => report::generate_json_listing(&store.reports())?,
        Collection::Reports => report::generate_reports_markdown(&store.reports()),
        Collection::Rules if json => report::generate_json_listing(&store.rules())?,
        Collection::Rules => report::generate_rules_markdown(&store.rules()),
        Collection::LearnedRules if json => {
            report::generate_json_listing(&store.learned_rules())?
        }
        Collection::LearnedRules => {
            report::generate_learned_rules_markdown(&store.learned_rules())
        }
        Collection::Tokens if json => report::generate_json_listing(&store.tokens())?,
        Collection::Tokens => report::generate_tokens_markdown(&store.tokens()),
    };

    Ok(output)
}

/// Write rendered output to a file, or stdout when no file is configured.
fn write_output(output: &str, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write output to {}", path))?;
            info!("Output saved to {}", path);
        }
        None => print!("{}", output),
    }
    Ok(())
}

/// Where the configuration came from, logged once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Invalid(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Invalid(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` must load; a broken default file falls back to defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Invalid(e))),
    }
}
