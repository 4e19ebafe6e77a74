//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use docsite_core::{MigrationReporter, MigrationSummary};
use docsite_shared::{AppConfig, CONFIG_FILE_NAME, MigrateConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsite-migrate: turn a folder of markdown articles into site content.
#[derive(Parser)]
#[command(
    name = "docsite-migrate",
    version,
    about = "Migrate plain markdown articles into the documentation site's content tree.",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Arguments for the implicit `run` when no subcommand is given.
    #[command(flatten)]
    pub run: RunArgs,

    /// Defaults to `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Clear the target directory and migrate every article into it.
    Run(RunArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Source directory of markdown articles (overrides the config file).
    #[arg(short, long, env = "DOCSITE_SOURCE")]
    pub source: Option<PathBuf>,

    /// Target content directory; deleted and rebuilt (overrides the config file).
    #[arg(short, long, env = "DOCSITE_TARGET")]
    pub target: Option<PathBuf>,

    /// Config file (defaults to ./docsite.toml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with the built-in defaults.
    Init {
        /// Where to write it.
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
    },
    /// Show resolved configuration.
    Show {
        /// Config file (defaults to ./docsite.toml when present).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Per-file progress goes through the reporter, so the default level is `warn`.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsite=warn",
        1 => "docsite=info",
        2 => "docsite=debug",
        _ => "docsite=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => cmd_run(&cli.run),
        Some(Command::Run(args)) => cmd_run(&args),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init { path } => cmd_config_init(&path),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

fn read_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    })
}

fn cmd_run(args: &RunArgs) -> Result<()> {
    let app_config = read_config(args.config.as_deref())?;
    let config = MigrateConfig::resolve(&app_config, args.source.clone(), args.target.clone())?;

    println!("Migrating documents...");
    println!("  Source: {}", config.source_dir.display());
    println!("  Target: {}", config.target_dir.display());
    println!();

    info!(
        categories = config.categories.len(),
        tag_rules = config.tag_rules.len(),
        "starting migration"
    );

    let reporter = CliProgress::new(&config.source_dir, &config.target_dir);
    let summary = match docsite_core::migrate(&config, &reporter) {
        Ok(summary) => summary,
        Err(e) => {
            reporter.spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    println!();
    println!("  Migration complete!");
    println!("  Documents:  {}", summary.documents);
    println!("  Assets:     {}", summary.assets);
    println!("  Categories: {}", summary.category_indexes);
    if summary.position_collisions > 0 {
        println!(
            "  Warning:    {} duplicate sidebar position(s), run with -v for details",
            summary.position_collisions
        );
    }
    println!("  Time:       {:.1}s", summary.elapsed.as_secs_f64());
    println!();
    println!("  Next steps:");
    println!("  1. Review the generated front matter");
    println!("  2. Start the site dev server to preview");
    println!("  3. Adjust navigation in the site config if needed");
    println!();

    Ok(())
}

fn cmd_config_init(path: &Path) -> Result<()> {
    let path = init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = read_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter: spinner for the current phase, one line per file.
struct CliProgress {
    spinner: ProgressBar,
    source_root: PathBuf,
    target_root: PathBuf,
}

impl CliProgress {
    fn new(source_root: &Path, target_root: &Path) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self {
            spinner,
            source_root: source_root.to_path_buf(),
            target_root: target_root.to_path_buf(),
        }
    }

    fn print_mapping(&self, source: &Path, target: &Path) {
        let source = source.strip_prefix(&self.source_root).unwrap_or(source);
        let target = target.strip_prefix(&self.target_root).unwrap_or(target);
        self.spinner
            .println(format!("  ✓ {} -> {}", source.display(), target.display()));
    }
}

impl MigrationReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_migrated(&self, source: &Path, target: &Path) {
        self.print_mapping(source, target);
    }

    fn asset_copied(&self, source: &Path, _target: &Path) {
        let source = source.strip_prefix(&self.source_root).unwrap_or(source);
        self.spinner
            .set_message(format!("Copied {}", source.display()));
    }

    fn done(&self, _summary: &MigrationSummary) {
        self.spinner.finish_and_clear();
    }
}
