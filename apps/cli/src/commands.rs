//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use holocron_core::seed::{self, SeedOutcome};
use holocron_core::{Pipeline, ProgressReporter};
use holocron_shared::{
    AppConfig, EntityKind, PipelineConfig, init_config, load_config, load_config_from,
    validate_config,
};
use holocron_storage::Storage;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Holocron: saga entity collections enriched from the wiki.
#[derive(Parser)]
#[command(
    name = "holocron",
    version,
    about = "Seed Star Wars saga collections from the catalog API, enriched with wiki descriptions.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.holocron/holocron.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides [storage] database).
    #[arg(long, env = "HOLOCRON_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
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
    /// Run pipelines and replace their collections.
    Seed {
        /// Kinds to seed (films, characters, planets, species, starships, vehicles).
        /// Seeds all of them, films first, when omitted.
        kinds: Vec<EntityKind>,
    },

    /// Show document counts per collection.
    Status,

    /// Run one pipeline and print its documents without storing them.
    Preview {
        kind: EntityKind,

        /// Print at most this many documents.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "holocron=info",
        1 => "holocron=debug",
        _ => "holocron=trace",
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
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
        Command::Seed { kinds } => {
            let config = resolve_config(cli.config.as_deref())?;
            let db = database_path(&config, cli.db);
            cmd_seed(&config, &db, &kinds).await
        }
        Command::Status => {
            let config = resolve_config(cli.config.as_deref())?;
            let db = database_path(&config, cli.db);
            cmd_status(&db).await
        }
        Command::Preview { kind, limit } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_preview(&config, kind, limit).await
        }
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    validate_config(&config)?;
    Ok(config)
}

fn database_path(config: &AppConfig, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(&config.storage.database))
}

/// Requested kinds in the order given, without repeats. Empty means all.
fn seed_order(kinds: &[EntityKind]) -> Vec<EntityKind> {
    if kinds.is_empty() {
        return EntityKind::ALL.to_vec();
    }
    let mut ordered = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !ordered.contains(kind) {
            ordered.push(*kind);
        }
    }
    ordered
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_seed(config: &AppConfig, db: &Path, kinds: &[EntityKind]) -> Result<()> {
    let storage = Storage::open(db).await?;
    let spinner = spinner();
    let pipeline = Pipeline::new(PipelineConfig::from(config))?
        .with_progress(Box::new(CliProgress::new(spinner.clone())));

    info!(db = %db.display(), "seeding collections");

    let mut failures = Vec::new();
    for kind in seed_order(kinds) {
        match seed::seed(kind, &pipeline, &storage).await {
            Ok(SeedOutcome::Seeded(report)) => {
                spinner.println(format!(
                    "  {:<10} deleted {:>3}  inserted {:>3}  sample {}",
                    report.kind.as_str(),
                    report.deleted,
                    report.inserted,
                    report.sample_id.as_deref().unwrap_or("-"),
                ));
            }
            Ok(SeedOutcome::NoData { kind }) => {
                spinner.println(format!(
                    "  {:<10} no data returned, collection untouched",
                    kind.as_str()
                ));
            }
            Err(e) => {
                spinner.println(format!("  {:<10} failed: {e}", kind.as_str()));
                failures.push(kind);
            }
        }
    }
    spinner.finish_and_clear();

    if failures.is_empty() {
        Ok(())
    } else {
        let names: Vec<_> = failures.iter().map(EntityKind::as_str).collect();
        Err(eyre!("seeding failed for: {}", names.join(", ")))
    }
}

async fn cmd_status(db: &Path) -> Result<()> {
    let storage = Storage::open_readonly(db).await?;

    println!();
    println!("  {:<16} {:>6}  {}", "COLLECTION", "COUNT", "DATA");
    for kind in EntityKind::ALL {
        let status = seed::status(kind, &storage).await?;
        println!(
            "  {:<16} {:>6}  {}",
            status.collection,
            status.count,
            if status.has_data { "yes" } else { "no" }
        );
    }
    println!();
    Ok(())
}

async fn cmd_preview(config: &AppConfig, kind: EntityKind, limit: Option<usize>) -> Result<()> {
    let spinner = spinner();
    let pipeline = Pipeline::new(PipelineConfig::from(config))?
        .with_progress(Box::new(CliProgress::new(spinner.clone())));

    let mut documents = pipeline.documents(kind).await?;
    spinner.finish_and_clear();

    if documents.is_empty() {
        println!("no data returned for {kind}");
        return Ok(());
    }
    if let Some(limit) = limit {
        documents.truncate(limit);
    }
    println!("{}", serde_json::to_string_pretty(&documents)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// CLI progress reporter driving a shared indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new(spinner: ProgressBar) -> Self {
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn entity_started(&self, name: &str, current: usize, total: usize) {
        self.spinner.set_message(format!("Enriching [{current}/{total}] {name}"));
    }

    fn done(&self, kind: EntityKind, count: usize) {
        self.spinner.set_message(format!("{kind}: {count} documents ready"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seed_parses_kinds() {
        let cli = Cli::try_parse_from(["holocron", "seed", "films", "Planets"]).unwrap();
        match cli.command {
            Command::Seed { kinds } => {
                assert_eq!(kinds, vec![EntityKind::Films, EntityKind::Planets]);
            }
            _ => panic!("expected seed"),
        }
        assert!(Cli::try_parse_from(["holocron", "seed", "droids"]).is_err());
    }

    #[test]
    fn preview_takes_limit() {
        let cli = Cli::try_parse_from(["holocron", "preview", "species", "--limit", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Preview { kind: EntityKind::Species, limit: Some(2) }
        ));
    }

    #[test]
    fn seed_order_defaults_to_all_and_dedups() {
        assert_eq!(seed_order(&[]), EntityKind::ALL.to_vec());
        assert_eq!(seed_order(&[EntityKind::Films]), EntityKind::ALL[..1].to_vec());
        assert_eq!(
            seed_order(&[EntityKind::Vehicles, EntityKind::Films, EntityKind::Vehicles]),
            vec![EntityKind::Vehicles, EntityKind::Films]
        );
    }

    #[test]
    fn db_flag_wins_over_config() {
        let config = AppConfig::default();
        assert_eq!(database_path(&config, None), PathBuf::from("var/holocron.db"));
        assert_eq!(
            database_path(&config, Some(PathBuf::from("/tmp/x.db"))),
            PathBuf::from("/tmp/x.db")
        );
    }
}
