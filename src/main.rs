// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info};
use std::io::Write;
use std::path::PathBuf;

use pot_translate::app_config::{self, Config, JobConfig};
use pot_translate::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for pot-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// pot-translate - batch machine translation of PO/POT catalogs
///
/// Fills blank `msgstr` entries through an external translator while keeping
/// placeholders, markup, `@commands` and escape sequences intact.
#[derive(Parser, Debug)]
#[command(name = "pot-translate")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Batch translator for PO/POT catalogs")]
#[command(long_about = "pot-translate fills the blank msgstr entries of PO/POT catalogs using an external translation service.

EXAMPLES:
    pot-translate                                  # Run the default jobs below ./Hercules
    pot-translate -t es                            # Translate into Spanish
    pot-translate npc.pot -o out/                  # Translate a single catalog
    pot-translate --proxy http://127.0.0.1:8080    # Send requests through a proxy
    pot-translate completions bash > pot.bash      # Generate bash completions

CONFIGURATION:
    Settings are read from pot-translate.json when it exists; every setting has a
    default, and the file is never created automatically. Environment variables
    (also read from a .env file) override the file, and flags override both.

DICTIONARIES AND CACHE:
    dictionary_words.json, dictionary_phrases.json and translation_cache.json are
    flat JSON objects mapping source text to target text.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog file or directory to translate instead of the configured jobs
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output directory for INPUT (default: <base-dir>/<target-language>)
    #[arg(short, long, requires = "input")]
    output: Option<PathBuf>,

    /// Source language code (e.g., 'en')
    #[arg(short, long, env = "POT_SOURCE_LANG")]
    source_language: Option<String>,

    /// Target language code (e.g., 'pt', 'pt-BR')
    #[arg(short, long, env = "POT_TARGET_LANG")]
    target_language: Option<String>,

    /// Proxy URL for translation requests
    #[arg(long, env = "POT_PROXY")]
    proxy: Option<String>,

    /// Base directory of the default job layout
    #[arg(long, env = "POT_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Delay between translation requests in milliseconds
    #[arg(long, env = "DELAY")]
    delay_ms: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "pot-translate.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, env = "POT_LOG_LEVEL")]
    log_level: Option<CliLogLevel>,

    /// Disable progress bars
    #[arg(long)]
    no_progress: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Glyph and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("✅", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (glyph, color) = Self::style_for_level(record.level());
        let line = format!("\x1B[{}m{} {} {}\x1B[0m", color, now, glyph, record.args());

        // Problems go to stderr so stdout stays usable for progress and summaries
        let _ = match record.level() {
            Level::Error | Level::Warn => writeln!(std::io::stderr(), "{}", line),
            _ => writeln!(std::io::stdout(), "{}", line),
        };
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment from .env must be in place before clap reads its `env` fallbacks
    let dotenv_path = dotenv::dotenv().ok();

    // The logger accepts every level; the max level is narrowed once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "pot-translate", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(log_level) = &cli.log_level {
        let level: app_config::LogLevel = log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }
    if let Some(path) = dotenv_path {
        debug!("Loaded environment from {:?}", path);
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;
    info!(
        "Translating {} -> {} (delay {}ms{})",
        config.source_language,
        config.target_language,
        config.delay_ms,
        config
            .proxy_url
            .as_deref()
            .map(|p| format!(", proxy {}", p))
            .unwrap_or_default()
    );

    let mut controller = Controller::with_config(config)?;
    if cli.no_progress {
        controller = controller.without_progress();
    }

    // Failures are reported through the log and the error log, never the exit code
    controller.run().await;

    Ok(())
}

// @loads: Config file, then environment and command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load(&cli.config)?;
    if cli.config.exists() {
        debug!("Loaded configuration from {:?}", cli.config);
    } else {
        debug!("No configuration file at {:?}, using defaults", cli.config);
    }

    if let Some(source_language) = &cli.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &cli.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(proxy) = &cli.proxy {
        config.proxy_url = Some(proxy.clone()).filter(|p| !p.trim().is_empty());
    }
    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.delay_ms = delay_ms;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(input) = &cli.input {
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| config.base_dir.join(&config.target_language));
        config.jobs = vec![JobConfig::new(input.clone(), output)];
    }

    Ok(config)
}
