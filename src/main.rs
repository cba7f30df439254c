// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod language_utils;
mod prompts;
mod providers;
mod subtitle_processor;
mod timeout;
mod tokens;
mod translation;

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
    /// Translate a subtitle or text file (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for anytrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input file to translate (.srt or plain text)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file path (default: {stem}_{lang}{ext} next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language code (e.g., 'ko', 'fr', 'ja')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Model name, repeat to configure fallback candidates in rank order
    #[arg(short, long)]
    model: Vec<String>,

    /// Number of concurrent translation sessions
    #[arg(short = 'n', long)]
    sessions: Option<usize>,

    /// API key for the chat completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL override for OpenAI-compatible endpoints
    #[arg(long)]
    base_url: Option<String>,

    /// File containing a custom system prompt
    #[arg(short = 'p', long)]
    system_prompt_file: Option<PathBuf>,

    /// Extra instructions appended to the system prompt and each query
    #[arg(long)]
    additional_prompt: Option<String>,

    /// Token budget for conversation history per session
    #[arg(long)]
    max_context_tokens: Option<usize>,

    /// Wall-clock deadline per translation call, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// anytrans - AI-powered file translation
///
/// Translates subtitle (.srt) and plain text files through OpenAI-compatible
/// chat completion endpoints, keeping conversational context per session.
#[derive(Parser, Debug)]
#[command(name = "anytrans")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered subtitle and text file translation")]
#[command(long_about = "anytrans translates subtitle and plain text files using \
OpenAI-compatible chat completion endpoints.

EXAMPLES:
    anytrans movie.srt                          # Translate using default config
    anytrans -t fr movie.srt                    # Translate to French
    anytrans -m gpt-4o -m gpt-4o-mini movie.srt # Ranked model fallback
    anytrans -n 4 notes.txt                     # Use 4 concurrent sessions
    anytrans --base-url http://localhost:1234/v1 movie.srt
    anytrans completions bash > anytrans.bash   # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json by default; use --config for a
    different file. Command line options override file values. The API key
    is taken from --api-key or the OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default,
    // the level is updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "anytrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;
    if !input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    let config = load_config(&options)?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::new(
        config,
        options.system_prompt_file.as_deref(),
        options.additional_prompt.clone(),
    )?;

    controller.run(&input_path, options.output.clone()).await
}

/// Load the config file when present, then apply command line overrides
fn load_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = if Path::new(&options.config_path).exists() {
        Config::from_file(&options.config_path)?
    } else {
        debug!(
            "Config file not found at '{}', using defaults",
            options.config_path
        );
        Config::default()
    };

    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if !options.model.is_empty() {
        config.translation.models = options.model.clone();
    }
    if let Some(sessions) = options.sessions {
        config.translation.sessions = sessions;
    }
    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(base_url) = &options.base_url {
        config.translation.endpoint = Some(base_url.clone());
    }
    if let Some(max_context_tokens) = options.max_context_tokens {
        config.translation.max_context_tokens = max_context_tokens;
    }
    if let Some(timeout_secs) = options.timeout_secs {
        config.translation.timeout_secs = timeout_secs;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()?;
    Ok(config)
}
