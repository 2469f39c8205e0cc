//! reqcomp CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use reqcomp_compression::{EncodingSettings, RequestCompressionPolicy};
use reqcomp_config::{SettingsBinder, DEFAULT_PREFIX};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "reqcomp")]
#[command(about = "Inspect HTTP request compression settings", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Sources {
    /// Configuration files, later ones override earlier ones
    #[arg(short, long = "config")]
    configs: Vec<PathBuf>,

    /// Configuration prefix the settings live under
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Ignore environment variable overrides
    #[arg(long)]
    no_env: bool,
}

impl Sources {
    fn bind(&self) -> Result<EncodingSettings> {
        SettingsBinder::new()
            .prefix(&self.prefix)
            .files(&self.configs)
            .env(!self.no_env)
            .bind()
            .context("Failed to bind encoding settings")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the settings bound from files and the environment
    Show {
        #[command(flatten)]
        sources: Sources,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the default settings
    Defaults {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a request would be compressed
    Check {
        #[command(flatten)]
        sources: Sources,

        /// Request Content-Type
        #[arg(long)]
        content_type: String,

        /// Request body size in bytes
        #[arg(long)]
        size: u64,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Show { sources, json } => {
            let settings = sources.bind()?;
            print_settings(&settings, json)
        }

        Commands::Defaults { json } => print_settings(&EncodingSettings::default(), json),

        Commands::Check {
            sources,
            content_type,
            size,
        } => {
            let policy = RequestCompressionPolicy::new(sources.bind()?);

            let mut headers = HeaderMap::new();
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_str(&content_type).context("Invalid content type")?,
            );
            headers.insert(CONTENT_LENGTH, HeaderValue::from(size));

            if policy.apply(&mut headers) {
                let encodings: Vec<&str> = headers
                    .get_all(http::header::CONTENT_ENCODING)
                    .iter()
                    .filter_map(|v| v.to_str().ok())
                    .collect();
                println!("compress: yes");
                println!("content-encoding: {}", encodings.join(", "));

                let unrecognized = policy.unrecognized_encodings();
                if !unrecognized.is_empty() {
                    println!("unrecognized: {}", unrecognized.join(", "));
                }
            } else {
                println!("compress: no");
            }
            Ok(())
        }

        Commands::Version => {
            println!("reqcomp");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn print_settings(settings: &EncodingSettings, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
    } else {
        println!("{settings}");
    }
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, rust_log.as_deref())?;

    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();

    Ok(())
}

/// `RUST_LOG`, when set, replaces the `--log-level` default entirely
fn build_filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|s| !s.trim().is_empty()) {
        return EnvFilter::try_new(directives).with_context(|| {
            format!("Invalid {} directives: {directives}", EnvFilter::DEFAULT_ENV)
        });
    }

    let level = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::WARN,
    };

    Ok(EnvFilter::default().add_directive(level.into()))
}
