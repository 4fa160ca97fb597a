use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::subscriber as tracing_subscriber_global;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use anyhow::{Context, Result};
use pkce_gen as lib;
use lib::config::Config;
use lib::models::{CharMapping, CodeVerifier};
use lib::output::OutputFormat;
use lib::pkce::verifier::{log_adjustment, VerifierGenerator};

#[derive(Parser)]
#[command(name = "pkce-gen", version, about = "Generate an OAuth 2.0 PKCE code verifier and S256 challenge")]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verifier length; clamped into 43..=128
    #[arg(long, allow_negative_numbers = true)]
    length: Option<i64>,

    /// Use rejection sampling for a uniform character distribution
    #[arg(long)]
    uniform: bool,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Derive the challenge for this verifier instead of generating one
    #[arg(long, value_name = "VERIFIER", conflicts_with_all = ["length", "uniform"])]
    verifier: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(p) => Config::from_path(p)
            .with_context(|| format!("loading config from {}", p.display()))?,
        None => Config::default(),
    };
    if let Some(length) = cli.length {
        cfg.length = length;
    }
    if cli.uniform {
        cfg.mapping = CharMapping::Rejection;
    }
    if let Some(format) = cli.format {
        cfg.format = format;
    }

    // Diagnostics go to stderr so stdout carries only the verifier/challenge.
    let _ = LogTracer::init();
    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    // Honor RUST_LOG if set, otherwise the configured level.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    let stderr_layer = fmt::layer().with_writer(non_blocking).with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);
    tracing_subscriber_global::set_global_default(subscriber)
        .expect("failed to set global tracing subscriber");

    let verifier = match &cli.verifier {
        Some(v) => CodeVerifier::parse(v).context("invalid --verifier")?,
        None => {
            let generated = VerifierGenerator::new(cfg.mapping)
                .generate(cfg.length)
                .context("generating code verifier")?;
            if let Some(adj) = &generated.adjustment {
                log_adjustment(adj, generated.verifier.len());
            }
            generated.verifier
        }
    };
    let challenge = verifier.challenge();

    let out = lib::output::render(cfg.format, &verifier, &challenge)?;
    std::io::stdout()
        .write_all(out.as_bytes())
        .context("writing to stdout")?;

    Ok(())
}
