// =============================================================================
// kline-indicators — CLI Entry Point
// =============================================================================
//
// Reads a JSON array of daily bars (oldest first), computes one indicator
// snapshot and prints it to stdout. Every option can also come from the
// environment (a `.env` file is honoured); `RUST_LOG` sets the tracing filter.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kline_indicators::{report, Bar, EngineConfig, IndicatorEngine};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute a technical-indicator snapshot from daily bars")]
struct Cli {
    /// JSON array of bars, oldest first
    bars: PathBuf,

    /// Live quote for today's still-forming bar
    live_price: Option<f64>,

    /// Engine config file; defaults are used if it cannot be loaded
    #[arg(long, env = "KLINE_CONFIG", default_value = "engine_config.json")]
    config: PathBuf,

    /// Blend the live quote into EMA while the session is open (default from config)
    #[arg(long, env = "KLINE_REAL_TIME", value_parser = clap::builder::BoolishValueParser::new())]
    real_time: Option<bool>,

    /// RFC-3339 wall clock used for session classification (default: now)
    #[arg(long, env = "KLINE_NOW", value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    #[arg(long, env = "KLINE_FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC-3339 timestamp: {e}"))
}

fn main() -> Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── 2. Config ────────────────────────────────────────────────────────
    let config = EngineConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, path = %cli.config.display(), "Failed to load config, using defaults");
        EngineConfig::default()
    });
    let want_real_time = cli.real_time.unwrap_or(config.include_real_time);
    let now = cli.now.unwrap_or_else(Utc::now);

    // ── 3. Bars ──────────────────────────────────────────────────────────
    let content = std::fs::read_to_string(&cli.bars)
        .with_context(|| format!("failed to read bars from {}", cli.bars.display()))?;
    let bars: Vec<Bar> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse bars from {}", cli.bars.display()))?;

    // ── 4. Compute & print ───────────────────────────────────────────────
    let engine = IndicatorEngine::new(config).context("invalid engine config")?;

    info!(
        path = %cli.bars.display(),
        bars = bars.len(),
        window = engine.config().window,
        timezone = %engine.classifier().timezone(),
        live_price = ?cli.live_price,
        want_real_time,
        "computing indicators"
    );

    let snapshot = engine
        .compute(&bars, cli.live_price, want_real_time, now)
        .context("indicator computation failed")?;

    info!(session = %snapshot.session, blended = snapshot.blended, "snapshot ready");

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&snapshot)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report::to_interchange(&snapshot))?
        ),
    }

    Ok(())
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
    fn parses_bars_and_live_price() {
        let cli = Cli::try_parse_from(["kline-indicators", "bars.json", "11.6"]).unwrap();
        assert_eq!(cli.bars, PathBuf::from("bars.json"));
        assert_eq!(cli.live_price, Some(11.6));
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "kline-indicators",
            "--real-time",
            "false",
            "--now",
            "2024-03-04T10:00:00+08:00",
            "--format",
            "text",
            "bars.json",
        ])
        .unwrap();
        assert_eq!(cli.real_time, Some(false));
        assert_eq!(cli.now, Some("2024-03-04T02:00:00Z".parse::<DateTime<Utc>>().unwrap()));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.live_price.is_none());
    }

    #[test]
    fn rejects_missing_bars_and_bad_values() {
        assert!(Cli::try_parse_from(["kline-indicators"]).is_err());
        assert!(Cli::try_parse_from(["kline-indicators", "bars.json", "abc"]).is_err());
        assert!(Cli::try_parse_from(["kline-indicators", "--now", "yesterday", "bars.json"]).is_err());
        assert!(Cli::try_parse_from(["kline-indicators", "--format", "xml", "bars.json"]).is_err());
    }

    #[test]
    fn help_is_not_read_as_a_bars_path() {
        let err = Cli::try_parse_from(["kline-indicators", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
