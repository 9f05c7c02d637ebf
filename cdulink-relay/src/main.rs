//! CDULINK relay — entry point.
//!
//! ```text
//! cdulink-relay                    Run with defaults (test pattern)
//! cdulink-relay --config <path>    Load a config TOML
//! cdulink-relay --gen-config       Write default config to stdout
//! cdulink-relay --sides 0,1        Pilot/copilot side selection
//! ```

mod config;
mod pattern;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cdulink_core::{CduService, DatagramFanout};

use config::RelayConfig;
use pattern::TestPatternSource;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cdulink-relay", about = "CDU display streaming relay")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "cdulink-relay.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Pilot,copilot side indices (e.g. "0,1").
    #[arg(long, default_value = "0,0")]
    sides: String,
}

fn parse_sides(value: &str) -> Result<(i32, i32), String> {
    let mut parts = value.splitn(2, ',');
    let pilot = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(|| format!("invalid --sides value: {value}"))?;
    let copilot = match parts.next() {
        Some(p) => p
            .trim()
            .parse()
            .map_err(|_| format!("invalid --sides value: {value}"))?,
        None => pilot,
    };
    Ok((pilot, copilot))
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&RelayConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    // Load config.
    let cfg = RelayConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("cdulink-relay v{}", env!("CARGO_PKG_VERSION"));

    let (pilot, copilot) = parse_sides(&cli.sides)?;
    let destinations = cfg.destinations()?;
    for dest in &destinations {
        info!("destination: {}", dest.addr);
    }

    let fanout = DatagramFanout::bind(cfg.network.bind.parse()?, destinations).await?;
    info!("bound {}", fanout.socket().local_addr()?);

    let source = TestPatternSource::new(pilot, copilot);
    let mut service = CduService::with_config(source, fanout, cfg.to_service_config());

    // Ctrl-C handler.
    let stop = service.stop_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received — shutting down");
        stop.store(false, std::sync::atomic::Ordering::SeqCst);
    });

    info!("streaming test pattern (pilot side {pilot}, copilot side {copilot})");
    service.run().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_parse() {
        assert_eq!(parse_sides("0,1").unwrap(), (0, 1));
        assert_eq!(parse_sides("1").unwrap(), (1, 1));
        assert!(parse_sides("x,y").is_err());
    }
}
