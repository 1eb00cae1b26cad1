//! DCF simulation sweep runner
//!
//! Drives every combination of arrival rate × topology (hidden
//! terminals on/off, virtual carrier sensing on/off) and writes the
//! flat list of per-station records as JSON, ready for an external
//! plotting or reporting tool.
//!
//! ```text
//! airtime [--seed N] [--out FILE]
//! ```

use std::fs;

use anyhow::{bail, Context, Result};
use dcf_sim::{SimConfig, Simulation, StationStats, ARRIVAL_RATES};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The four topology/VCS combinations the reference sweep covers
const TOPOLOGIES: [(bool, bool); 4] = [
    (false, false),
    (true, false),
    (false, true),
    (true, true),
];

struct Args {
    seed: u64,
    out: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { seed: 0, out: None };
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--seed" => {
                let value = iter.next().context("--seed needs a value")?;
                args.seed = value.parse().context("--seed must be an integer")?;
            }
            "--out" => {
                args.out = Some(iter.next().context("--out needs a path")?);
            }
            "--help" | "-h" => {
                eprintln!("usage: airtime [--seed N] [--out FILE]");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airtime=info,dcf_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;
    tracing::info!(seed = args.seed, "starting DCF sweep");

    let mut records: Vec<StationStats> = Vec::new();
    for rate in ARRIVAL_RATES {
        for (hidden, vcs) in TOPOLOGIES {
            let config = SimConfig {
                arrival_rate: rate,
                hidden_terminals: hidden,
                virtual_carrier_sensing: vcs,
                seed: args.seed,
                ..Default::default()
            };
            let label = config.topology_label();
            let stats = Simulation::new(config)
                .with_context(|| format!("configuring rate={rate} {label}"))?
                .run();
            for record in &stats.stations {
                tracing::info!(
                    rate,
                    topology = %label,
                    station = ?record.station,
                    successes = record.successes,
                    collisions = record.collisions,
                    throughput_bps = record.throughput_bps,
                    "run complete"
                );
            }
            records.extend(stats.stations);
        }
    }

    let json = serde_json::to_string_pretty(&records)?;
    match args.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("writing {path}"))?;
            tracing::info!(path = %path, records = records.len(), "wrote statistics");
        }
        None => println!("{json}"),
    }

    Ok(())
}
