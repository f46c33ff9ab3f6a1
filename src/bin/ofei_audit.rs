//! OFEI ingestion audit: extract the Type-D dispatch records from one OFEI
//! file, report counts, and export the table for inspection.

use anyhow::Result;
use std::{collections::HashSet, env, fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use xmrecon::{export::write_dispatch_csv, parse::parse_ofei};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let mut args = env::args().skip(1);
    let ofei_path = PathBuf::from(args.next().unwrap_or_else(|| "data/OFEI1204.txt".into()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "outputs".into()));
    fs::create_dir_all(&out_dir)?;

    let (records, stats) = parse_ofei(&ofei_path)?;

    let agents: HashSet<&str> = records
        .iter()
        .filter_map(|r| r.agent.as_deref())
        .collect();
    info!(
        records = records.len(),
        agents = agents.len(),
        lines = stats.lines,
        skipped = stats.skipped,
        coerced = stats.coerced,
        "OFEI Type-D extraction"
    );

    write_dispatch_csv(&out_dir.join("resultado_ofei_tipo_d.csv"), &records)?;
    Ok(())
}
