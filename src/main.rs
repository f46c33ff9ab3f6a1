use anyhow::Result;
use std::{env, fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use xmrecon::{
    export::{write_reconciled_csv, write_summary_json, RunSummary},
    parse::parse_ddec,
    reconcile::reconcile,
    registry::{filter_target_plants, load_master_registry},
};

/// Participant under reconciliation, as it appears in the registry (both
/// the visible name and the short OFEI code are accepted).
const TARGET_AGENTS: &[&str] = &["EMGESA", "EMGESA S.A."];
/// Technology types in scope: hydro and thermal.
const TARGET_TYPES: &[&str] = &["H", "T"];

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) resolve paths ────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let master_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "data/Datos_Maestros_VF.xlsx".into()),
    );
    let ddec_path = PathBuf::from(args.next().unwrap_or_else(|| "data/dDEC1204.TXT".into()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "outputs".into()));
    fs::create_dir_all(&out_dir)?;

    // ─── 3) load + filter master registry ────────────────────────────
    let registry = load_master_registry(&master_path)?;
    info!(rows = registry.len(), "master registry loaded");

    let plants = filter_target_plants(&registry, TARGET_AGENTS, TARGET_TYPES);
    info!(plants = plants.len(), agents = ?TARGET_AGENTS, "target plants selected");

    // ─── 4) parse declared generation ────────────────────────────────
    let (declared, ddec_stats) = parse_ddec(&ddec_path)?;
    info!(
        records = declared.len(),
        skipped = ddec_stats.skipped,
        coerced = ddec_stats.coerced,
        "dDEC parsed"
    );

    // ─── 5) reconcile ────────────────────────────────────────────────
    let reconciled = reconcile(&plants, &declared);
    info!(rows = reconciled.len(), "plants with positive declared output");
    for r in &reconciled {
        info!(
            central = %r.plant_key,
            tipo = %r.plant_type,
            suma_horas = r.total_hours,
            "reconciled"
        );
    }

    // ─── 6) export ───────────────────────────────────────────────────
    write_reconciled_csv(&out_dir.join("resultado_emgesa_ht.csv"), &reconciled)?;
    let summary = RunSummary::new(registry.len(), plants.len(), ddec_stats, reconciled.len());
    write_summary_json(&out_dir.join("resumen_corrida.json"), &summary)?;

    info!("all done");
    Ok(())
}
