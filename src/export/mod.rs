// src/export/mod.rs
//
// Delimited exports of the pipeline artifacts. Files get a UTF-8 BOM so the
// back office can open them in Excel without mangling accented plant and
// agent names.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};
use tracing::info;

use crate::parse::{DispatchRecord, ParseStats, HOURS};
use crate::reconcile::ReconciledRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Counts reported at the end of a pipeline run, written as JSON next to
/// the CSV exports.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_at: String,
    pub registry_rows: usize,
    pub registry_kept: usize,
    pub ddec: ParseStats,
    pub reconciled_rows: usize,
}

impl RunSummary {
    pub fn new(
        registry_rows: usize,
        registry_kept: usize,
        ddec: ParseStats,
        reconciled_rows: usize,
    ) -> Self {
        Self {
            run_at: chrono::Utc::now().to_rfc3339(),
            registry_rows,
            registry_kept,
            ddec,
            reconciled_rows,
        }
    }
}

fn bom_writer(path: &Path) -> Result<csv::Writer<File>> {
    let mut file =
        File::create(path).with_context(|| format!("creating export file {path:?}"))?;
    file.write_all(UTF8_BOM).context("writing BOM")?;
    Ok(csv::Writer::from_writer(file))
}

fn hour_headers() -> Vec<String> {
    (1..=HOURS).map(|h| format!("Hora_{h}")).collect()
}

fn fmt_f64(v: f64) -> String {
    v.to_string()
}

/// Write the OFEI Type-D audit table: Agente, Planta, Hora_1..Hora_24.
pub fn write_dispatch_csv(path: &Path, records: &[DispatchRecord]) -> Result<()> {
    let mut writer = bom_writer(path)?;

    let mut header = vec!["Agente".to_string(), "Planta".to_string()];
    header.extend(hour_headers());
    writer.write_record(&header).context("writing header")?;

    for r in records {
        let mut row = vec![r.agent.clone().unwrap_or_default(), r.plant.clone()];
        row.extend(r.hours.iter().map(|v| fmt_f64(*v)));
        writer.write_record(&row).context("writing dispatch row")?;
    }
    writer.flush().context("flushing dispatch export")?;
    info!(rows = records.len(), path = %path.display(), "dispatch table exported");
    Ok(())
}

/// Write the final reconciled table: Nombre_Agente, Agente_OFEI, Central,
/// Tipo_Central, Hora_1..Hora_24, Suma_Horas.
pub fn write_reconciled_csv(path: &Path, records: &[ReconciledRecord]) -> Result<()> {
    let mut writer = bom_writer(path)?;

    let mut header = vec![
        "Nombre_Agente".to_string(),
        "Agente_OFEI".to_string(),
        "Central".to_string(),
        "Tipo_Central".to_string(),
    ];
    header.extend(hour_headers());
    header.push("Suma_Horas".to_string());
    writer.write_record(&header).context("writing header")?;

    for r in records {
        let mut row = vec![
            r.visible_agent_name.clone(),
            r.ofei_agent_code.clone(),
            r.plant_key.clone(),
            r.plant_type.clone(),
        ];
        row.extend(r.hours.iter().map(|v| fmt_f64(*v)));
        row.push(fmt_f64(r.total_hours));
        writer.write_record(&row).context("writing reconciled row")?;
    }
    writer.flush().context("flushing reconciled export")?;
    info!(rows = records.len(), path = %path.display(), "reconciled table exported");
    Ok(())
}

/// Write the run summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing run summary")?;
    fs::write(path, json).with_context(|| format!("writing run summary {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MasterRecord;

    #[test]
    fn dispatch_csv_has_bom_header_and_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ofei_tipo_d.csv");

        let records = vec![DispatchRecord {
            agent: Some("ACME".into()),
            plant: "P1".into(),
            hours: [1.5; HOURS],
        }];
        write_dispatch_csv(&path, &records)?;

        let bytes = fs::read(&path)?;
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec())?;
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Agente,Planta,Hora_1,"));
        assert!(header.ends_with("Hora_24"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("ACME,P1,1.5,"));
        Ok(())
    }

    #[test]
    fn reconciled_csv_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("emgesa_ht.csv");

        let m = MasterRecord {
            visible_agent_name: "EMGESA".into(),
            ofei_agent_code: "E1".into(),
            plant_key: "PLANTA_A".into(),
            plant_type: "H".into(),
        };
        let records = vec![ReconciledRecord {
            visible_agent_name: m.visible_agent_name,
            ofei_agent_code: m.ofei_agent_code,
            plant_key: m.plant_key,
            plant_type: m.plant_type,
            hours: [5.0; HOURS],
            total_hours: 120.0,
        }];
        write_reconciled_csv(&path, &records)?;

        let bytes = fs::read(&path)?;
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec())?;
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap().split(',').last().unwrap(),
            "Suma_Horas"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("EMGESA,E1,PLANTA_A,H,5,"));
        assert!(row.ends_with(",120"));
        Ok(())
    }

    #[test]
    fn summary_json_is_written() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("summary.json");
        let summary = RunSummary::new(10, 3, ParseStats::default(), 2);
        write_summary_json(&path, &summary)?;
        let text = fs::read_to_string(&path)?;
        assert!(text.contains("\"registry_kept\": 3"));
        assert!(text.contains("\"reconciled_rows\": 2"));
        Ok(())
    }
}
