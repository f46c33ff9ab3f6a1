// src/registry/mod.rs
//
// The master plant registry is maintained as a spreadsheet by the market
// back office. Only one worksheet and four of its columns matter here; the
// column headers are fixed strings (one of them contains a literal "…").
// A missing worksheet or header is a schema error and aborts the run, in
// contrast to the per-line tolerance of the text parsers.

pub mod filter;

pub use filter::filter_target_plants;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Worksheet holding the official registry.
pub const MASTER_SHEET: &str = "Master Data Oficial";

/// Exact header text of the four columns to extract, in canonical order.
pub const HEADER_AGENT_NAME: &str = "Nombre visible Agente";
pub const HEADER_AGENT_CODE: &str = "AGENTE (OFEI)";
pub const HEADER_PLANT_KEY: &str = "CENTRAL (dDEC, dSEGDES, dPRU\u{2026})";
pub const HEADER_PLANT_TYPE: &str = "Tipo de central (Hidro, Termo, Filo, Menor)";

/// One registry row, renamed to canonical fields. Values are stored exactly
/// as the cells convert to text; normalization happens only at comparison
/// time in the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterRecord {
    pub visible_agent_name: String,
    pub ofei_agent_code: String,
    pub plant_key: String,
    pub plant_type: String,
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract [`MasterRecord`]s from the registry worksheet range. The first
/// row must contain all four expected headers; every following row yields
/// one record, unfiltered.
pub fn extract_master_records(range: &Range<Data>) -> Result<Vec<MasterRecord>> {
    let mut rows = range.rows();
    let header_row = match rows.next() {
        Some(row) => row,
        None => bail!("registry worksheet '{MASTER_SHEET}' is empty"),
    };

    let idx = |header: &str| -> Result<usize> {
        header_row
            .iter()
            .position(|c| matches!(c, Data::String(s) if s == header))
            .with_context(|| format!("registry worksheet '{MASTER_SHEET}' is missing column '{header}'"))
    };

    let name_idx = idx(HEADER_AGENT_NAME)?;
    let code_idx = idx(HEADER_AGENT_CODE)?;
    let key_idx = idx(HEADER_PLANT_KEY)?;
    let type_idx = idx(HEADER_PLANT_TYPE)?;

    let cell = |row: &[Data], i: usize| row.get(i).map(cell_to_string).unwrap_or_default();

    let records = rows
        .map(|row| MasterRecord {
            visible_agent_name: cell(row, name_idx),
            ofei_agent_code: cell(row, code_idx),
            plant_key: cell(row, key_idx),
            plant_type: cell(row, type_idx),
        })
        .collect();
    Ok(records)
}

/// Load the master registry from an xlsx asset.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_master_registry<P: AsRef<Path>>(path: P) -> Result<Vec<MasterRecord>> {
    let mut workbook = open_workbook_auto(&path)
        .with_context(|| format!("opening master registry {:?}", path.as_ref()))?;
    let range = workbook
        .worksheet_range(MASTER_SHEET)
        .with_context(|| format!("registry is missing worksheet '{MASTER_SHEET}'"))?;
    let records = extract_master_records(&range)?;
    debug!(rows = records.len(), "master registry loaded");
    Ok(records)
}
