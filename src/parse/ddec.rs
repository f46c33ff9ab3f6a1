// src/parse/ddec.rs
//
// dDEC files are headerless comma-separated declarations: one line per
// plant, 24 hourly values, fields sometimes individually quote-wrapped,
// and a trailing grand-total line keyed "TOTAL".

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::{debug, warn};

use crate::parse::numeric::lenient_f64_flagged;
use crate::parse::{clean_field, ParseStats, HOURS};

/// One declared-generation line: plant key plus 24 hourly values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredGeneration {
    pub plant_key: String,
    pub hours: [f64; HOURS],
}

/// Parse dDEC text into records in file order. Blank lines, short lines and
/// the TOTAL summary line yield nothing.
pub fn parse_ddec_str(text: &str) -> (Vec<DeclaredGeneration>, ParseStats) {
    let mut stats = ParseStats::default();
    let mut records = Vec::new();

    for raw_line in text.lines() {
        stats.lines += 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(clean_field).collect();
        if parts.len() < HOURS + 1 {
            stats.skipped += 1;
            continue;
        }

        let plant_key = parts[0];
        if plant_key.eq_ignore_ascii_case("TOTAL") {
            stats.skipped += 1;
            continue;
        }

        let mut hours = [0.0; HOURS];
        for (i, raw) in parts[1..1 + HOURS].iter().enumerate() {
            let (value, coerced) = lenient_f64_flagged(raw);
            if coerced {
                debug!(plant = plant_key, hour = i + 1, token = *raw, "coerced hourly token to 0.0");
                stats.coerced += 1;
            }
            hours[i] = value;
        }

        stats.records += 1;
        records.push(DeclaredGeneration {
            plant_key: plant_key.to_string(),
            hours,
        });
    }

    if stats.coerced > 0 {
        warn!(coerced = stats.coerced, "non-numeric hourly tokens defaulted to 0.0");
    }
    (records, stats)
}

/// Read and parse a dDEC file, replacing malformed byte sequences.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn parse_ddec<P: AsRef<Path>>(path: P) -> Result<(Vec<DeclaredGeneration>, ParseStats)> {
    let bytes = fs::read(&path)
        .with_context(|| format!("reading dDEC file {:?}", path.as_ref()))?;
    let text = String::from_utf8_lossy(&bytes);
    let (records, stats) = parse_ddec_str(&text);
    debug!(
        lines = stats.lines,
        records = stats.records,
        skipped = stats.skipped,
        "dDEC parse complete"
    );
    Ok((records, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(plant: &str, value: f64) -> String {
        let values: Vec<String> = (0..HOURS).map(|_| value.to_string()).collect();
        format!("{}, {}", plant, values.join(", "))
    }

    #[test]
    fn parses_plain_lines() {
        let text = format!("{}\n{}\n", line("GUAVIO", 100.0), line("TEBSA", 50.0));
        let (records, stats) = parse_ddec_str(&text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].plant_key, "GUAVIO");
        assert_eq!(records[0].hours, [100.0; HOURS]);
        assert_eq!(records[1].plant_key, "TEBSA");
        assert_eq!(stats.records, 2);
    }

    #[test]
    fn strips_quotes_from_fields() {
        let values: Vec<String> = (1..=HOURS).map(|h| format!("\"{h}\"")).collect();
        let text = format!("\"GUAVIO\", {}\n", values.join(", "));
        let (records, _) = parse_ddec_str(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].plant_key, "GUAVIO");
        assert_eq!(records[0].hours[0], 1.0);
        assert_eq!(records[0].hours[23], 24.0);
    }

    #[test]
    fn total_row_is_excluded_any_case() {
        for key in ["TOTAL", "total", "Total"] {
            let text = format!("{}\n{}\n", line("GUAVIO", 1.0), line(key, 9999.0));
            let (records, _) = parse_ddec_str(&text);
            assert_eq!(records.len(), 1, "key {key:?} should be skipped");
            assert_eq!(records[0].plant_key, "GUAVIO");
        }
    }

    #[test]
    fn short_and_blank_lines_yield_nothing() {
        let text = format!("\n   \nGUAVIO, 1, 2, 3\n{}\n", line("TEBSA", 2.0));
        let (records, stats) = parse_ddec_str(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].plant_key, "TEBSA");
        assert_eq!(stats.skipped, 1); // only the short line counts as skipped
    }

    #[test]
    fn bad_tokens_default_to_zero() {
        let mut values: Vec<String> = (1..=HOURS).map(|h| h.to_string()).collect();
        values[4] = "??".to_string();
        let text = format!("GUAVIO, {}\n", values.join(", "));
        let (records, stats) = parse_ddec_str(&text);
        assert_eq!(records[0].hours[4], 0.0);
        assert_eq!(records[0].hours[5], 6.0);
        assert_eq!(stats.coerced, 1);
    }

    #[test]
    fn plant_key_case_and_spacing_preserved() {
        // the key itself is stored verbatim after field cleanup; no case folding
        let text = line("Guavio Menor", 1.0) + "\n";
        let (records, _) = parse_ddec_str(&text);
        assert_eq!(records[0].plant_key, "Guavio Menor");
    }
}
