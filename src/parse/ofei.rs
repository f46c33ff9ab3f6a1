// src/parse/ofei.rs
//
// OFEI dispatch-offer files are sectioned by participant: an "AGENTE: <name>"
// header opens a section, and every line until the next header belongs to
// that participant. Only Type-D (dispatch) lines are ingested; the file also
// carries P/PAP/CONF and free-text lines, all of which are skipped.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::{fs, path::Path};
use tracing::{debug, warn};

use crate::parse::numeric::lenient_f64_flagged;
use crate::parse::{ParseStats, HOURS};

/// One Type-D line: the offering plant, its 24 hourly dispatch values, and
/// the participant whose section the line appeared in. `agent` is `None`
/// only for lines that precede the first section header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRecord {
    pub agent: Option<String>,
    pub plant: String,
    pub hours: [f64; HOURS],
}

/// Line-by-line OFEI reader. The only state carried across lines is the
/// current section's agent name.
pub struct OfeiParser {
    current_agent: Option<String>,
    type_d: Regex,
    stats: ParseStats,
}

impl OfeiParser {
    pub fn new() -> Self {
        Self {
            current_agent: None,
            // Cheap pre-check for ", D," before paying for a full split.
            type_d: Regex::new(r"(?i),\s*D\s*,").unwrap(),
            stats: ParseStats::default(),
        }
    }

    /// Process one raw line. Section headers update the agent context and
    /// yield nothing; Type-D lines yield a record; everything else is
    /// skipped silently.
    pub fn process_line(&mut self, raw_line: &str) -> Option<DispatchRecord> {
        self.stats.lines += 1;
        let line = raw_line.trim();

        let header = line.get(..7).map_or(false, |p| p.eq_ignore_ascii_case("AGENTE:"));
        if header {
            let name = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            self.current_agent = Some(name.to_string());
            return None;
        }

        if !self.type_d.is_match(line) {
            self.stats.skipped += 1;
            return None;
        }

        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < HOURS + 2 || !parts[1].trim().eq_ignore_ascii_case("D") {
            self.stats.skipped += 1;
            return None;
        }

        let mut hours = [0.0; HOURS];
        for (i, raw) in parts[2..2 + HOURS].iter().enumerate() {
            let (value, coerced) = lenient_f64_flagged(raw);
            if coerced {
                debug!(plant = parts[0].trim(), hour = i + 1, token = raw.trim(), "coerced hourly token to 0.0");
                self.stats.coerced += 1;
            }
            hours[i] = value;
        }

        self.stats.records += 1;
        Some(DispatchRecord {
            agent: self.current_agent.clone(),
            plant: parts[0].trim().to_string(),
            hours,
        })
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

impl Default for OfeiParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse OFEI text into Type-D records, in file order. Duplicate plants are
/// preserved: the same plant may legitimately offer under several sections.
pub fn parse_ofei_str(text: &str) -> (Vec<DispatchRecord>, ParseStats) {
    let mut parser = OfeiParser::new();
    let records: Vec<DispatchRecord> = text
        .lines()
        .filter_map(|line| parser.process_line(line))
        .collect();
    let stats = parser.stats();
    if stats.coerced > 0 {
        warn!(coerced = stats.coerced, "non-numeric hourly tokens defaulted to 0.0");
    }
    (records, stats)
}

/// Read and parse an OFEI file. Malformed byte sequences are replaced, not
/// rejected; these feeds are nominally UTF-8 but arrive with stray bytes.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn parse_ofei<P: AsRef<Path>>(path: P) -> Result<(Vec<DispatchRecord>, ParseStats)> {
    let bytes = fs::read(&path)
        .with_context(|| format!("reading OFEI file {:?}", path.as_ref()))?;
    let text = String::from_utf8_lossy(&bytes);
    let (records, stats) = parse_ofei_str(&text);
    debug!(
        lines = stats.lines,
        records = stats.records,
        skipped = stats.skipped,
        "OFEI parse complete"
    );
    Ok((records, stats))
}
