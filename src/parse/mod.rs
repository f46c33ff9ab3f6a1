// src/parse/mod.rs

pub mod ddec;
pub mod numeric;
pub mod ofei;

pub use ddec::{parse_ddec, parse_ddec_str, DeclaredGeneration};
pub use ofei::{parse_ofei, parse_ofei_str, DispatchRecord};

/// Number of hourly values every OFEI and dDEC record carries.
pub const HOURS: usize = 24;

/// Per-file ingestion counters, surfaced in logs and the run summary.
/// Skipped lines and coerced tokens are expected in real feeds and are
/// never errors.
#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct ParseStats {
    /// Lines read from the source, including blanks and headers.
    pub lines: u64,
    /// Records emitted.
    pub records: u64,
    /// Lines that matched no record shape and were dropped.
    pub skipped: u64,
    /// Hourly tokens that failed numeric parsing and defaulted to 0.0.
    pub coerced: u64,
}

/// Trim whitespace + strip one pair of outer quotes if present.
pub fn clean_field(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
