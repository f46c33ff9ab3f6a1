// src/parse/numeric.rs

/// Parse an hourly token into f64, falling back to 0.0 on anything
/// unparsable. Real feeds carry blanks, stray text and locale noise in
/// hourly columns; a bad cell must never halt ingestion.
pub fn lenient_f64(raw: &str) -> f64 {
    lenient_f64_flagged(raw).0
}

/// Same as [`lenient_f64`], also reporting whether the fallback fired.
/// Non-finite parses ("nan", "inf") count as fallbacks: every stored
/// hourly value is finite.
pub fn lenient_f64_flagged(raw: &str) -> (f64, bool) {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => (v, false),
        _ => (0.0, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(lenient_f64("42"), 42.0);
        assert_eq!(lenient_f64("-3.25"), -3.25);
        assert_eq!(lenient_f64("  17.0  "), 17.0);
        assert_eq!(lenient_f64("0"), 0.0);
    }

    #[test]
    fn defaults_bad_tokens_to_zero() {
        assert_eq!(lenient_f64(""), 0.0);
        assert_eq!(lenient_f64("   "), 0.0);
        assert_eq!(lenient_f64("N/A"), 0.0);
        assert_eq!(lenient_f64("1,5"), 0.0); // comma decimal separator
        assert_eq!(lenient_f64("12abc"), 0.0);
    }

    #[test]
    fn non_finite_tokens_default_to_zero() {
        assert_eq!(lenient_f64("nan"), 0.0);
        assert_eq!(lenient_f64("inf"), 0.0);
        assert_eq!(lenient_f64("-inf"), 0.0);
    }

    #[test]
    fn flag_reports_fallback() {
        assert_eq!(lenient_f64_flagged("7.5"), (7.5, false));
        assert_eq!(lenient_f64_flagged("x"), (0.0, true));
        assert_eq!(lenient_f64_flagged("0.0"), (0.0, false));
    }
}
