// Utility functions
use crate::model::PriceBand;
use chrono::NaiveDate;

/// Parses an ISO-8601 calendar date (`2025-03-14`).
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Parses the `$40-$80` wire format some upstream payloads use for ranges.
/// A single price (`$60`) collapses to a degenerate band.
pub fn parse_price_band(text: &str) -> Option<PriceBand> {
    let cleaned = text.trim().replace('$', "");
    let mut parts = cleaned.splitn(2, '-');
    let low: f64 = parts.next()?.trim().parse().ok()?;
    let high: f64 = match parts.next() {
        Some(p) => p.trim().parse().ok()?,
        None => low,
    };
    let band = PriceBand::new(low, high);
    band.is_well_formed().then_some(band)
}
