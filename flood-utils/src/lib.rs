//! Shared utility functions for flood watch crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Parse a date string in "YYYYMMDD" format (compact feed format)
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y%m%d")?)
    }

    /// Parse the `last_updated` column of the reservoir feed.
    ///
    /// The feed has carried plain dates, `YYYY-MM-DD HH:MM:SS` timestamps and
    /// RFC 3339 timestamps over time. Anything else yields `None`.
    pub fn parse_feed_timestamp(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date());
        }
        parse_date(s).or_else(|_| parse_date_compact(s)).ok()
    }

    /// Three-letter English month abbreviation for months 1-12.
    pub fn month_abbrev(month: u32) -> &'static str {
        match month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            12 => "Dec",
            _ => "???",
        }
    }

}

/// Region and state name matching
pub mod names {
    /// Normalised key for a region or state name: trimmed and lowercased
    /// with full Unicode case mapping.
    pub fn region_key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// True when two names refer to the same region or state.
    pub fn same_region(a: &str, b: &str) -> bool {
        region_key(a) == region_key(b)
    }

}

/// Numeric helpers shared by the scoring code
pub mod numbers {
    /// Round to one decimal place.
    pub fn round_tenth(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }

    /// Read a possibly-missing or non-finite value as 0.
    pub fn finite_or_zero(value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }

}
