/// Site-wide settings: relationship start date and the custom message
use crate::error::{Result, SerenadeError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage format for `start_date`
pub const START_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Settings shown on the main page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// When the relationship started (local wall-clock time)
    pub start_date: NaiveDateTime,

    /// Message shown under the counter; empty hides it
    pub custom_message: String,
}

impl SiteSettings {
    /// Settings-store key of `start_date`
    pub const START_DATE_KEY: &'static str = "start_date";

    /// Settings-store key of `custom_message`
    pub const CUSTOM_MESSAGE_KEY: &'static str = "custom_message";

    pub fn new(start_date: NaiveDateTime, custom_message: impl Into<String>) -> Self {
        Self {
            start_date,
            custom_message: custom_message.into(),
        }
    }

    /// `start_date` in storage format
    pub fn start_date_string(&self) -> String {
        format_start_date(&self.start_date)
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        let start_date = NaiveDate::from_ymd_opt(2025, 11, 4)
            .and_then(|date| date.and_hms_opt(1, 0, 0))
            .unwrap_or_default();

        Self {
            start_date,
            custom_message: String::new(),
        }
    }
}

/// Format a start date for storage
pub fn format_start_date(date: &NaiveDateTime) -> String {
    date.format(START_DATE_FORMAT).to_string()
}

/// Parse a start date
///
/// Accepts the storage format, the same with minutes only, a bare date
/// (midnight), and RFC 3339 timestamps (offset dropped, wall-clock kept).
pub fn parse_start_date(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();

    for format in [START_DATE_FORMAT, "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(date);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }

    DateTime::parse_from_rfc3339(input)
        .map(|date| date.naive_local())
        .map_err(|_| SerenadeError::invalid_input(format!("invalid start date: {input}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_start_date() {
        let settings = SiteSettings::default();
        assert_eq!(settings.start_date_string(), "2025-11-04T01:00:00");
        assert!(settings.custom_message.is_empty());
    }

    #[test]
    fn parses_supported_formats() {
        let expected = parse_start_date("2024-02-14T20:30:00").unwrap();
        assert_eq!(parse_start_date("2024-02-14T20:30").unwrap(), expected);
        assert_eq!(parse_start_date("2024-02-14 20:30:00").unwrap(), expected);
        assert_eq!(parse_start_date("2024-02-14T20:30:00-03:00").unwrap(), expected);
        assert_eq!(
            format_start_date(&parse_start_date("2024-02-14").unwrap()),
            "2024-02-14T00:00:00"
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_start_date("next tuesday").unwrap_err();
        assert!(matches!(err, SerenadeError::InvalidInput(_)));
    }
}
