use crate::forecast::MAX_FORECAST_DAYS;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the flood scoring pipeline.
///
/// Missing upstream data is normally absorbed by fallback constants; only
/// caller mistakes and unrecoverable feed problems reach this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FloodError {
    /// A forecast was requested for zero, a negative or an unreasonably
    /// large number of days.
    #[error("forecast day count must be between 1 and {max}, got {0}", max = MAX_FORECAST_DAYS)]
    InvalidDayCount(i64),

    /// The forecast window would run past the last representable date.
    #[error("a {days}-day forecast from {start} runs past the supported calendar")]
    DateOutOfRange { start: NaiveDate, days: i64 },

    /// A feed could not be read at all.
    #[error("failed to parse {feed} feed: {message}")]
    FeedParse { feed: &'static str, message: String },

    /// Upstream data could not be loaded and nothing cached can stand in.
    #[error("upstream data unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl FloodError {
    pub(crate) fn feed_parse(feed: &'static str, err: impl std::fmt::Display) -> Self {
        FloodError::FeedParse {
            feed,
            message: err.to_string(),
        }
    }
}
