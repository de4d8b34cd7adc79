//! Sample parsing, ordering and weekly date arithmetic

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{ForecastError, Result};

/// Days per forecast period
pub const DAYS_PER_WEEK: u64 = 7;

/// One (timestamp, value) observation as received from the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Sample {
    /// ISO-8601 timestamp
    pub timestamp: String,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// Sample with its timestamp parsed
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    /// Timestamp exactly as the caller sent it
    pub timestamp: String,
    pub at: DateTime<Utc>,
    pub value: f64,
}

/// Samples ordered ascending by time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }
}

/// Parse an ISO-8601 timestamp into UTC
///
/// Accepted forms:
/// - RFC 3339 with `Z` or a numeric offset (`2024-01-01T08:30:00+02:00`)
/// - minute precision with `Z` or an offset (`2024-01-01T08:30Z`)
/// - date-time without offset, read as UTC (`2024-01-01T08:30:00.250`)
/// - bare date, year-month or year, read as UTC midnight at the start of
///   the period (`2024-01-01`, `2024-01`, `2024`)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = parse_minutes_with_offset(s) {
        return Some(dt);
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    parse_calendar_date(s)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// `YYYY-MM-DDTHH:MM` followed by `Z` or `±HH:MM`
fn parse_minutes_with_offset(s: &str) -> Option<DateTime<Utc>> {
    let with_offset = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(local) => format!("{}+00:00", local),
        None => s.to_string(),
    };
    DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M%:z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`
fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let is_digits =
        |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());

    let mut parts = s.split('-');
    let year = parts.next().filter(|p| is_digits(p, 4))?.parse().ok()?;
    let month = match parts.next() {
        Some(p) if is_digits(p, 2) => p.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    let day = match parts.next() {
        Some(p) if is_digits(p, 2) => p.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse and stably sort samples by time
///
/// Samples sharing a timestamp keep their input order; nothing is deduplicated.
pub fn normalize(samples: &[Sample]) -> Result<Series> {
    let mut points = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let at = parse_timestamp(&sample.timestamp)
                .ok_or_else(|| ForecastError::invalid_timestamp(index, &sample.timestamp))?;
            Ok(SeriesPoint {
                timestamp: sample.timestamp.clone(),
                at,
                value: sample.value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // `sort_by` is stable
    points.sort_by(|a, b| a.at.cmp(&b.at));

    Ok(Series { points })
}

/// UTC midnight of the day `weeks` weeks after `base`
pub fn add_weeks_at_midnight(base: DateTime<Utc>, weeks: usize) -> Result<DateTime<Utc>> {
    let days = (weeks as u64)
        .checked_mul(DAYS_PER_WEEK)
        .ok_or_else(|| ForecastError::date_out_of_range(format!("{} weeks", weeks)))?;

    base.date_naive()
        .checked_add_days(Days::new(days))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ForecastError::date_out_of_range(format!("{} + {} weeks", format_timestamp(base), weeks))
        })
}

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
