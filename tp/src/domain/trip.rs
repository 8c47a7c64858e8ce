//! Trip request types and trip-length arithmetic

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

const MS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Spending level for the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Budget,
    #[default]
    Medium,
    Luxury,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Medium => "medium",
            Self::Luxury => "luxury",
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Budget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "Budget::from_str: called");
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(Self::Budget),
            "medium" => Ok(Self::Medium),
            "luxury" => Ok(Self::Luxury),
            other => Err(format!("Unknown budget '{}'. Expected: budget, medium, luxury", other)),
        }
    }
}

/// How packed each day should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    #[default]
    Moderate,
    Intense,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relaxed => "relaxed",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Pace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "Pace::from_str: called");
        match s.trim().to_lowercase().as_str() {
            "relaxed" => Ok(Self::Relaxed),
            "moderate" => Ok(Self::Moderate),
            "intense" => Ok(Self::Intense),
            other => Err(format!("Unknown pace '{}'. Expected: relaxed, moderate, intense", other)),
        }
    }
}

/// Trip parameters submitted by the planner form
///
/// Serialized with camelCase keys so the wire shape matches
/// `POST /api/itinerary`. End date is not required to follow the start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interests: Vec<String>,
    pub budget: Budget,
    pub pace: Pace,
}

impl TripRequest {
    /// Inclusive number of calendar days covered by the trip
    pub fn trip_length_days(&self) -> u32 {
        debug!(start = %self.start_date, end = %self.end_date, "TripRequest::trip_length_days: called");
        trip_length_days(
            self.start_date.and_time(NaiveTime::MIN),
            self.end_date.and_time(NaiveTime::MIN),
        )
    }
}

/// Inclusive day count between two instants
///
/// The absolute difference is rounded up to whole days, then one is added so a
/// same-day trip counts as one day.
pub fn trip_length_days(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
    let diff_ms = (end - start).num_milliseconds().unsigned_abs();
    let days = diff_ms.div_ceil(MS_PER_DAY) + 1;
    debug!(%diff_ms, %days, "trip_length_days: computed");
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Parse a date string the way a browser date input produces it
///
/// Accepts `YYYY-MM-DD` (midnight) and full `YYYY-MM-DDTHH:MM:SS` forms, with or
/// without a UTC offset.
pub fn parse_trip_date(s: &str) -> Option<NaiveDateTime> {
    debug!(%s, "parse_trip_date: called");
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        debug!("parse_trip_date: plain date");
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        debug!("parse_trip_date: rfc3339 timestamp");
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        debug!("parse_trip_date: naive timestamp");
        return Some(dt);
    }
    debug!("parse_trip_date: unparseable");
    None
}
