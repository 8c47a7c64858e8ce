//! Itinerary schema
//!
//! The shape the provider is instructed to return. Deserializing into these
//! types is the schema check: a response missing required fields, or carrying
//! wrongly-typed ones, is rejected rather than forwarded.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

/// Schema violations beyond what serde enforces
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Itinerary has no days")]
    NoDays,

    #[error("Day number must be >= 1, got {0}")]
    InvalidDayNumber(u32),

    #[error("Day {day} has an empty date")]
    MissingDate { day: u32 },

    #[error("Day {day} activity '{name}' has invalid time '{time}' (expected HH:MM)")]
    InvalidTime { day: u32, name: String, time: String },
}

/// A generated multi-day travel plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Assigned by the gateway when the provider omits it
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    pub destination: String,

    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,

    pub budget: String,

    pub pace: String,

    /// Echo of the request's start date, used by the view's past-date check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    pub days: Vec<Day>,
}

impl Itinerary {
    /// Check the constraints serde cannot express
    pub fn validate(&self) -> Result<(), SchemaError> {
        debug!(id = %self.id, day_count = self.days.len(), "Itinerary::validate: called");
        if self.days.is_empty() {
            debug!("Itinerary::validate: no days");
            return Err(SchemaError::NoDays);
        }
        for day in &self.days {
            if day.day == 0 {
                return Err(SchemaError::InvalidDayNumber(day.day));
            }
            if day.date.trim().is_empty() {
                return Err(SchemaError::MissingDate { day: day.day });
            }
            for activity in &day.activities {
                if NaiveTime::parse_from_str(activity.time.trim(), "%H:%M").is_err() {
                    debug!(day = day.day, time = %activity.time, "Itinerary::validate: bad activity time");
                    return Err(SchemaError::InvalidTime {
                        day: day.day,
                        name: activity.name.clone(),
                        time: activity.time.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a day by its 1-based number
    pub fn day(&self, number: u32) -> Option<&Day> {
        self.days.iter().find(|d| d.day == number)
    }
}

/// One day of the itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day: u32,
    pub date: String,
    pub weather: String,
    pub activities: Vec<Activity>,
}

/// A scheduled activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Start time as HH:MM
    pub time: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
}

/// Activity category
///
/// Open-ended: unrecognized categories are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Dining,
    Sightseeing,
    Cultural,
    Outdoor,
    Indoor,
    Shopping,
    Wellness,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dining => "dining",
            Self::Sightseeing => "sightseeing",
            Self::Cultural => "cultural",
            Self::Outdoor => "outdoor",
            Self::Indoor => "indoor",
            Self::Shopping => "shopping",
            Self::Wellness => "wellness",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ActivityType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "dining" => Self::Dining,
            "sightseeing" => Self::Sightseeing,
            "cultural" => Self::Cultural,
            "outdoor" => Self::Outdoor,
            "indoor" => Self::Indoor,
            "shopping" => Self::Shopping,
            "wellness" => Self::Wellness,
            _ => Self::Other(s),
        }
    }
}

impl From<ActivityType> for String {
    fn from(kind: ActivityType) -> Self {
        match kind {
            ActivityType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Models occasionally emit numbers where the schema says string
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}
