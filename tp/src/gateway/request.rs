//! Incoming itinerary request payload and presence validation

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::GatewayError;
use crate::domain::{TripRequest, parse_trip_date, trip_length_days};

/// Error text returned with a 400 when any required field is missing
pub const REQUIRED_FIELDS_MESSAGE: &str =
    "All fields are required: destination, startDate, endDate, interests, budget, pace";

/// Raw request body as received
///
/// Every field is optional and loosely typed: the gateway only checks that each
/// one is present and non-empty, then carries the values into the prompt as given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPayload {
    pub destination: Option<Value>,
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
    pub interests: Option<Value>,
    pub budget: Option<Value>,
    pub pace: Option<Value>,
}

impl TripPayload {
    /// Decode a raw request body
    ///
    /// A non-JSON content type, an empty body, or a JSON value that is not an
    /// object all carry no fields. Only syntactically broken JSON is malformed.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> Result<Self, GatewayError> {
        debug!(?content_type, body_len = body.len(), "TripPayload::from_body: called");
        if !content_type.is_some_and(is_json_content_type) {
            debug!("TripPayload::from_body: not json, no fields");
            return Ok(Self::default());
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            debug!("TripPayload::from_body: empty body, no fields");
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => {
                serde_json::from_value(value).map_err(|e| GatewayError::MalformedBody(e.to_string()))
            }
            Ok(other) => {
                debug!(kind = ?other, "TripPayload::from_body: not an object, no fields");
                Ok(Self::default())
            }
            Err(e) => Err(GatewayError::MalformedBody(e.to_string())),
        }
    }

    /// Check presence of all six fields and flatten them to strings
    pub fn validate(self) -> Result<ItineraryParams, GatewayError> {
        debug!(?self, "TripPayload::validate: called");
        let fields = [
            ("destination", &self.destination),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
            ("interests", &self.interests),
            ("budget", &self.budget),
            ("pace", &self.pace),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !is_present(v)) {
            debug!(field = %name, "TripPayload::validate: missing field");
            return Err(GatewayError::MissingFields);
        }

        // All six are present past this point
        let text = |v: Option<Value>| v.map(value_to_string).unwrap_or_default();
        Ok(ItineraryParams {
            destination: text(self.destination),
            start_date: text(self.start_date),
            end_date: text(self.end_date),
            interests: self.interests.map(interests_from_value).unwrap_or_default(),
            budget: text(self.budget),
            pace: text(self.pace),
        })
    }
}

fn is_json_content_type(value: &str) -> bool {
    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Present and truthy: not null, not an empty string, not false or zero
fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn interests_from_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().map(value_to_string).collect(),
        other => vec![value_to_string(other)],
    }
}

/// Validated itinerary parameters, as handed to the prompt builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryParams {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub interests: Vec<String>,
    pub budget: String,
    pub pace: String,
}

impl ItineraryParams {
    /// Inclusive trip length, or None when either date is unparseable
    pub fn trip_length_days(&self) -> Option<u32> {
        let start = parse_trip_date(&self.start_date)?;
        let end = parse_trip_date(&self.end_date)?;
        Some(trip_length_days(start, end))
    }
}

impl From<&TripRequest> for ItineraryParams {
    fn from(request: &TripRequest) -> Self {
        Self {
            destination: request.destination.clone(),
            start_date: request.start_date.format("%Y-%m-%d").to_string(),
            end_date: request.end_date.format("%Y-%m-%d").to_string(),
            interests: request.interests.clone(),
            budget: request.budget.to_string(),
            pace: request.pace.to_string(),
        }
    }
}
