//! Preference form state machine
//!
//! Four linear steps. `next()` is gated on the current step's required input;
//! `prev()` and direct step selection are always allowed.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use super::storage::{REQUEST_SLOT, SessionStorage, StorageError};
use crate::domain::{Budget, Pace, TripRequest};

/// Suggestions offered under the destination field
pub const POPULAR_DESTINATIONS: &[&str] = &[
    "Paris, France",
    "Tokyo, Japan",
    "New York City, USA",
    "Rome, Italy",
    "Bangkok, Thailand",
    "London, UK",
];

/// Form steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum FormStep {
    #[default]
    Destination,
    Dates,
    Interests,
    Preferences,
}

impl FormStep {
    pub const ALL: [FormStep; 4] = [Self::Destination, Self::Dates, Self::Interests, Self::Preferences];

    /// 1-based step number
    pub fn number(self) -> u8 {
        match self {
            Self::Destination => 1,
            Self::Dates => 2,
            Self::Interests => 3,
            Self::Preferences => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Destination => "Destination",
            Self::Dates => "Trip Dates",
            Self::Interests => "Interests",
            Self::Preferences => "Preferences",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} '{value}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Where a submitted request goes
pub enum SubmitTarget<'a> {
    /// Overlay flow: hand the request straight to the owner
    Callback(Box<dyn FnOnce(TripRequest) + 'a>),
    /// Page flow: park the request in the session slot for the loading page
    Session(&'a SessionStorage),
}

/// Form field values and current step
#[derive(Debug, Clone, Default)]
pub struct PlannerForm {
    destination: String,
    start_date: String,
    end_date: String,
    interests: String,
    budget: Budget,
    pace: Pace,
    step: FormStep,
}

impl PlannerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn interests(&self) -> &str {
        &self.interests
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn set_destination(&mut self, value: impl Into<String>) {
        self.destination = value.into();
    }

    /// Pick one of the popular destinations by index
    pub fn choose_suggestion(&mut self, index: usize) -> bool {
        debug!(%index, "PlannerForm::choose_suggestion: called");
        match POPULAR_DESTINATIONS.get(index) {
            Some(suggestion) => {
                self.destination = suggestion.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_start_date(&mut self, value: impl Into<String>) {
        self.start_date = value.into();
    }

    pub fn set_end_date(&mut self, value: impl Into<String>) {
        self.end_date = value.into();
    }

    /// Comma-separated interests, as typed
    pub fn set_interests(&mut self, value: impl Into<String>) {
        self.interests = value.into();
    }

    pub fn set_budget(&mut self, budget: Budget) {
        self.budget = budget;
    }

    pub fn set_pace(&mut self, pace: Pace) {
        self.pace = pace;
    }

    /// Whether the current step's Continue control is enabled
    pub fn can_continue(&self) -> bool {
        let result = match self.step {
            FormStep::Destination => !self.destination.is_empty(),
            FormStep::Dates => !self.start_date.is_empty() && !self.end_date.is_empty(),
            FormStep::Interests => !self.interests.is_empty(),
            // Budget and pace always carry a value
            FormStep::Preferences => true,
        };
        debug!(step = ?self.step, result, "PlannerForm::can_continue: called");
        result
    }

    /// Advance one step if the current step is satisfied
    pub fn next(&mut self) -> bool {
        if !self.can_continue() {
            debug!(step = ?self.step, "PlannerForm::next: gated");
            return false;
        }
        match self.step.next() {
            Some(step) => {
                debug!(from = ?self.step, to = ?step, "PlannerForm::next: advancing");
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Go back one step; no-op on the first
    pub fn prev(&mut self) -> bool {
        match self.step.prev() {
            Some(step) => {
                debug!(from = ?self.step, to = ?step, "PlannerForm::prev: going back");
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Select a step directly from the step list
    pub fn jump_to(&mut self, step: FormStep) {
        debug!(from = ?self.step, to = ?step, "PlannerForm::jump_to: called");
        self.step = step;
    }

    /// Completion percentage in steps of 20
    pub fn progress(&self) -> u8 {
        let filled = [
            !self.destination.is_empty(),
            !self.start_date.is_empty(),
            !self.end_date.is_empty(),
            !self.interests.is_empty(),
            // budget && pace: both always set
            true,
        ];
        filled.iter().filter(|f| **f).count() as u8 * 20
    }

    /// Assemble the request from the current values
    pub fn build_request(&self) -> Result<TripRequest, FormError> {
        debug!("PlannerForm::build_request: called");
        let start_date = parse_date("startDate", &self.start_date)?;
        let end_date = parse_date("endDate", &self.end_date)?;
        let interests: Vec<String> = self.interests.split(',').map(|i| i.trim().to_string()).collect();

        Ok(TripRequest {
            destination: self.destination.clone(),
            start_date,
            end_date,
            interests,
            budget: self.budget,
            pace: self.pace,
        })
    }

    /// Build the request and hand it to `target`
    pub fn submit(&self, target: SubmitTarget<'_>) -> Result<TripRequest, FormError> {
        let request = self.build_request()?;
        info!(destination = %request.destination, "Submitting trip request");
        match target {
            SubmitTarget::Callback(callback) => {
                debug!("PlannerForm::submit: handing to callback");
                callback(request.clone());
            }
            SubmitTarget::Session(storage) => {
                debug!("PlannerForm::submit: storing in session slot");
                storage.set_json(REQUEST_SLOT, &request)?;
            }
        }
        Ok(request)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    if value.is_empty() {
        return Err(FormError::MissingField(field));
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
