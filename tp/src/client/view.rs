//! Itinerary presentation
//!
//! Reads a generated itinerary out of the session store and keeps the
//! day-expansion state. At most one day is expanded at a time.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::storage::{SessionStorage, itinerary_key};
use crate::domain::{ActivityType, Day, Itinerary, parse_trip_date};

/// Shown in the duration card when the trip start has already passed
pub const PAST_DATE_LABEL: &str = "Invalid (Past Date)";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing stored under the id yet
    Loading,
    Ready {
        itinerary: Itinerary,
        expanded_day: Option<u32>,
    },
}

/// User actions offered below the itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    BackToForm,
    CreateNewPlan,
}

impl ViewAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::BackToForm => "Back to Form",
            Self::CreateNewPlan => "Create New Plan",
        }
    }
}

/// Display colour family for an activity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStyle {
    Orange,
    Blue,
    Purple,
    Green,
    Indigo,
    Pink,
    Teal,
    Grey,
}

pub fn activity_style(kind: &ActivityType) -> ActivityStyle {
    match kind {
        ActivityType::Dining => ActivityStyle::Orange,
        ActivityType::Sightseeing => ActivityStyle::Blue,
        ActivityType::Cultural => ActivityStyle::Purple,
        ActivityType::Outdoor => ActivityStyle::Green,
        ActivityType::Indoor => ActivityStyle::Indigo,
        ActivityType::Shopping => ActivityStyle::Pink,
        ActivityType::Wellness => ActivityStyle::Teal,
        ActivityType::Other(_) => ActivityStyle::Grey,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sun,
    Cloud,
    Umbrella,
}

impl WeatherIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::Cloud => "☁",
            Self::Umbrella => "☂",
        }
    }
}

/// Icon for a weather description; unknown weather gets the sun
pub fn weather_icon(weather: &str) -> WeatherIcon {
    match weather.to_lowercase().as_str() {
        "partly cloudy" => WeatherIcon::Cloud,
        "rainy" => WeatherIcon::Umbrella,
        _ => WeatherIcon::Sun,
    }
}

/// Contents of the three summary cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCards {
    pub duration: String,
    pub pace: String,
    pub budget: String,
}

pub struct ItineraryView {
    storage: SessionStorage,
    id: String,
    state: ViewState,
}

impl ItineraryView {
    /// Open the view for `id`, reading whatever is stored now
    pub fn load(storage: SessionStorage, id: impl Into<String>) -> Self {
        let id = id.into();
        debug!(%id, "ItineraryView::load: called");
        let mut view = Self {
            storage,
            id,
            state: ViewState::Loading,
        };
        view.refresh();
        view
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        match &self.state {
            ViewState::Ready { itinerary, .. } => Some(itinerary),
            ViewState::Loading => None,
        }
    }

    /// Re-read the store; a view already showing an itinerary keeps it
    pub fn refresh(&mut self) {
        if matches!(self.state, ViewState::Ready { .. }) {
            return;
        }
        match self.storage.get_json::<Itinerary>(&itinerary_key(&self.id)) {
            Ok(Some(itinerary)) => {
                debug!(id = %self.id, days = itinerary.days.len(), "ItineraryView::refresh: itinerary found");
                let expanded_day = itinerary.days.first().map(|_| 1);
                self.state = ViewState::Ready {
                    itinerary,
                    expanded_day,
                };
            }
            Ok(None) => {
                debug!(id = %self.id, "ItineraryView::refresh: not stored yet");
            }
            Err(e) => {
                warn!(id = %self.id, error = %e, "Stored itinerary is unreadable");
            }
        }
    }

    pub fn expanded_day(&self) -> Option<u32> {
        match &self.state {
            ViewState::Ready { expanded_day, .. } => *expanded_day,
            ViewState::Loading => None,
        }
    }

    /// Expand `day`, collapsing any other; toggling the expanded day collapses it
    pub fn toggle_day(&mut self, day: u32) {
        if let ViewState::Ready { expanded_day, .. } = &mut self.state {
            *expanded_day = if *expanded_day == Some(day) {
                debug!(%day, "ItineraryView::toggle_day: collapsing");
                None
            } else {
                debug!(%day, previous = ?expanded_day, "ItineraryView::toggle_day: expanding");
                Some(day)
            };
        }
    }

    pub fn is_expanded(&self, day: u32) -> bool {
        self.expanded_day() == Some(day)
    }

    /// Days with their expansion flag, in order
    pub fn days(&self) -> Vec<(&Day, bool)> {
        match &self.state {
            ViewState::Ready {
                itinerary,
                expanded_day,
            } => itinerary
                .days
                .iter()
                .map(|d| (d, Some(d.day) == *expanded_day))
                .collect(),
            ViewState::Loading => Vec::new(),
        }
    }

    /// Duration card text relative to `today`
    ///
    /// A start date that is missing, unparseable, or before today yields the
    /// past-date label.
    pub fn duration_display(&self, today: NaiveDate) -> Option<String> {
        let itinerary = self.itinerary()?;
        let start = itinerary
            .start_date
            .as_deref()
            .and_then(parse_trip_date)
            .map(|dt| dt.date());

        match start {
            Some(start) if start >= today => Some(itinerary.duration.clone()),
            _ => {
                debug!(?start, %today, "ItineraryView::duration_display: past or missing start");
                Some(PAST_DATE_LABEL.to_string())
            }
        }
    }

    pub fn summary(&self, today: NaiveDate) -> Option<SummaryCards> {
        let itinerary = self.itinerary()?;
        Some(SummaryCards {
            duration: self.duration_display(today)?,
            pace: itinerary.pace.clone(),
            budget: itinerary.budget.clone(),
        })
    }

    pub fn actions(&self) -> [ViewAction; 2] {
        [ViewAction::BackToForm, ViewAction::CreateNewPlan]
    }
}
