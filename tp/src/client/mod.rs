//! Planner client
//!
//! The user-facing side of the system: the preference form, the loading flow
//! that calls the gateway, the itinerary view and the orchestrator that moves
//! between them. State handed between flows goes through [`SessionStorage`].

pub mod api;
pub mod form;
pub mod loading;
pub mod orchestrator;
pub mod progress;
pub mod storage;
pub mod view;

pub use api::{ApiError, HttpGateway, ItineraryGateway};
pub use form::{FormError, FormStep, POPULAR_DESTINATIONS, PlannerForm, SubmitTarget};
pub use loading::{LoadingError, LoadingFlow, LoadingOutcome, LoadingTimings, RecoveryAction};
pub use orchestrator::{ModalView, Orchestrator, Presentation, Route, Screen};
pub use progress::{ProgressSimulator, ProgressSnapshot, STATUS_MESSAGES};
pub use storage::{REQUEST_SLOT, SessionStorage, StorageError, itinerary_key};
pub use view::{
    ActivityStyle, ItineraryView, PAST_DATE_LABEL, SummaryCards, ViewAction, ViewState, WeatherIcon, activity_style,
    weather_icon,
};

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::domain::{Activity, ActivityType, Budget, Day, Itinerary, Pace, TripRequest};

    pub fn sample_request() -> TripRequest {
        TripRequest {
            destination: "Paris".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            interests: vec!["museums".to_string(), "food".to_string()],
            budget: Budget::Medium,
            pace: Pace::Moderate,
        }
    }

    fn day(n: u32, date: &str, weather: &str) -> Day {
        Day {
            day: n,
            date: date.to_string(),
            weather: weather.to_string(),
            activities: vec![
                Activity {
                    time: "09:00".to_string(),
                    name: "Breakfast".to_string(),
                    description: "Croissants".to_string(),
                    kind: ActivityType::Dining,
                },
                Activity {
                    time: "11:00".to_string(),
                    name: "Louvre".to_string(),
                    description: "Art".to_string(),
                    kind: ActivityType::Cultural,
                },
            ],
        }
    }

    pub fn sample_itinerary(id: &str) -> Itinerary {
        Itinerary {
            id: id.to_string(),
            destination: "Paris".to_string(),
            duration: "3 days".to_string(),
            budget: "medium".to_string(),
            pace: "moderate".to_string(),
            start_date: Some("2025-06-01".to_string()),
            end_date: Some("2025-06-03".to_string()),
            days: vec![
                day(1, "2025-06-01", "Sunny"),
                day(2, "2025-06-02", "Partly Cloudy"),
                day(3, "2025-06-03", "Rainy"),
            ],
        }
    }
}
