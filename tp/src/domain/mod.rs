//! Domain types shared by the gateway and the planner client

mod itinerary;
mod trip;

pub use itinerary::{Activity, ActivityType, Day, Itinerary, SchemaError};
pub use trip::{Budget, Pace, TripRequest, parse_trip_date, trip_length_days};
