//! Itinerary Request Gateway
//!
//! `POST /api/itinerary` validates that every trip field is present, renders
//! the prompt, makes one provider call and returns the schema-checked
//! itinerary. Missing fields are a 400; everything downstream is an opaque 500.

mod error;
mod request;
mod server;
mod service;

pub use error::{GatewayError, SERVER_ERROR_BODY};
pub use request::{ItineraryParams, REQUIRED_FIELDS_MESSAGE, TripPayload};
pub use server::{AppState, ROOT_MESSAGE, create_router, serve};
pub use service::{ItineraryService, ensure_id, parse_itinerary};
