//! Travel Planner - AI-generated day-by-day travel itineraries
//!
//! A user describes a trip (destination, dates, interests, budget, pace); the
//! gateway asks an LLM for a structured itinerary and the planner client shows
//! it day by day.
//!
//! # Modules
//!
//! - [`domain`] - Trip requests and the itinerary schema
//! - [`gateway`] - HTTP gateway in front of the LLM provider
//! - [`llm`] - LLM client trait and OpenAI-compatible implementation
//! - [`prompts`] - Handlebars prompt templates
//! - [`client`] - Planner flows: form, loading, view, orchestrator
//! - [`render`] - Terminal rendering of the planner flows
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod llm;
pub mod prompts;
pub mod render;

pub use config::Config;
pub use domain::{Itinerary, TripRequest};
pub use gateway::{ItineraryService, create_router};
pub use llm::{LlmClient, LlmError};
