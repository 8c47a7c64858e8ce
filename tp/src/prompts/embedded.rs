//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// User prompt describing the trip and the expected JSON shape
pub const ITINERARY: &str = include_str!("../../prompts/itinerary.pmt");

/// System prompt establishing the planner persona
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "itinerary" => {
            debug!("get_embedded: matched itinerary");
            Some(ITINERARY)
        }
        "system" => {
            debug!("get_embedded: matched system");
            Some(SYSTEM)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_itinerary() {
        let itinerary = get_embedded("itinerary").unwrap();
        assert!(itinerary.contains("{{destination}}"));
        assert!(itinerary.contains("\"activities\""));
        assert!(itinerary.contains("HH:MM"));
    }

    #[test]
    fn test_get_embedded_system() {
        assert!(get_embedded("system").unwrap().contains("travel planner"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
