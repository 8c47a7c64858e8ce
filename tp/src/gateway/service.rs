//! Itinerary generation: prompt, provider call, schema check, id assignment

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{GatewayError, ItineraryParams};
use crate::domain::Itinerary;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, ResponseFormat, StopReason};
use crate::prompts::{PromptContext, PromptLoader};

/// Stateless generator shared by all gateway requests
pub struct ItineraryService {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl ItineraryService {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "ItineraryService::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Build the provider request for these parameters
    pub fn build_request(&self, params: &ItineraryParams) -> Result<CompletionRequest, GatewayError> {
        debug!(destination = %params.destination, "ItineraryService::build_request: called");
        let context = PromptContext::from(params);
        let prompt = self
            .prompts
            .itinerary_prompt(&context)
            .map_err(|e| GatewayError::Prompt(e.to_string()))?;
        let system_prompt = self
            .prompts
            .system_prompt()
            .map_err(|e| GatewayError::Prompt(e.to_string()))?;

        Ok(CompletionRequest {
            system_prompt,
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            response_format: ResponseFormat::JsonObject,
        })
    }

    /// Generate an itinerary with exactly one provider call
    pub async fn generate(&self, params: &ItineraryParams) -> Result<Itinerary, GatewayError> {
        debug!(destination = %params.destination, "ItineraryService::generate: called");
        let request = self.build_request(params)?;

        let response = self.llm.complete(request).await?;
        let truncated = response.stop_reason == StopReason::MaxTokens;
        if truncated {
            warn!(
                max_tokens = self.max_tokens,
                output_tokens = response.usage.output_tokens,
                "Provider stopped at the token limit"
            );
        }
        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        let mut itinerary = match parse_itinerary(&content) {
            Ok(itinerary) => itinerary,
            Err(e) if truncated => {
                debug!(error = %e, "ItineraryService::generate: truncated output failed to parse");
                return Err(GatewayError::Truncated {
                    max_tokens: self.max_tokens,
                });
            }
            Err(e) => return Err(e),
        };
        ensure_id(&mut itinerary);

        if itinerary.start_date.is_none() {
            itinerary.start_date = Some(params.start_date.clone());
        }
        if itinerary.end_date.is_none() {
            itinerary.end_date = Some(params.end_date.clone());
        }

        info!(
            id = %itinerary.id,
            destination = %itinerary.destination,
            days = itinerary.days.len(),
            "Generated itinerary"
        );
        Ok(itinerary)
    }
}

/// Parse provider output against the itinerary schema
///
/// A surrounding markdown code fence is tolerated; anything else that is not a
/// schema-conforming JSON object is an error.
pub fn parse_itinerary(content: &str) -> Result<Itinerary, GatewayError> {
    debug!(content_len = content.len(), "parse_itinerary: called");
    let body = strip_code_fence(content);
    let itinerary: Itinerary = serde_json::from_str(body).map_err(GatewayError::MalformedItinerary)?;
    itinerary.validate()?;
    Ok(itinerary)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Assign a timestamp id when the provider left it out
///
/// Millisecond resolution; two requests completing in the same millisecond
/// get the same id.
pub fn ensure_id(itinerary: &mut Itinerary) {
    if itinerary.id.is_empty() {
        itinerary.id = chrono::Utc::now().timestamp_millis().to_string();
        debug!(id = %itinerary.id, "ensure_id: assigned timestamp id");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use serde_json::json;

    fn params() -> ItineraryParams {
        ItineraryParams {
            destination: "Paris".to_string(),
            start_date: "2025-06-01".to_string(),
            end_date: "2025-06-03".to_string(),
            interests: vec!["museums".to_string(), "food".to_string()],
            budget: "medium".to_string(),
            pace: "moderate".to_string(),
        }
    }

    fn itinerary_json(id: Option<&str>) -> String {
        let mut value = json!({
            "destination": "Paris",
            "duration": "3 days",
            "budget": "medium",
            "pace": "moderate",
            "days": [
                {
                    "day": 1,
                    "date": "2025-06-01",
                    "weather": "Sunny",
                    "activities": [
                        { "time": "10:00", "name": "Louvre", "description": "Art", "type": "cultural" }
                    ]
                }
            ]
        });
        if let Some(id) = id {
            value["id"] = json!(id);
        }
        value.to_string()
    }

    fn service(mock: Arc<MockLlmClient>) -> ItineraryService {
        ItineraryService::new(mock, Arc::new(PromptLoader::embedded_only()), 8192)
    }

    #[tokio::test]
    async fn test_generate_assigns_missing_id() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(itinerary_json(None))]));
        let itinerary = service(mock.clone()).generate(&params()).await.unwrap();

        assert!(!itinerary.id.is_empty());
        assert!(itinerary.id.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_preserves_provider_id() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(itinerary_json(Some(
            "trip-42",
        )))]));
        let itinerary = service(mock).generate(&params()).await.unwrap();
        assert_eq!(itinerary.id, "trip-42");
    }

    #[tokio::test]
    async fn test_generate_echoes_request_dates() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(itinerary_json(None))]));
        let itinerary = service(mock).generate(&params()).await.unwrap();
        assert_eq!(itinerary.start_date.as_deref(), Some("2025-06-01"));
        assert_eq!(itinerary.end_date.as_deref(), Some("2025-06-03"));
    }

    #[tokio::test]
    async fn test_generate_sends_json_mode_request_with_prompt() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(itinerary_json(None))]));
        service(mock.clone()).generate(&params()).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.response_format, ResponseFormat::JsonObject);
        assert!(request.system_prompt.contains("AI travel planner"));
        assert!(request.messages[0].content.contains("museums, food"));
        assert!(request.messages[0].content.contains("3-day"));
    }

    #[tokio::test]
    async fn test_generate_malformed_json_is_error() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("not json at all")]));
        let err = service(mock).generate(&params()).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedItinerary(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_generate_schema_mismatch_is_error() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(
            json!({ "destination": "Paris" }).to_string(),
        )]));
        let err = service(mock).generate(&params()).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedItinerary(_)));
    }

    #[tokio::test]
    async fn test_generate_provider_error_is_error() {
        let mock = Arc::new(MockLlmClient::with_results(vec![Err("upstream down".to_string())]));
        let err = service(mock).generate(&params()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Llm(_)));
    }

    #[tokio::test]
    async fn test_generate_truncated_output_is_reported() {
        let full = itinerary_json(None);
        let mut response = CompletionResponse::text(&full[..full.len() / 2]);
        response.stop_reason = StopReason::MaxTokens;
        let mock = Arc::new(MockLlmClient::new(vec![response]));

        let err = service(mock).generate(&params()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Truncated { max_tokens: 8192 }));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_generate_complete_output_at_token_limit_is_kept() {
        let mut response = CompletionResponse::text(itinerary_json(Some("edge")));
        response.stop_reason = StopReason::MaxTokens;
        let mock = Arc::new(MockLlmClient::new(vec![response]));

        let itinerary = service(mock).generate(&params()).await.unwrap();
        assert_eq!(itinerary.id, "edge");
    }

    #[tokio::test]
    async fn test_generate_empty_content_is_error() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("   ")]));
        let err = service(mock).generate(&params()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Llm(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_parse_itinerary_accepts_code_fence() {
        let fenced = format!("```json\n{}\n```", itinerary_json(Some("x")));
        let itinerary = parse_itinerary(&fenced).unwrap();
        assert_eq!(itinerary.id, "x");
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_ensure_id_only_when_blank() {
        let mut itinerary = parse_itinerary(&itinerary_json(Some(""))).unwrap();
        ensure_id(&mut itinerary);
        assert!(!itinerary.id.is_empty());

        let mut itinerary = parse_itinerary(&itinerary_json(Some("keep"))).unwrap();
        ensure_id(&mut itinerary);
        assert_eq!(itinerary.id, "keep");

        let mut itinerary = parse_itinerary(&itinerary_json(Some(" "))).unwrap();
        ensure_id(&mut itinerary);
        assert_eq!(itinerary.id, " ");
    }
}
