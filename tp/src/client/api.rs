//! Outbound call from the planner to the gateway

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Itinerary, TripRequest};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gateway response is not an itinerary: {0}")]
    InvalidResponse(String),
}

/// Something that turns a trip request into an itinerary
#[async_trait]
pub trait ItineraryGateway: Send + Sync {
    async fn generate(&self, request: &TripRequest) -> Result<Itinerary, ApiError>;
}

/// Gateway reached over HTTP
pub struct HttpGateway {
    url: String,
    http: Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpGateway {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        debug!(%url, "HttpGateway::new: called");
        Self { url, http: Client::new() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ItineraryGateway for HttpGateway {
    async fn generate(&self, request: &TripRequest) -> Result<Itinerary, ApiError> {
        debug!(url = %self.url, destination = %request.destination, "HttpGateway::generate: called");
        let response = self.http.post(&self.url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // 400s carry {error}; 500s carry plain text
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "Gateway request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let itinerary: Itinerary =
            serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        itinerary
            .validate()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        debug!(id = %itinerary.id, "HttpGateway::generate: received itinerary");
        Ok(itinerary)
    }
}

#[cfg(test)]
pub mod mock {
    //! Scripted gateway for flow tests

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    pub struct MockGateway {
        result: Mutex<Option<Result<Itinerary, String>>>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl MockGateway {
        pub fn ok(itinerary: Itinerary) -> Self {
            Self {
                result: Mutex::new(Some(Ok(itinerary))),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                result: Mutex::new(Some(Err(message.to_string()))),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ItineraryGateway for MockGateway {
        async fn generate(&self, _request: &TripRequest) -> Result<Itinerary, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            let result = self.result.lock().unwrap().take();
            match result {
                Some(Ok(itinerary)) => Ok(itinerary),
                Some(Err(message)) => Err(ApiError::Status { status: 500, message }),
                None => Err(ApiError::InvalidResponse("mock exhausted".to_string())),
            }
        }
    }
}
