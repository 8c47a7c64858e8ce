//! Loading flow: simulated progress alongside the real gateway call
//!
//! Two tasks share one cancellation token. The ticker only drives the
//! progress channel; the request task owns the single gateway call. Whichever
//! way the flow ends, both are cancelled together, and dropping the future
//! returned by `run()` cancels them as well.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::api::{ApiError, ItineraryGateway};
use super::progress::{ProgressSimulator, ProgressSnapshot, TICK_INTERVAL};
use super::storage::{REQUEST_SLOT, SessionStorage, itinerary_key};
use crate::domain::{Itinerary, TripRequest};

/// Delays the flow waits on
#[derive(Debug, Clone, Copy)]
pub struct LoadingTimings {
    /// Before the gateway call is issued
    pub initial_delay: Duration,
    pub tick_interval: Duration,
    /// After success, before handing off to the view
    pub completion_delay: Duration,
}

impl Default for LoadingTimings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            tick_interval: TICK_INTERVAL,
            completion_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadingError {
    #[error("No itinerary request found")]
    MissingRequest,

    #[error("Failed to generate itinerary. Please try again.")]
    GenerationFailed(#[source] ApiError),

    #[error("Failed to generate itinerary. Please try again.")]
    Interrupted,
}

/// The one way out of an error state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    GoBack,
}

impl RecoveryAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::GoBack => "Go Back",
        }
    }
}

impl LoadingError {
    pub fn recovery(&self) -> RecoveryAction {
        RecoveryAction::GoBack
    }
}

#[derive(Debug)]
pub enum LoadingOutcome {
    /// Itinerary cached under `itinerary-{id}`
    Complete { id: String },
    Failed(LoadingError),
    Cancelled,
}

pub struct LoadingFlow {
    storage: SessionStorage,
    gateway: Arc<dyn ItineraryGateway>,
    timings: LoadingTimings,
    cancel: CancellationToken,
    progress_tx: watch::Sender<ProgressSnapshot>,
}

impl LoadingFlow {
    pub fn new(storage: SessionStorage, gateway: Arc<dyn ItineraryGateway>) -> Self {
        let (progress_tx, _) = watch::channel(ProgressSnapshot::default());
        Self {
            storage,
            gateway,
            timings: LoadingTimings::default(),
            cancel: CancellationToken::new(),
            progress_tx,
        }
    }

    pub fn with_timings(mut self, timings: LoadingTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Progress updates for a renderer
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress_tx.subscribe()
    }

    /// Token that aborts the flow when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(self) -> LoadingOutcome {
        debug!("LoadingFlow::run: called");
        let Self {
            storage,
            gateway,
            timings,
            cancel,
            progress_tx,
        } = self;
        let _guard = cancel.clone().drop_guard();

        let request: TripRequest = match storage.get_json(REQUEST_SLOT) {
            Ok(Some(request)) => request,
            Ok(None) => {
                warn!("No pending trip request in session");
                return LoadingOutcome::Failed(LoadingError::MissingRequest);
            }
            Err(e) => {
                warn!(error = %e, "Pending trip request is unreadable");
                return LoadingOutcome::Failed(LoadingError::MissingRequest);
            }
        };
        info!(destination = %request.destination, "Generating itinerary");

        let progress_tx = Arc::new(progress_tx);
        let ticker_token = cancel.child_token();
        let ticker = tokio::spawn(run_ticker(
            ticker_token.clone(),
            timings.tick_interval,
            progress_tx.clone(),
        ));

        let request_token = cancel.clone();
        let request_task = tokio::spawn(async move {
            tokio::select! {
                _ = request_token.cancelled() => None,
                result = async {
                    tokio::time::sleep(timings.initial_delay).await;
                    gateway.generate(&request).await
                } => Some(result),
            }
        });

        let joined = tokio::select! {
            _ = cancel.cancelled() => None,
            joined = request_task => Some(joined),
        };
        ticker_token.cancel();
        if let Err(e) = ticker.await {
            debug!(error = %e, "LoadingFlow::run: ticker join failed");
        }

        let itinerary: Itinerary = match joined {
            None | Some(Ok(None)) => {
                debug!("LoadingFlow::run: cancelled before result");
                return LoadingOutcome::Cancelled;
            }
            Some(Ok(Some(Ok(itinerary)))) => itinerary,
            Some(Ok(Some(Err(e)))) => {
                error!(error = %e, "Error generating itinerary");
                return LoadingOutcome::Failed(LoadingError::GenerationFailed(e));
            }
            Some(Err(e)) => {
                error!(error = %e, "Request task failed");
                return LoadingOutcome::Failed(LoadingError::Interrupted);
            }
        };

        if let Err(e) = storage.set_json(&itinerary_key(&itinerary.id), &itinerary) {
            error!(error = %e, "Failed to cache itinerary");
            return LoadingOutcome::Failed(LoadingError::Interrupted);
        }
        progress_tx.send_modify(|snapshot| snapshot.progress = 100.0);
        info!(id = %itinerary.id, "Itinerary ready");

        tokio::select! {
            _ = cancel.cancelled() => LoadingOutcome::Cancelled,
            _ = tokio::time::sleep(timings.completion_delay) => LoadingOutcome::Complete { id: itinerary.id },
        }
    }
}

async fn run_ticker(token: CancellationToken, period: Duration, tx: Arc<watch::Sender<ProgressSnapshot>>) {
    debug!(?period, "run_ticker: called");
    let mut rng = StdRng::from_os_rng();
    let mut simulator = ProgressSimulator::new();
    let mut interval = tokio::time::interval(period);
    // First tick of an interval fires immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!(progress = simulator.progress(), "run_ticker: cancelled");
                return;
            }
            _ = interval.tick() => {
                tx.send_replace(simulator.tick(&mut rng));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::mock::MockGateway;
    use crate::client::fixtures::{sample_itinerary, sample_request};

    fn fast() -> LoadingTimings {
        LoadingTimings {
            initial_delay: Duration::from_millis(20),
            tick_interval: Duration::from_millis(2),
            completion_delay: Duration::from_millis(5),
        }
    }

    fn storage_with_request() -> SessionStorage {
        let storage = SessionStorage::new();
        storage.set_json(REQUEST_SLOT, &sample_request()).unwrap();
        storage
    }

    #[tokio::test]
    async fn test_missing_request() {
        let gateway = Arc::new(MockGateway::ok(sample_itinerary("1")));
        let flow = LoadingFlow::new(SessionStorage::new(), gateway.clone()).with_timings(fast());

        match flow.run().await {
            LoadingOutcome::Failed(err) => {
                assert!(matches!(err, LoadingError::MissingRequest));
                assert_eq!(err.to_string(), "No itinerary request found");
                assert_eq!(err.recovery(), RecoveryAction::GoBack);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_caches_itinerary() {
        let storage = storage_with_request();
        let gateway = Arc::new(MockGateway::ok(sample_itinerary("1717")));
        let flow = LoadingFlow::new(storage.clone(), gateway.clone()).with_timings(fast());
        let progress = flow.subscribe();

        match flow.run().await {
            LoadingOutcome::Complete { id } => assert_eq!(id, "1717"),
            other => panic!("unexpected outcome: {:?}", other),
        }

        let cached: Itinerary = storage.get_json("itinerary-1717").unwrap().unwrap();
        assert_eq!(cached.destination, "Paris");
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(progress.borrow().progress, 100.0);
    }

    #[tokio::test]
    async fn test_failure_sets_error_state() {
        let storage = storage_with_request();
        let gateway = Arc::new(MockGateway::failing("Server Error"));
        let flow = LoadingFlow::new(storage.clone(), gateway.clone()).with_timings(fast());
        let progress = flow.subscribe();

        match flow.run().await {
            LoadingOutcome::Failed(err) => {
                assert!(matches!(err, LoadingError::GenerationFailed(_)));
                assert_eq!(err.to_string(), "Failed to generate itinerary. Please try again.");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(gateway.call_count(), 1);
        assert!(progress.borrow().progress < 100.0);
    }

    #[tokio::test]
    async fn test_progress_ticks_while_waiting() {
        let storage = storage_with_request();
        let gateway = Arc::new(MockGateway::ok(sample_itinerary("1")).with_delay(Duration::from_millis(50)));
        let flow = LoadingFlow::new(storage, gateway).with_timings(fast());
        let mut progress = flow.subscribe();

        let handle = tokio::spawn(flow.run());
        progress.changed().await.unwrap();
        let snapshot = progress.borrow().clone();
        assert!(snapshot.progress > 0.0 && snapshot.progress <= 90.0);

        assert!(matches!(handle.await.unwrap(), LoadingOutcome::Complete { .. }));
    }

    #[tokio::test]
    async fn test_gateway_called_after_initial_delay() {
        let storage = storage_with_request();
        let gateway = Arc::new(MockGateway::ok(sample_itinerary("1")));
        let timings = LoadingTimings {
            initial_delay: Duration::from_millis(300),
            ..fast()
        };
        let flow = LoadingFlow::new(storage, gateway.clone()).with_timings(timings);

        let handle = tokio::spawn(flow.run());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(gateway.call_count(), 0);

        assert!(matches!(handle.await.unwrap(), LoadingOutcome::Complete { .. }));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_discards_late_result() {
        let storage = storage_with_request();
        let gateway = Arc::new(MockGateway::ok(sample_itinerary("late")).with_delay(Duration::from_millis(200)));
        let flow = LoadingFlow::new(storage.clone(), gateway).with_timings(fast());
        let token = flow.cancel_token();

        let handle = tokio::spawn(flow.run());
        tokio::time::sleep(Duration::from_millis(40)).await;
        token.cancel();

        assert!(matches!(handle.await.unwrap(), LoadingOutcome::Cancelled));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!storage.contains("itinerary-late"));
    }

    #[tokio::test]
    async fn test_drop_cancels_tasks() {
        let storage = storage_with_request();
        let gateway = Arc::new(MockGateway::ok(sample_itinerary("dropped")).with_delay(Duration::from_millis(100)));
        let flow = LoadingFlow::new(storage.clone(), gateway).with_timings(fast());
        let token = flow.cancel_token();

        let run = flow.run();
        let _ = tokio::time::timeout(Duration::from_millis(40), run).await;

        assert!(token.is_cancelled());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!storage.contains("itinerary-dropped"));
    }
}
