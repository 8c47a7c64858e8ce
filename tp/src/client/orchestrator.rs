//! Routes and the generator overlay
//!
//! The same three flows run either as full pages (`/generator`,
//! `/generating`, `/itinerary/{id}`) or inside an overlay on the landing page.

use std::fmt;

use tracing::{debug, info};

use super::storage::{REQUEST_SLOT, SessionStorage, StorageError};
use crate::domain::TripRequest;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Landing,
    Generator,
    Generating,
    Itinerary(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Generator => "/generator".to_string(),
            Self::Generating => "/generating".to_string(),
            Self::Itinerary(id) => format!("/itinerary/{}", id),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Landing),
            "/generator" => Some(Self::Generator),
            "/generating" => Some(Self::Generating),
            _ => path
                .strip_prefix("/itinerary/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Self::Itinerary(id.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Which flow the overlay is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalView {
    #[default]
    Form,
    Loading,
    View,
}

impl ModalView {
    pub fn title(self) -> &'static str {
        match self {
            Self::Form => "Plan Your Trip",
            Self::Loading => "Creating Your Itinerary",
            Self::View => "Your Travel Itinerary",
        }
    }
}

/// What the user is looking at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Form,
    Loading,
    View(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Page,
    Overlay,
}

pub struct Orchestrator {
    storage: SessionStorage,
    route: Route,
    overlay_open: bool,
    modal_view: ModalView,
    itinerary_id: Option<String>,
}

impl Orchestrator {
    pub fn new(storage: SessionStorage) -> Self {
        Self {
            storage,
            route: Route::Landing,
            overlay_open: false,
            modal_view: ModalView::Form,
            itinerary_id: None,
        }
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn modal_view(&self) -> ModalView {
        self.modal_view
    }

    pub fn itinerary_id(&self) -> Option<&str> {
        self.itinerary_id.as_deref()
    }

    /// Overlay title, when the overlay is open
    pub fn overlay_title(&self) -> Option<&'static str> {
        self.overlay_open.then(|| self.modal_view.title())
    }

    pub fn open_generator(&mut self) {
        if self.route == Route::Landing {
            debug!("Orchestrator::open_generator: opening overlay");
            self.modal_view = ModalView::Form;
            self.overlay_open = true;
        } else {
            debug!(route = %self.route, "Orchestrator::open_generator: navigating to page");
            self.navigate(Route::Generator);
        }
    }

    pub fn close_generator(&mut self) {
        debug!("Orchestrator::close_generator: called");
        self.overlay_open = false;
        self.modal_view = ModalView::Form;
    }

    /// Change route; leaving the landing page dismisses the overlay
    pub fn navigate(&mut self, route: Route) {
        debug!(from = %self.route, to = %route, "Orchestrator::navigate: called");
        if route != Route::Landing && self.overlay_open {
            debug!("Orchestrator::navigate: dismissing overlay");
            self.overlay_open = false;
        }
        self.route = route;
    }

    /// Park the request for the loading flow and move to it
    pub fn submit_form(&mut self, request: &TripRequest) -> Result<(), StorageError> {
        info!(destination = %request.destination, "Trip request submitted");
        self.storage.set_json(REQUEST_SLOT, request)?;
        if self.overlay_open {
            self.modal_view = ModalView::Loading;
        } else {
            self.navigate(Route::Generating);
        }
        Ok(())
    }

    pub fn loading_complete(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(%id, "Orchestrator::loading_complete: called");
        self.itinerary_id = Some(id.clone());
        if self.overlay_open {
            self.modal_view = ModalView::View;
        } else {
            self.navigate(Route::Itinerary(id));
        }
    }

    pub fn presentation(&self) -> Presentation {
        if self.overlay_open {
            Presentation::Overlay
        } else {
            Presentation::Page
        }
    }

    pub fn active_screen(&self) -> Screen {
        if self.overlay_open {
            return match self.modal_view {
                ModalView::Form => Screen::Form,
                ModalView::Loading => Screen::Loading,
                ModalView::View => match &self.itinerary_id {
                    Some(id) => Screen::View(id.clone()),
                    None => Screen::Loading,
                },
            };
        }
        match &self.route {
            Route::Landing => Screen::Landing,
            Route::Generator => Screen::Form,
            Route::Generating => Screen::Loading,
            Route::Itinerary(id) => Screen::View(id.clone()),
        }
    }
}
