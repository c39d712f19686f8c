use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cities::default_city;
use crate::models::{City, EventRecord};
use crate::pipeline::EventSource;

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to load events. Please try again or check your connection.";

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of everything the UI renders. Only the controller writes it.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    selected_city: City,
    events: Vec<EventRecord>,
    phase: Phase,
    error_message: Option<String>,
    selected_event: Option<EventRecord>,
    #[serde(skip)]
    previous_events: Vec<EventRecord>,
    #[serde(skip)]
    generation: u64,
}

impl UiState {
    fn new(city: City) -> Self {
        Self {
            selected_city: city,
            events: Vec::new(),
            phase: Phase::Idle,
            error_message: None,
            selected_event: None,
            previous_events: Vec::new(),
            generation: 0,
        }
    }

    pub fn selected_city(&self) -> &City {
        &self.selected_city
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn selected_event(&self) -> Option<&EventRecord> {
        self.selected_event.as_ref()
    }

    /// Token of the most recently issued fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current record with `id`, falling back to the last list shown before a reload.
    fn find_event(&self, id: &str) -> Option<&EventRecord> {
        self.events
            .iter()
            .chain(self.previous_events.iter())
            .find(|event| event.id == id)
    }

    fn begin_loading(&mut self, city: City) -> u64 {
        self.selected_city = city;
        if !self.events.is_empty() {
            self.previous_events = std::mem::take(&mut self.events);
        }
        self.error_message = None;
        self.phase = Phase::Loading;
        self.generation += 1;
        self.generation
    }
}

pub struct EventController {
    source: Arc<dyn EventSource>,
    state: Arc<watch::Sender<UiState>>,
}

impl EventController {
    /// Idle on the default city; nothing is fetched until `start`.
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        let (state, _) = watch::channel(UiState::new(default_city()));
        Self {
            source,
            state: Arc::new(state),
        }
    }

    /// New controller with the first fetch for the default city already in flight.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like every command that starts a fetch
    /// (`start`, `select_city`, `retry`).
    pub fn launch(source: Arc<dyn EventSource>) -> Self {
        let controller = Self::new(source);
        controller.start();
        controller
    }

    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        self.begin(|state| (state.phase == Phase::Idle).then_some(state.selected_city))
    }

    /// Selecting the city already shown (or loading) does nothing.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn select_city(&self, city: City) -> Option<JoinHandle<()>> {
        self.begin(|state| {
            let unchanged = state.phase != Phase::Idle && state.selected_city.same_as(&city);
            (!unchanged).then_some(city)
        })
    }

    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn retry(&self) -> Option<JoinHandle<()>> {
        self.begin(|state| {
            matches!(state.phase, Phase::Idle | Phase::Error).then_some(state.selected_city)
        })
    }

    /// Opens the detail view for a record in the current list (or the one shown before the
    /// latest reload), or closes it with `None`. Returns whether the state changed.
    pub fn select_event(&self, event: Option<&EventRecord>) -> bool {
        self.state.send_if_modified(|state| match event {
            None => state.selected_event.take().is_some(),
            Some(event) => {
                let Some(found) = state.find_event(&event.id) else {
                    debug!(id = %event.id, "ignoring selection of unknown event");
                    return false;
                };
                if state.selected_event.as_ref() == Some(found) {
                    return false;
                }
                let found = found.clone();
                state.selected_event = Some(found);
                true
            }
        })
    }

    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    fn begin<F>(&self, target: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(&UiState) -> Option<City>,
    {
        let mut issued = None;
        self.state.send_if_modified(|state| match target(state) {
            Some(city) => {
                issued = Some((city, state.begin_loading(city)));
                true
            }
            None => false,
        });

        let (city, generation) = issued?;
        info!(city = city.name, generation, "loading events");
        Some(self.spawn_fetch(city, generation))
    }

    fn spawn_fetch(&self, city: City, generation: u64) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let result = source.fetch_events(city.name).await;
            state.send_if_modified(|ui| {
                if ui.generation != generation {
                    debug!(
                        city = city.name,
                        generation,
                        latest = ui.generation,
                        "discarding stale fetch result"
                    );
                    return false;
                }
                match result {
                    Ok(events) => {
                        ui.events = events;
                        ui.error_message = None;
                        ui.phase = Phase::Success;
                    }
                    Err(err) => {
                        error!(city = city.name, error = %err, "event fetch failed");
                        ui.events.clear();
                        ui.error_message = Some(FETCH_FAILED_MESSAGE.to_string());
                        ui.phase = Phase::Error;
                    }
                }
                true
            });
        })
    }
}
