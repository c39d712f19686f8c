pub mod cities;
pub mod config;
pub mod controller;
pub mod error;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompt;

pub use cities::{default_city, find_by_slug, CITIES};
pub use config::FetchConfig;
pub use controller::{EventController, Phase, UiState, FETCH_FAILED_MESSAGE};
pub use error::FetchError;
pub use models::{Category, City, EventRecord};
pub use pipeline::{EventFetchPipeline, EventSource};
pub use prompt::build_prompt;
