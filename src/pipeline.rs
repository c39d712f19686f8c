use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::llm::GeminiClient;
use crate::models::EventRecord;
use crate::normalize::parse_events;
use crate::prompt::build_prompt;

/// Anything that can produce the events of a city in one round trip.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, city_name: &str) -> Result<Vec<EventRecord>, FetchError>;
}

pub struct EventFetchPipeline {
    client: Option<GeminiClient>,
}

impl EventFetchPipeline {
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(&FetchConfig::from_env())
    }

    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = match GeminiClient::new(config) {
            Ok(client) => Some(client),
            Err(FetchError::MissingCredential) => {
                warn!("no API_KEY configured; event fetches will return no data");
                None
            }
            Err(err) => return Err(err),
        };
        Ok(Self { client })
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl EventSource for EventFetchPipeline {
    async fn fetch_events(&self, city_name: &str) -> Result<Vec<EventRecord>, FetchError> {
        let Some(client) = &self.client else {
            warn!(city = city_name, "skipping event fetch without credential");
            return Ok(Vec::new());
        };

        let prompt = build_prompt(city_name);
        let text = client.generate(&prompt).await?;
        let events = parse_events(&text, city_name, Utc::now())?;

        info!(city = city_name, count = events.len(), "fetched events");
        Ok(events)
    }
}
