use std::collections::HashSet;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::models::{Category, EventRecord};

static JSON_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("valid fence regex"));

static IMAGE_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://picsum.photos").expect("valid image base url"));

/// Inner content of the first ```json fence, or the whole text when there is none.
pub fn extract_json(text: &str) -> &str {
    JSON_FENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
}

/// Extracts, parses, and normalizes a model response body.
pub fn parse_events(
    text: &str,
    city_name: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<EventRecord>, FetchError> {
    let payload = extract_json(text);
    let value: Value =
        serde_json::from_str(payload).map_err(|err| FetchError::MalformedJson(err.to_string()))?;
    match value {
        Value::Array(items) => Ok(normalize_events(&items, city_name, fetched_at)),
        other => Err(FetchError::MalformedJson(format!(
            "expected a JSON array, found {}",
            kind_of(&other)
        ))),
    }
}

/// Repairs each raw record; records without a usable title are dropped.
pub fn normalize_events(
    items: &[Value],
    city_name: &str,
    fetched_at: DateTime<Utc>,
) -> Vec<EventRecord> {
    let stamp = fetched_at.timestamp_millis();
    let mut seen_ids = HashSet::new();
    let mut events: Vec<EventRecord> = Vec::with_capacity(items.len());

    for item in items {
        let Some(title) = item
            .get("title")
            .and_then(Value::as_str)
            .filter(|title| !title.trim().is_empty())
        else {
            continue;
        };

        let index = events.len();
        let id = item
            .get("id")
            .and_then(text_of)
            .filter(|id| !id.is_empty() && !seen_ids.contains(id))
            .unwrap_or_else(|| synthesize_id(&seen_ids, city_name, index, stamp));
        seen_ids.insert(id.clone());

        let city = item
            .get("city")
            .and_then(text_of)
            .filter(|city| !city.trim().is_empty())
            .unwrap_or_else(|| city_name.to_string());

        events.push(EventRecord {
            id,
            title: title.to_string(),
            date: field_text(item, "date"),
            time: field_text(item, "time"),
            location: field_text(item, "location"),
            city,
            description: field_text(item, "description"),
            category: item
                .get("category")
                .and_then(Value::as_str)
                .map(Category::coerce)
                .unwrap_or_default(),
            requirements: requirements(item.get("requirements")),
            image_url: image_url(title, index),
            source_url: item
                .get("sourceUrl")
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        });
    }

    let dropped = items.len() - events.len();
    if dropped > 0 {
        debug!(city = city_name, dropped, "dropped events without a title");
    }

    events
}

/// `evt-{city}-{index}-{stamp}`, suffixed when a model-supplied id already took it.
fn synthesize_id(
    seen_ids: &HashSet<String>,
    city_name: &str,
    index: usize,
    stamp: i64,
) -> String {
    let base = format!("evt-{city_name}-{index}-{stamp}");
    let mut candidate = base.clone();
    let mut suffix = 1;
    while seen_ids.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    candidate
}

/// Deterministic placeholder image seeded by the whitespace-free title and position.
pub fn image_url(title: &str, index: usize) -> String {
    let seed: String = title
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .chain(index.to_string().chars())
        .collect();

    let mut url = IMAGE_BASE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().extend(["seed", seed.as_str(), "800", "600"]);
    }
    url.into()
}

fn requirements(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(single)) if !single.trim().is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn field_text(item: &Value, key: &str) -> String {
    item.get(key).and_then(text_of).unwrap_or_default()
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
