use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("empty response from generation service")]
    EmptyResponse,
    #[error("malformed JSON in model response: {0}")]
    MalformedJson(String),
    #[error("transport error: {0}")]
    Transport(String),
}
