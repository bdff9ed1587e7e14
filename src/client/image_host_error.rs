use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    #[error("Image host is not configured: {0}")]
    NotConfigured(String),

    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {0} - {1}")]
    ApiError(StatusCode, String),

    #[error("Unexpected upload response: {0}")]
    MalformedResponse(String),
}
