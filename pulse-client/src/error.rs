use thiserror::Error;

#[derive(Debug, Error)]
pub enum PulseClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Token storage error: {0}")]
    TokenStorage(#[from] std::io::Error),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl PulseClientError {
    pub(crate) async fn from_http_response(resp: reqwest::Response) -> Self {
        match resp.status().as_u16() {
            401 => PulseClientError::Unauthorized,
            404 => PulseClientError::NotFound,
            _ => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                PulseClientError::InvalidRequest(format!("{status}: {body}"))
            }
        }
    }
}
