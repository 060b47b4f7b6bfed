use crate::metadata::FetchError;
use axum::http::StatusCode;

/// Request-scoped error taxonomy for the HTTP surface.
///
/// `Unexpected` deliberately displays a redacted message: raw internal error
/// text never crosses the trust boundary. The full error is logged where the
/// variant is constructed.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("URL parameter is required")]
    MissingUrl,

    #[error("Invalid YouTube URL. Please provide a valid YouTube video URL.")]
    InvalidUrl,

    /// All fetch strategies exhausted; carries the last strategy's reason.
    #[error("{0}")]
    Upstream(String),

    #[error("internal server error")]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl | ApiError::Upstream(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to surface to the caller. Internals stay in the logs.
    pub fn public_message(&self) -> String {
        if let ApiError::Unexpected(err) = self {
            log::error!("unexpected error: {err:?}");
        }
        self.to_string()
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Upstream(err.reason().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Upstream("nope".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unexpected(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unexpected_is_redacted() {
        let err = ApiError::Unexpected(anyhow::anyhow!("secret database password leaked"));
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn test_upstream_surfaces_reason() {
        let err: ApiError = FetchError::new("This video is private").into();
        assert_eq!(err.public_message(), "This video is private");
    }
}
