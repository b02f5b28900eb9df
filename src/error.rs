//! Error taxonomy for control-plane calls.
//!
//! The library never terminates the process on a failed call: everything is
//! reported through [`Error`] so callers can decide on retry or fallback. A
//! parse failure on one region must not disturb the cached state of another,
//! which is why parse errors are distinct from transport errors here.

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure: connect, timeout, or body read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API request failed with status {0}")]
    BadStatus(StatusCode),

    /// The response body did not match the expected shape.
    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// No cluster with the given name exists after a full refresh.
    #[error("cluster {0:?} not found in any supported region")]
    NotFound(String),

    /// Missing project or credentials; reported once, never retried.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Failure running an external command (gcloud ssh).
    #[error("command failed: {0}")]
    Command(String),
}

impl Error {
    /// User-facing message for common API failures, without leaking the raw
    /// error body.
    pub fn user_message(&self) -> String {
        match self {
            Error::BadStatus(status) => match status.as_u16() {
                401 => "Authentication failed. Run 'gcloud auth application-default login'."
                    .to_string(),
                403 => "Permission denied. Check your GCP IAM permissions.".to_string(),
                404 => "Resource not found.".to_string(),
                429 => "Rate limit exceeded. Please try again later.".to_string(),
                500 | 503 => "Service temporarily unavailable. Please try again.".to_string(),
                _ => format!("API request failed with status {status}"),
            },
            Error::Transport(_) => {
                "Request failed. Check your network connection and try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_maps_auth_failures() {
        let err = Error::BadStatus(StatusCode::UNAUTHORIZED);
        assert!(err.user_message().contains("gcloud auth"));
    }

    #[test]
    fn not_found_names_the_cluster() {
        let err = Error::NotFound("quadrant".to_string());
        assert!(err.to_string().contains("quadrant"));
    }
}
