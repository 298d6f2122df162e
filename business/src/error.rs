use crate::http::Method;

/// Why a resource request did not produce a payload.
///
/// The `Display` form is what the list pages show in their error banner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The backend answered outside the 2xx range.
    #[error("{method} failed: {status}")]
    Status { method: Method, status: u16 },
    #[error("{method} failed: {message}")]
    Transport { method: Method, message: String },
    /// The backend answered 2xx but the body does not match the resource schema.
    #[error("{method} failed: invalid response ({message})")]
    Decode { method: Method, message: String },
    /// The owning client was dropped before the response arrived.
    #[error("{method} cancelled")]
    Cancelled { method: Method },
}

impl RequestError {
    pub fn method(&self) -> Method {
        match self {
            RequestError::Status { method, .. }
            | RequestError::Transport { method, .. }
            | RequestError::Decode { method, .. }
            | RequestError::Cancelled { method } => *method,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RequestError::Cancelled { .. })
    }

    pub(crate) fn decode(method: Method, err: impl std::fmt::Display) -> Self {
        RequestError::Decode {
            method,
            message: err.to_string(),
        }
    }
}
