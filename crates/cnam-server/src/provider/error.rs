//! Provider errors.

use thiserror::Error;

/// Errors from a CNAM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never got a response.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with an error status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered without a body.
    #[error("provider returned an empty body (status {status})")]
    EmptyBody { status: u16 },

    /// The body is not a lookup result.
    #[error("provider body could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider is misconfigured.
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),
}

impl ProviderError {
    /// Returns the HTTP status reported by the provider, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::EmptyBody { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidConfig(_) => None,
        }
    }

    /// Short label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::EmptyBody { .. } => "empty_body",
            Self::Decode(_) => "decode",
            Self::InvalidConfig(_) => "config",
        }
    }
}
