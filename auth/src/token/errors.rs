use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures stay distinguishable here; the HTTP gate collapses
/// them into a single unauthorized response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailure(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
