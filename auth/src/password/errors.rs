use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password does not match")]
    Mismatch,

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Invalid password hashing policy: {0}")]
    InvalidPolicy(String),
}
