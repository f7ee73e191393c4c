//! Authentication core
//!
//! Provides the authentication building blocks used by the account service:
//! - Password hashing (Argon2id)
//! - Stateless identity tokens (HS256 JWT)
//! - Authentication coordination
//!
//! Nothing here performs I/O or holds mutable state; every type is safe to
//! share across request handlers.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{IdentityClaim, TokenService};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(1)).unwrap();
//! let identity = IdentityClaim::new(Uuid::new_v4(), "a@x.com");
//! let token = tokens.issue(&identity).unwrap();
//! assert_eq!(tokens.verify(&token).unwrap(), identity);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, IdentityClaim, PasswordHasher, TokenService};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let auth = Authenticator::new(PasswordHasher::new(), tokens);
//!
//! // Signup: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let identity = IdentityClaim::new(Uuid::new_v4(), "a@x.com");
//! let token = auth.authenticate("password123", &hash, &identity).unwrap();
//!
//! // Protected request: verify token
//! let verified = auth.verify_token(&token).unwrap();
//! assert_eq!(verified, identity);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use token::IdentityClaim;
pub use token::TokenClaims;
pub use token::TokenError;
pub use token::TokenService;
