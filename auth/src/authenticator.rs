use chrono::Duration;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::IdentityClaim;
use crate::token::TokenError;
use crate::token::TokenService;

/// Authentication coordinator combining password verification and token issuance.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
    /// Digest verified against when no account exists, hashed with the current policy
    decoy_hash: Option<String>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-absent-accounts";

/// Authentication operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator from its two collaborators.
    pub fn new(password_hasher: PasswordHasher, token_service: TokenService) -> Self {
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD).ok();

        Self {
            password_hasher,
            token_service,
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `identity`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Identity to embed in the token
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored hash could not be used
    /// * `Token` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &IdentityClaim,
    ) -> Result<String, AuthenticationError> {
        self.password_hasher
            .verify(password, stored_hash)
            .map_err(|e| match e {
                PasswordError::Mismatch => AuthenticationError::InvalidCredentials,
                other => AuthenticationError::Password(other),
            })?;

        Ok(self.token_service.issue(identity)?)
    }

    /// Spend the same hashing work as a real verification, for a login whose
    /// account does not exist.
    ///
    /// Always reports `InvalidCredentials`.
    pub fn reject_absent_account(&self, password: &str) -> AuthenticationError {
        match &self.decoy_hash {
            Some(decoy_hash) => {
                let _ = self.password_hasher.verify(password, decoy_hash);
            }
            None => {
                let _ = self.password_hasher.hash(password);
            }
        }

        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `TokenError` - Token generation failed
    pub fn issue_token(&self, identity: &IdentityClaim) -> Result<String, TokenError> {
        self.token_service.issue(identity)
    }

    /// Validate a token and recover its identity.
    ///
    /// # Errors
    /// * `TokenError` - Token validation or decoding failed
    pub fn verify_token(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        self.token_service.verify(token)
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_service.ttl()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::password::PasswordPolicy;

    fn authenticator(secret: &[u8]) -> Authenticator {
        let hasher = PasswordHasher::with_policy(PasswordPolicy {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher");
        let tokens = TokenService::new(secret, Duration::hours(24))
            .expect("Failed to build token service");
        Authenticator::new(hasher, tokens)
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator(b"test_secret_key_at_least_32_bytes!");

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let identity = IdentityClaim::new(Uuid::new_v4(), "a@x.com");
        let token = authenticator
            .authenticate(password, &hash, &identity)
            .expect("Authentication failed");

        assert!(!token.is_empty());

        let decoded = authenticator
            .verify_token(&token)
            .expect("Token validation failed");
        assert_eq!(decoded, identity);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator(b"test_secret_key_at_least_32_bytes!");

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let identity = IdentityClaim::new(Uuid::new_v4(), "a@x.com");
        let result = authenticator.authenticate("wrong_password", &hash, &identity);
        assert_eq!(result, Err(AuthenticationError::InvalidCredentials));
    }

    #[test]
    fn test_authenticate_malformed_hash_is_not_invalid_credentials() {
        let authenticator = authenticator(b"test_secret_key_at_least_32_bytes!");

        let identity = IdentityClaim::new(Uuid::new_v4(), "a@x.com");
        let result = authenticator.authenticate("my_password", "not-a-phc-string", &identity);
        assert!(matches!(
            result,
            Err(AuthenticationError::Password(PasswordError::MalformedHash(_)))
        ));
    }

    #[test]
    fn test_reject_absent_account() {
        let authenticator = authenticator(b"test_secret_key_at_least_32_bytes!");

        assert_eq!(
            authenticator.reject_absent_account("my_password"),
            AuthenticationError::InvalidCredentials
        );
        assert_eq!(
            authenticator.reject_absent_account(DECOY_PASSWORD),
            AuthenticationError::InvalidCredentials
        );
    }

    #[test]
    fn test_decoy_hash_uses_current_policy() {
        let authenticator = authenticator(b"test_secret_key_at_least_32_bytes!");

        let decoy_hash = authenticator.decoy_hash.as_deref().expect("decoy hash missing");
        assert!(decoy_hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[test]
    fn test_token_from_other_authenticator_is_rejected() {
        let ours = authenticator(b"test_secret_key_at_least_32_bytes!");
        let theirs = authenticator(b"other_secret_key_at_least_32_bytes");

        let token = theirs
            .issue_token(&IdentityClaim::new(Uuid::new_v4(), "a@x.com"))
            .expect("Failed to issue token");

        assert_eq!(ours.verify_token(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_token_ttl() {
        let authenticator = authenticator(b"test_secret_key_at_least_32_bytes!");
        assert_eq!(authenticator.token_ttl(), Duration::hours(24));
    }
}
