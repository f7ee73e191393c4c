use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::IdentityClaim;
use super::claims::TokenClaims;
use super::errors::TokenError;

/// Issues and verifies signed, time-bounded identity tokens.
///
/// Tokens are JWTs signed with HS256 (HMAC with SHA-256). Nothing is stored
/// server-side: a token is valid exactly while its signature checks out and
/// its `exp` has not passed.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service with a secret key and a fixed time-to-live.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `ttl` - Lifetime of every issued token
    ///
    /// # Errors
    /// * `SigningFailure` - The secret is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::SigningFailure(
                "signing key is not configured".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        })
    }

    /// Lifetime applied to issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity`, valid from now until now + TTL.
    ///
    /// # Errors
    /// * `SigningFailure` - Token encoding failed
    pub fn issue(&self, identity: &IdentityClaim) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    ///
    /// # Errors
    /// * `SigningFailure` - Token encoding failed or the expiry is out of range
    pub fn issue_at(
        &self,
        identity: &IdentityClaim,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::for_identity(identity, issued_at, self.ttl)?;
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailure(e.to_string()))
    }

    /// Verify a token and recover the identity it was issued for.
    ///
    /// The signature is checked before the expiry.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match (tampered or foreign token)
    /// * `Expired` - Token is past its expiry
    /// * `Malformed` - Token cannot be decoded
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        token_data.claims.into_identity()
    }
}
