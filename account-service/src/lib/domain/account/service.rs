use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::PasswordError;
use auth::TokenError;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::IssuedToken;
use crate::account::models::LoginCommand;
use crate::account::models::SignupCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

/// Run CPU-bound password work off the async worker threads.
async fn run_blocking<T, F>(work: F) -> Result<T, AccountError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AccountError::Hashing(PasswordError::HashingFailed(e.to_string())))
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<Account, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            run_blocking(move || authenticator.hash_password(password.expose())).await??;

        let account = Account {
            id: AccountId::new(),
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_account = self.repository.create(account).await?;
        tracing::info!(account_id = %created_account.id, "Account created");

        Ok(created_account)
    }

    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;

        let Some(account) = self.repository.find_by_email(&command.email).await? else {
            // Costs one verification, like a wrong password
            run_blocking(move || authenticator.reject_absent_account(password.expose())).await?;
            return Err(AccountError::NotFoundByEmail(command.email.to_string()));
        };

        let issued_at = Utc::now();
        let identity = account.identity();
        let password_hash = account.password_hash.clone();
        let token = run_blocking(move || {
            authenticator.authenticate(password.expose(), &password_hash, &identity)
        })
        .await?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
            AuthenticationError::Password(err) => AccountError::Hashing(err),
            AuthenticationError::Token(err) => AccountError::Token(err),
        })?;

        let expires_at = issued_at
            .checked_add_signed(self.authenticator.token_ttl())
            .ok_or_else(|| {
                AccountError::Token(TokenError::SigningFailure(
                    "token expiry is out of range".to_string(),
                ))
            })?;

        tracing::info!(account_id = %account.id, "Token issued");

        Ok(IssuedToken { token, expires_at })
    }
}
