use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::Password;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let command = body.try_into_command()?;

    // Unknown email and wrong password look the same to the client
    let issued = state
        .account_service
        .login(command)
        .await
        .map_err(|e| match e {
            AccountError::NotFoundByEmail(_) | AccountError::InvalidCredentials => {
                tracing::warn!(reason = %e, "Login rejected");
                ApiError::invalid_credentials()
            }
            _ => ApiError::from(e),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token: issued.token,
            expires_at: issued.expires_at,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, AccountError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(LoginCommand::new(email, password))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
