use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedAccount;

/// Return the identity carried by the caller's token.
pub async fn me(
    AuthenticatedAccount(identity): AuthenticatedAccount,
) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            user_id: identity.user_id.to_string(),
            email: identity.email,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseData {
    pub user_id: String,
    pub email: String,
}
