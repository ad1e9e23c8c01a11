use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{
        request::Parts,
        HeaderMap,
    },
};

use super::{
    config::CredentialMode,
    error::ApiError,
    state::State,
};
use crate::core::{
    Credentials,
    DATABASE_HEADER,
    KEY_HEADER,
};

/// Credentials resolved for the current request according to the deployment's
/// [`CredentialMode`].
#[derive(Debug, Clone)]
pub struct RequestCredentials(pub Credentials);

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn resolve(
    mode: CredentialMode,
    fixed: &Credentials,
    headers: &HeaderMap,
) -> Result<Credentials, ApiError> {
    match mode {
        CredentialMode::Fixed => Ok(fixed.clone()),
        CredentialMode::Header => {
            let key = header_value(headers, KEY_HEADER).ok_or(ApiError::Unauthorized)?;
            let database_id =
                header_value(headers, DATABASE_HEADER).ok_or(ApiError::Unauthorized)?;
            Ok(Credentials::new(key, database_id))
        }
    }
}

impl FromRequestParts<Arc<State>> for RequestCredentials {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<State>,
    ) -> Result<Self, Self::Rejection> {
        resolve(state.config.credential_mode, &state.config.fixed_credentials, &parts.headers)
            .map(RequestCredentials)
    }
}
