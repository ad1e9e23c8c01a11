use std::sync::Arc;

use axum::{
    extract::{
        rejection::JsonRejection,
        State as AxumState,
    },
    Json,
};
use tracing::info;

use super::{
    credentials::RequestCredentials,
    error::ApiError,
    state::State,
};
use crate::{
    core::{
        Card,
        DemoCredentials,
        UpdateAck,
        UpdateCardRequest,
    },
    notion,
};

pub async fn cards_handler(
    AxumState(state): AxumState<Arc<State>>,
    RequestCredentials(credentials): RequestCredentials,
) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = notion::query_cards(&state.notion, &credentials).await?;
    Ok(Json(cards))
}

/// Credentials are extracted before the body, so a caller without them gets
/// 401 even when the payload is malformed.
pub async fn update_card_handler(
    AxumState(state): AxumState<Arc<State>>,
    RequestCredentials(credentials): RequestCredentials,
    payload: Result<Json<UpdateCardRequest>, JsonRejection>,
) -> Result<Json<UpdateAck>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    notion::update_card(
        &state.notion,
        &credentials,
        &payload.page_id,
        &payload.level,
        payload.current_times_studied,
    )
    .await?;

    Ok(Json(UpdateAck { success: true }))
}

pub async fn demo_credentials_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Json<DemoCredentials> {
    info!("Handing out demo credentials");
    let demo = &state.config.demo_credentials;

    Json(DemoCredentials { notion_key: demo.key.clone(), db_id: demo.database_id.clone() })
}
