use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::{dto::UpdateSettingsRequest, repo::UserSettings};
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/users/settings", get(get_settings).put(update_settings))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<Json<UserSettings>, ApiError> {
    let settings = UserSettings::get_or_create(&state.db, current.id).await?;
    Ok(Json(settings))
}

#[instrument(skip(state, payload))]
pub async fn update_settings(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<UserSettings>, ApiError> {
    let mut settings = UserSettings::get_or_create(&state.db, current.id).await?;
    payload.apply(&mut settings);
    let saved = settings.save(&state.db).await?;
    info!(user_id = %current.id, "settings updated");
    Ok(Json(saved))
}
