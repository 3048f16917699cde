use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo::{Language, Model, TranslationStyle};
use crate::{error::ApiError, state::AppState};

pub fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/languages", get(list_languages))
        .route("/translation-styles", get(list_styles))
        .route("/models", get(list_models))
}

#[instrument(skip(state))]
pub async fn list_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Language>>, ApiError> {
    Ok(Json(Language::list_all(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn list_styles(
    State(state): State<AppState>,
) -> Result<Json<Vec<TranslationStyle>>, ApiError> {
    Ok(Json(TranslationStyle::list_all(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn list_models(State(state): State<AppState>) -> Result<Json<Vec<Model>>, ApiError> {
    Ok(Json(Model::list_all(&state.db).await?))
}
