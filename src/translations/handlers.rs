use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateTranslationRequest, HistoryQuery, TranslationList},
    repo::{self, NewTranslation, Translation},
};
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn translation_routes() -> Router<AppState> {
    Router::new()
        .route("/translations/languages", get(list_languages))
        .route("/translations/styles", get(list_styles))
        .route("/translations", post(create_translation).get(list_translations))
        .route("/translations/recent", get(list_recent_translations))
        .route("/translations/:id", delete(delete_translation))
}

#[instrument(skip(state))]
pub async fn list_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<repo::LanguageOption>>, ApiError> {
    Ok(Json(repo::list_active_languages(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn list_styles(
    State(state): State<AppState>,
) -> Result<Json<Vec<repo::StyleOption>>, ApiError> {
    Ok(Json(repo::list_active_styles(&state.db).await?))
}

/// The pipeline: validate, build the prompt job, call the provider, persist.
/// Provider failures surface as 500s naming the provider; there is no retry
/// and no fallback provider.
#[instrument(skip(state, payload))]
pub async fn create_translation(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(payload): Json<CreateTranslationRequest>,
) -> Result<(StatusCode, Json<Translation>), ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let job = payload.into_job();

    let started = Instant::now();
    let generated = state
        .ai
        .translate(&job)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    let processing_time_ms = started.elapsed().as_millis() as i32;

    let row = Translation::create(
        &state.db,
        NewTranslation {
            user_id: current.id,
            original_text: &job.text,
            translated_text: &generated.text,
            source_language: &job.source_language,
            target_language: &job.target_language,
            translation_style: &job.style,
            ai_model_used: &generated.model_used,
            processing_time_ms,
        },
    )
    .await?;

    info!(
        user_id = %current.id,
        translation_id = %row.id,
        model = %row.ai_model_used,
        chars = row.character_count,
        "translation created"
    );
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn list_translations(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<TranslationList>, ApiError> {
    let errors = query.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let translations = Translation::list_by_user(&state.db, current.id, query.limit).await?;
    Ok(Json(TranslationList { translations }))
}

#[instrument(skip(state))]
pub async fn list_recent_translations(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<Json<TranslationList>, ApiError> {
    let translations = Translation::list_by_user(&state.db, current.id, Some(5)).await?;
    Ok(Json(TranslationList { translations }))
}

#[instrument(skip(state))]
pub async fn delete_translation(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = Translation::delete_owned(&state.db, current.id, id).await?;
    if deleted == 0 {
        // Nonexistent and not-owned look identical to the caller.
        warn!(user_id = %current.id, translation_id = %id, "delete matched no rows");
        return Err(ApiError::NotFound(format!(
            "Translation with ID \"{id}\" not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
