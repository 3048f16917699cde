use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            is_valid_email, AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse,
            PublicUser, RegisterRequest, ResetPasswordRequest, UserProfile,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{generate_reset_token, hash_password, hash_reset_token, verify_password},
        repo::User,
    },
    error::ApiError,
    mailer::reset_password_email,
    state::AppState,
    users::repo::UserSettings,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/profile", get(get_profile))
}

fn public(user: &User) -> PublicUser {
    PublicUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    }
}

/// Same verification as login but returns the public identity instead of
/// failing, for sign-in collaborators that want a yes/no answer.
pub async fn validate_credentials(
    db: &PgPool,
    email: &str,
    password: &str,
) -> anyhow::Result<Option<PublicUser>> {
    let Some(user) = User::find_by_email(db, email).await? else {
        return Ok(None);
    };
    if verify_password(password, &user.password_hash)? {
        Ok(Some(public(&user)))
    } else {
        Ok(None)
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_string();

    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User with this email already exists".into()));
    }

    let hash = hash_password(&payload.password)?;

    // User and default settings land together or not at all.
    let mut tx = state.db.begin().await?;
    let user = User::create(&mut tx, &payload.email, &payload.name, &hash).await?;
    UserSettings::create_default(&mut tx, user.id).await?;
    tx.commit().await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: public(&user),
            access_token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation(vec![
            "email must be a valid email address".into(),
        ]));
    }

    // Unknown email and wrong password are indistinguishable to the caller.
    let Some(user) = validate_credentials(&state.db, &payload.email, &payload.password).await?
    else {
        warn!(email = %payload.email, "login rejected");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    };

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        user,
        access_token,
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let user = User::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = User::find_by_email(&state.db, payload.email.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("User with this email does not exist".into()))?;

    let token = generate_reset_token();
    let digest = hash_reset_token(&token);
    let expires = OffsetDateTime::now_utc() + Duration::hours(1);
    User::set_reset_token(&state.db, user.id, &digest, expires).await?;

    let reset_url = format!(
        "{}/auth/reset-password?token={token}",
        state.config.frontend_url
    );
    state
        .mailer
        .send(
            &user.email,
            "Password Reset Request",
            &reset_password_email(&user.name, &reset_url),
        )
        .await?;

    info!(user_id = %user.id, "password reset email dispatched");
    Ok(Json(MessageResponse {
        message: "If a user with this email exists, a password reset link has been sent.".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // One generic failure for unknown and expired tokens alike.
    let digest = hash_reset_token(&payload.token);
    let user = User::find_by_reset_digest(&state.db, &digest)
        .await?
        .ok_or_else(|| {
            warn!("reset attempted with invalid or expired token");
            ApiError::BadRequest("Password reset token is invalid or has expired.".into())
        })?;

    let hash = hash_password(&payload.password)?;
    User::complete_password_reset(&state.db, user.id, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, "password reset completed");
    Ok(Json(AuthResponse {
        user: public(&user),
        access_token,
    }))
}
