use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

/// Per-user translation preferences; exactly one row per user, created with
/// the account or lazily on first read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: Uuid,
    pub default_source_language: String,
    pub default_target_language: String,
    pub default_translation_style: String,
    pub default_model: String,
    pub auto_save_translations: bool,
    pub auto_detect_language: bool,
    pub email_notifications: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const SETTINGS_COLUMNS: &str = "user_id, default_source_language, default_target_language, \
                                default_translation_style, default_model, auto_save_translations, \
                                auto_detect_language, email_notifications, created_at, updated_at";

impl UserSettings {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserSettings>> {
        let settings = sqlx::query_as::<_, UserSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM user_settings WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(settings)
    }

    /// Default settings row created in the registration transaction.
    pub async fn create_default(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> anyhow::Result<UserSettings> {
        let settings = sqlx::query_as::<_, UserSettings>(&format!(
            "INSERT INTO user_settings (user_id) VALUES ($1) RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(settings)
    }

    /// Fetch-or-create: a second call fetches, it never re-creates. Column
    /// defaults supply the built-in values.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<UserSettings> {
        if let Some(settings) = Self::find_by_user(db, user_id).await? {
            return Ok(settings);
        }
        let inserted = sqlx::query_as::<_, UserSettings>(&format!(
            "INSERT INTO user_settings (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        match inserted {
            Some(settings) => Ok(settings),
            // Lost a concurrent create; the row exists now.
            None => Ok(Self::find_by_user(db, user_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("settings row vanished for user {user_id}"))?),
        }
    }

    pub async fn save(&self, db: &PgPool) -> anyhow::Result<UserSettings> {
        let settings = sqlx::query_as::<_, UserSettings>(&format!(
            "UPDATE user_settings
             SET default_source_language = $2,
                 default_target_language = $3,
                 default_translation_style = $4,
                 default_model = $5,
                 auto_save_translations = $6,
                 auto_detect_language = $7,
                 email_notifications = $8,
                 updated_at = now()
             WHERE user_id = $1
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(self.user_id)
        .bind(&self.default_source_language)
        .bind(&self.default_target_language)
        .bind(&self.default_translation_style)
        .bind(&self.default_model)
        .bind(self.auto_save_translations)
        .bind(self.auto_detect_language)
        .bind(self.email_notifications)
        .fetch_one(db)
        .await?;
        Ok(settings)
    }
}
