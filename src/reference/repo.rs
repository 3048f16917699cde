use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

// Reference rows are seeded by migration and read-only at runtime.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Language {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Language>> {
        let rows = sqlx::query_as::<_, Language>(
            "SELECT id, code, name, native_name, is_active, sort_order, created_at, updated_at
             FROM languages
             ORDER BY sort_order ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TranslationStyle {
    pub id: Uuid,
    pub value: String,
    pub label: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TranslationStyle {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<TranslationStyle>> {
        let rows = sqlx::query_as::<_, TranslationStyle>(
            "SELECT id, value, label, description, is_active, sort_order, created_at, updated_at
             FROM translation_styles
             ORDER BY sort_order ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: Uuid,
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Model {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Model>> {
        let rows = sqlx::query_as::<_, Model>(
            "SELECT id, value, label, disabled, created_at, updated_at FROM models",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
