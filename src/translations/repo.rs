use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// History record. Created only through the translation pipeline, never
/// updated afterwards; character_count is recomputed server-side at insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub translation_style: String,
    pub ai_model_used: String,
    pub character_count: i32,
    pub processing_time_ms: i32,
    pub is_favorite: bool,
    pub created_at: OffsetDateTime,
}

const TRANSLATION_COLUMNS: &str = "id, user_id, original_text, translated_text, source_language, \
                                   target_language, translation_style, ai_model_used, \
                                   character_count, processing_time_ms, is_favorite, created_at";

pub struct NewTranslation<'a> {
    pub user_id: Uuid,
    pub original_text: &'a str,
    pub translated_text: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub translation_style: &'a str,
    pub ai_model_used: &'a str,
    pub processing_time_ms: i32,
}

impl Translation {
    pub async fn create(db: &PgPool, new: NewTranslation<'_>) -> anyhow::Result<Translation> {
        // The count comes from the stored text, never from caller input.
        let character_count = new.original_text.chars().count() as i32;
        let row = sqlx::query_as::<_, Translation>(&format!(
            "INSERT INTO translations
                 (user_id, original_text, translated_text, source_language, target_language,
                  translation_style, ai_model_used, character_count, processing_time_ms)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {TRANSLATION_COLUMNS}"
        ))
        .bind(new.user_id)
        .bind(new.original_text)
        .bind(new.translated_text)
        .bind(new.source_language)
        .bind(new.target_language)
        .bind(new.translation_style)
        .bind(new.ai_model_used)
        .bind(character_count)
        .bind(new.processing_time_ms)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Newest first; `limit` merely truncates, there is no cursor.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Translation>> {
        let rows = sqlx::query_as::<_, Translation>(&format!(
            "SELECT {TRANSLATION_COLUMNS}
             FROM translations
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Returns the number of rows removed; zero covers both "does not exist"
    /// and "owned by someone else".
    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM translations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Public projection of an active language row for the picker endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub native_name: String,
}

pub async fn list_active_languages(db: &PgPool) -> anyhow::Result<Vec<LanguageOption>> {
    let rows = sqlx::query_as::<_, LanguageOption>(
        "SELECT id, code, name, native_name
         FROM languages
         WHERE is_active = true
         ORDER BY sort_order ASC, name ASC",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StyleOption {
    pub id: Uuid,
    pub value: String,
    pub label: String,
    pub description: Option<String>,
}

pub async fn list_active_styles(db: &PgPool) -> anyhow::Result<Vec<StyleOption>> {
    let rows = sqlx::query_as::<_, StyleOption>(
        "SELECT id, value, label, description
         FROM translation_styles
         WHERE is_active = true
         ORDER BY sort_order ASC, label ASC",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(db: &PgPool, email: &str) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, 'Test', 'x') RETURNING id",
        )
        .bind(email)
        .fetch_one(db)
        .await
        .expect("seed user");
        id
    }

    async fn seed_translation(db: &PgPool, user_id: Uuid, text: &str, age_minutes: i32) {
        sqlx::query(
            "INSERT INTO translations
                 (user_id, original_text, translated_text, source_language, target_language,
                  translation_style, ai_model_used, character_count, created_at)
             VALUES ($1, $2, 't', 'en', 'es', 'formal', 'groq-llama3', 1,
                     now() - make_interval(mins => $3))",
        )
        .bind(user_id)
        .bind(text)
        .bind(age_minutes)
        .execute(db)
        .await
        .expect("seed translation");
    }

    #[sqlx::test]
    async fn list_by_user_limit_returns_most_recent(db: PgPool) {
        let alice = seed_user(&db, "alice@example.com").await;
        for (text, age) in [("oldest", 50), ("mid", 30), ("newer", 20), ("second", 10), ("newest", 0)]
        {
            seed_translation(&db, alice, text, age).await;
        }

        let rows = Translation::list_by_user(&db, alice, Some(2)).await.expect("list");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].original_text, "newest");
        assert_eq!(rows[1].original_text, "second");

        let all = Translation::list_by_user(&db, alice, None).await.expect("list all");
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].original_text, "newest");
        assert_eq!(all[4].original_text, "oldest");
    }

    #[sqlx::test]
    async fn list_by_user_only_sees_own_rows(db: PgPool) {
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;
        seed_translation(&db, alice, "hers", 0).await;

        let rows = Translation::list_by_user(&db, bob, None).await.expect("list");
        assert!(rows.is_empty());
    }

    #[sqlx::test]
    async fn delete_owned_matches_nothing_for_foreign_or_missing_rows(db: PgPool) {
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;
        seed_translation(&db, alice, "hers", 0).await;
        let row = Translation::list_by_user(&db, alice, Some(1))
            .await
            .expect("list")
            .remove(0);

        // Existing but not owned and nonexistent are indistinguishable.
        assert_eq!(Translation::delete_owned(&db, bob, row.id).await.expect("delete"), 0);
        assert_eq!(
            Translation::delete_owned(&db, alice, Uuid::new_v4()).await.expect("delete"),
            0
        );

        // The owner's delete removes exactly the row.
        assert_eq!(Translation::delete_owned(&db, alice, row.id).await.expect("delete"), 1);
        let remaining = Translation::list_by_user(&db, alice, None).await.expect("list");
        assert!(remaining.is_empty());
    }

    #[sqlx::test]
    async fn create_recomputes_character_count(db: PgPool) {
        let alice = seed_user(&db, "alice@example.com").await;
        let row = Translation::create(
            &db,
            NewTranslation {
                user_id: alice,
                original_text: "Hello",
                translated_text: "Hola",
                source_language: "en",
                target_language: "es",
                translation_style: "formal",
                ai_model_used: "groq-llama3",
                processing_time_ms: 42,
            },
        )
        .await
        .expect("create");
        assert_eq!(row.character_count, 5);
        assert_eq!(row.processing_time_ms, 42);
    }

    #[test]
    fn translation_serializes_camel_case() {
        let row = Translation {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            original_text: "Hello".into(),
            translated_text: "Hola".into(),
            source_language: "en".into(),
            target_language: "es".into(),
            translation_style: "formal".into(),
            ai_model_used: "groq-llama3".into(),
            character_count: 5,
            processing_time_ms: 120,
            is_favorite: false,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("originalText"));
        assert!(json.contains("characterCount"));
        assert!(json.contains("aiModelUsed"));
        assert!(!json.contains("original_text"));
    }
}
