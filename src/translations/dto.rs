use serde::{Deserialize, Serialize};

use crate::ai::{route_model, TranslationJob, DEFAULT_MODEL};

use super::repo::Translation;

pub const MAX_TEXT_LENGTH: usize = 5000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTranslationRequest {
    pub original_text: String,
    pub target_language: String,
    pub source_language: Option<String>,
    pub style: Option<String>,
    pub model: Option<String>,
}

impl CreateTranslationRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.original_text.trim().is_empty() {
            errors.push("originalText must not be empty".into());
        } else if self.original_text.chars().count() > MAX_TEXT_LENGTH {
            errors.push(format!(
                "originalText must be at most {MAX_TEXT_LENGTH} characters"
            ));
        }
        let target_len = self.target_language.len();
        if !(2..=10).contains(&target_len) {
            errors.push("targetLanguage must be between 2 and 10 characters".into());
        }
        if let Some(model) = &self.model {
            if route_model(model).is_none() {
                errors.push(format!("model '{model}' is not available"));
            }
        }
        errors
    }

    /// Applies the documented defaults and produces the job handed to the
    /// AI collaborator.
    pub fn into_job(self) -> TranslationJob {
        TranslationJob {
            text: self.original_text,
            source_language: self.source_language.unwrap_or_else(|| "auto".into()),
            target_language: self.target_language,
            style: self.style.unwrap_or_else(|| "formal".into()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

impl HistoryQuery {
    /// A negative limit is a caller error, not something to hand Postgres.
    pub fn validate(&self) -> Vec<String> {
        match self.limit {
            Some(n) if n < 0 => vec!["limit must be a non-negative integer".into()],
            _ => Vec::new(),
        }
    }
}

/// History responses wrap the rows, matching the public API shape.
#[derive(Debug, Serialize)]
pub struct TranslationList {
    pub translations: Vec<Translation>,
}
