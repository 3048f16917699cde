use serde::Deserialize;

use super::repo::UserSettings;

/// Partial update: omitted fields leave the stored value untouched. Codes
/// are not cross-checked against the reference tables.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub default_source_language: Option<String>,
    pub default_target_language: Option<String>,
    pub default_translation_style: Option<String>,
    pub default_model: Option<String>,
    pub auto_save_translations: Option<bool>,
    pub auto_detect_language: Option<bool>,
    pub email_notifications: Option<bool>,
}

impl UpdateSettingsRequest {
    pub fn apply(&self, settings: &mut UserSettings) {
        if let Some(v) = &self.default_source_language {
            settings.default_source_language = v.clone();
        }
        if let Some(v) = &self.default_target_language {
            settings.default_target_language = v.clone();
        }
        if let Some(v) = &self.default_translation_style {
            settings.default_translation_style = v.clone();
        }
        if let Some(v) = &self.default_model {
            settings.default_model = v.clone();
        }
        if let Some(v) = self.auto_save_translations {
            settings.auto_save_translations = v;
        }
        if let Some(v) = self.auto_detect_language {
            settings.auto_detect_language = v;
        }
        if let Some(v) = self.email_notifications {
            settings.email_notifications = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn defaults() -> UserSettings {
        UserSettings {
            user_id: Uuid::new_v4(),
            default_source_language: "auto".into(),
            default_target_language: "en".into(),
            default_translation_style: "formal".into(),
            default_model: "groq-llama3".into(),
            auto_save_translations: true,
            auto_detect_language: true,
            email_notifications: false,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn apply_overlays_only_supplied_fields() {
        let mut settings = defaults();
        let update = UpdateSettingsRequest {
            default_target_language: Some("es".into()),
            email_notifications: Some(true),
            ..Default::default()
        };
        update.apply(&mut settings);
        assert_eq!(settings.default_target_language, "es");
        assert!(settings.email_notifications);
        // untouched fields keep their values
        assert_eq!(settings.default_source_language, "auto");
        assert_eq!(settings.default_translation_style, "formal");
        assert!(settings.auto_save_translations);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut settings = defaults();
        UpdateSettingsRequest::default().apply(&mut settings);
        assert_eq!(settings.default_target_language, "en");
        assert_eq!(settings.default_model, "groq-llama3");
    }

    #[test]
    fn update_deserializes_camel_case() {
        let update: UpdateSettingsRequest =
            serde_json::from_str(r#"{"defaultTargetLanguage":"fr","autoSaveTranslations":false}"#)
                .unwrap();
        assert_eq!(update.default_target_language.as_deref(), Some("fr"));
        assert_eq!(update.auto_save_translations, Some(false));
        assert!(update.default_model.is_none());
    }
}
