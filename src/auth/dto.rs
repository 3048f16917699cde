use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push("email must be a valid email address".into());
        }
        if self.name.trim().is_empty() {
            errors.push("name must not be empty".into());
        }
        if self.password.len() < 8 {
            errors.push("password must be at least 8 characters".into());
        }
        errors
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.token.trim().is_empty() {
            errors.push("token must not be empty".into());
        }
        if self.password.len() < 8 {
            errors.push("password must be at least 8 characters".into());
        }
        errors
    }
}

/// Public part of the user returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Response for register, login and reset-password.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: PublicUser,
    pub access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn register_request_collects_all_field_errors() {
        let req = RegisterRequest {
            email: "nope".into(),
            name: "  ".into(),
            password: "short".into(),
        };
        let errors = req.validate();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn register_request_accepts_valid_input() {
        let req = RegisterRequest {
            email: "alice@example.com".into(),
            name: "Alice".into(),
            password: "Secret123!".into(),
        };
        assert!(req.validate().is_empty());
    }

    #[test]
    fn auth_response_uses_camel_case() {
        let res = AuthResponse {
            user: PublicUser {
                id: Uuid::new_v4(),
                email: "alice@example.com".into(),
                name: "Alice".into(),
            },
            access_token: "tok".into(),
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("accessToken"));
        assert!(!json.contains("access_token"));
    }
}
