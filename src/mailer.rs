use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = if config.username.is_empty() {
            // Local relay (Mailpit, MailHog) without auth
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                .credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ))
                .build()
        };
        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(email).await?;
        info!(%to, "email dispatched");
        Ok(())
    }
}

/// Body of the password-reset email. The plaintext token only ever lives in
/// this URL; storage keeps its digest.
pub fn reset_password_email(name: &str, reset_url: &str) -> String {
    format!(
        "<p>Hi {name},</p>\
         <p>We received a request to reset your password. Click the link below to choose a new one. \
         The link expires in one hour.</p>\
         <p><a href=\"{reset_url}\">Reset your password</a></p>\
         <p>If you did not request this, you can safely ignore this email.</p>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_email_embeds_url_and_name() {
        let body = reset_password_email(
            "Alice",
            "http://localhost:3000/auth/reset-password?token=abc123",
        );
        assert!(body.contains("Hi Alice"));
        assert!(body.contains("reset-password?token=abc123"));
        assert!(body.contains("expires in one hour"));
    }
}
