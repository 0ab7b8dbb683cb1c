//! Email service for account notifications.
//!
//! Uses `lettre` for SMTP transport.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Recipient of a welcome mail.
#[derive(Debug, Clone)]
pub struct WelcomeRecipient<'a> {
    /// Mailbox to deliver to.
    pub email: &'a str,
    /// Name used in the greeting.
    pub full_name: &'a str,
    /// Login name, when it differs from the email address.
    pub username: Option<&'a str>,
    /// Password chosen for the account by an administrator. Sent exactly once.
    pub initial_password: Option<&'a str>,
}

/// Email service for sending account notifications.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = if self.config.smtp_username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
                .credentials(Credentials::new(
                    self.config.smtp_username.clone(),
                    self.config.smtp_password.clone(),
                ))
        };

        Ok(builder.port(self.config.smtp_port).build())
    }

    /// Sends the welcome mail that follows a successful registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_welcome(&self, recipient: &WelcomeRecipient<'_>) -> Result<(), EmailError> {
        let subject = "Welcome to Plantara";
        let body = welcome_body(recipient, &self.config.frontend_url);
        self.send_email(recipient.email, subject, &body).await
    }

    /// Sends a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = self.build_message(to_email, subject, body)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        tracing::debug!(to = %to_email, subject, "Email sent");
        Ok(())
    }

    fn build_message(&self, to_email: &str, subject: &str, body: &str) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }
}

fn welcome_body(recipient: &WelcomeRecipient<'_>, frontend_url: &str) -> String {
    let mut body = format!(
        "Hi {},\n\nYour Plantara account is ready. You can sign in at {frontend_url}/login.\n",
        recipient.full_name
    );

    if let Some(username) = recipient.username {
        body.push_str(&format!("\nUsername: {username}\n"));
    }
    if let Some(password) = recipient.initial_password {
        body.push_str(&format!(
            "Temporary password: {password}\n\nPlease change it after your first sign-in.\n"
        ));
    }

    body.push_str("\nBest regards,\nThe Plantara Team");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
    }

    #[tokio::test]
    async fn test_create_transport_without_credentials() {
        let service = EmailService::new(EmailConfig::default());
        assert!(service.create_transport().is_ok());
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let service = EmailService::new(EmailConfig::default());
        let result = service.build_message("not-an-address", "Hi", "body");
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }

    #[test]
    fn test_customer_welcome_has_no_password() {
        let body = welcome_body(
            &WelcomeRecipient {
                email: "a@b.com",
                full_name: "Nimal Perera",
                username: None,
                initial_password: None,
            },
            "http://localhost:3000",
        );
        assert!(body.starts_with("Hi Nimal Perera"));
        assert!(body.contains("http://localhost:3000/login"));
        assert!(!body.contains("password"));
    }

    #[test]
    fn test_staff_welcome_includes_credentials() {
        let body = welcome_body(
            &WelcomeRecipient {
                email: "kamal@plantara.lk",
                full_name: "Kamal Silva",
                username: Some("kamal"),
                initial_password: Some("Temp#1234"),
            },
            "http://localhost:3000",
        );
        assert!(body.contains("Username: kamal"));
        assert!(body.contains("Temporary password: Temp#1234"));
    }
}
