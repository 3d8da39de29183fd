//! Email Service
//!
//! Sends password-reset emails over SMTP with templated HTML bodies.

use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::{debug, info};
use tera::{Context, Tera};

use crate::config::EmailConfig;
use crate::utils::error::{AppError, AppResult};

/// Email service for outbound account emails
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Tera,
    from_email: String,
    from_name: String,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Internal(format!("SMTP transport setup failed: {}", e)))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let glob = format!("{}/**/*.html", config.template_dir.trim_end_matches('/'));
        let templates = Tera::new(&glob)
            .map_err(|e| AppError::Internal(format!("Template loading failed: {}", e)))?;

        Ok(Self {
            transport,
            templates,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }

    /// Send a password-reset email carrying the reset link
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        to_name: &str,
        reset_url: &str,
    ) -> AppResult<()> {
        let mut context = Context::new();
        context.insert("name", to_name);
        context.insert("reset_url", reset_url);

        let html_body = self
            .templates
            .render("password_reset.html", &context)
            .map_err(|e| AppError::Internal(format!("Template rendering failed: {}", e)))?;

        let plain_body = format!(
            "Hi {},\n\nA password reset was requested for your account. \
             Open the link below to choose a new password:\n\n{}\n\n\
             If you did not request this, you can ignore this email.\n",
            to_name, reset_url
        );

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.from_name, self.from_email)
                    .parse()
                    .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::Internal(format!("Invalid recipient address: {}", e)))?)
            .subject("Reset your password")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(plain_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Email construction failed: {}", e)))?;

        debug!("sending password reset email to {}", to_email);
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(format!("Email delivery failed: {}", e)))?;

        info!("password reset email sent to {}", to_email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tera::{Context, Tera};

    #[test]
    fn test_password_reset_template_renders() {
        let templates = Tera::new("templates/**/*.html").unwrap();

        let mut context = Context::new();
        context.insert("name", "Alice");
        context.insert("reset_url", "http://localhost:3000/reset?token=abc");

        let html = templates.render("password_reset.html", &context).unwrap();
        assert!(html.contains("Alice"));
        assert!(html.contains("http://localhost:3000/reset?token=abc"));
    }
}
