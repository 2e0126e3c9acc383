//! Handler-facing mail sender.

use crate::email::{EmailDelivery, EmailError};
use crate::notification::Notification;

/// Sends [`Notification`]s over SMTP, or only logs them when no transport is
/// configured.
#[derive(Debug, Clone, Default)]
pub struct Mailer {
    delivery: Option<EmailDelivery>,
}

impl Mailer {
    pub fn new(delivery: Option<EmailDelivery>) -> Self {
        Self { delivery }
    }

    /// A mailer that never opens a connection.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.delivery.is_some()
    }

    /// Send a notification and wait for the outcome.
    pub async fn send(&self, to: &str, notification: &Notification) -> Result<(), EmailError> {
        match &self.delivery {
            Some(delivery) => {
                delivery
                    .send(to, &notification.subject(), notification.body())
                    .await
            }
            None => {
                tracing::info!(
                    to,
                    kind = notification.kind(),
                    "SMTP not configured, email not sent"
                );
                Ok(())
            }
        }
    }

    /// Send a notification on a background task. Failures are logged and
    /// never reach the caller.
    pub fn dispatch(&self, to: impl Into<String>, notification: Notification) {
        let mailer = self.clone();
        let to = to.into();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, &notification).await {
                tracing::warn!(
                    error = %e,
                    to = %to,
                    kind = notification.kind(),
                    "Failed to send email"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_mailer_succeeds_without_transport() {
        let mailer = Mailer::disabled();
        assert!(!mailer.is_enabled());
        let result = mailer
            .send(
                "jane@example.com",
                &Notification::OrderDelivered {
                    customer_name: "Jane".into(),
                    order_id: 3,
                },
            )
            .await;
        assert!(result.is_ok());
    }
}
