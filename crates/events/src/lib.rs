//! Outbound transactional email.
//!
//! - [`EmailConfig`] / [`EmailDelivery`]: SMTP transport built on `lettre`.
//! - [`Notification`]: the messages the platform sends, rendered to plain text.
//! - [`Mailer`]: what request handlers hold. Falls back to logging when SMTP
//!   is not configured, and can dispatch in the background so that a mail
//!   failure never fails the request that triggered it.

pub mod email;
pub mod mailer;
pub mod notification;

pub use email::{EmailConfig, EmailDelivery, EmailError};
pub use mailer::Mailer;
pub use notification::Notification;
