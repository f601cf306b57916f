//! # coaching-notify
//!
//! Booking confirmation emails. The [`Mailer`] trait hides the transport
//! (SMTP relay in production, memory in tests); [`CompletionNotifier`] sends
//! one copy to the buyer and one to the operator for each paid checkout.

mod confirmation;
mod error;
mod mailer;
mod memory;
mod notifier;
mod smtp;

pub use confirmation::{Confirmation, Recipient, CONFIRMATION_SUBJECT};
pub use error::{NotifyError, Result};
pub use mailer::{Mailer, OutgoingEmail};
pub use memory::MemoryMailer;
pub use notifier::{CompletionNotifier, NotificationReport};
pub use smtp::{SmtpConfig, SmtpMailer, DEFAULT_SMTP_PORT};
