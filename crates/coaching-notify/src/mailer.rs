//! Mail Transport Abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A rendered HTML email, ready for a transport
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mail transport trait (Strategy pattern)
///
/// Implement this for each delivery backend: SMTP relay, in-memory, etc.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. Not retried on failure.
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;

    /// Transport name
    fn name(&self) -> &str;
}
