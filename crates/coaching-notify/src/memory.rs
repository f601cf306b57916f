//! In-Memory Mailer
//!
//! For testing and local runs without an SMTP relay.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::mailer::{Mailer, OutgoingEmail};
use crate::error::{NotifyError, Result};

/// Mailer that keeps every delivered message in memory
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    rejected: HashSet<String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every delivery to `address`, as a bouncing relay would
    #[must_use]
    pub fn rejecting(mut self, address: impl Into<String>) -> Self {
        self.rejected.insert(address.into());
        self
    }

    /// Messages delivered so far
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        if self.rejected.contains(&email.to) {
            return Err(NotifyError::Transport(format!("recipient rejected: {}", email.to)));
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "Memory"
    }
}
