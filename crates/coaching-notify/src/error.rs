//! Error Types for Notifications

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotifyError>;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Message build error: {0}")]
    Message(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<lettre::address::AddressError> for NotifyError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::Address(err.to_string())
    }
}

impl From<lettre::error::Error> for NotifyError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Message(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
