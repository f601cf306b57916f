//! Startup Configuration
//!
//! Read once from the process environment (after `.env` is loaded) and
//! never mutated afterwards.

use thiserror::Error;

use coaching_notify::{SmtpConfig, DEFAULT_SMTP_PORT};
use coaching_payments::is_valid_email;

const DEFAULT_ALLOWED_ORIGIN: &str = "https://prowleradc.github.io";
const DEFAULT_PORT: &str = "3000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which Stripe key set is in use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripeMode {
    Test,
    Live,
}

impl StripeMode {
    fn from_app_env(app_env: Option<&str>) -> Self {
        match app_env.map(str::to_lowercase).as_deref() {
            Some("production" | "live") => Self::Live,
            _ => Self::Test,
        }
    }

    const fn key_var(self) -> &'static str {
        match self {
            Self::Test => "STRIPE_TEST_SECRET_KEY",
            Self::Live => "STRIPE_LIVE_SECRET_KEY",
        }
    }
}

/// Process-wide settings
#[derive(Clone)]
pub struct Config {
    pub stripe_mode: StripeMode,
    pub stripe_secret_key: String,
    pub webhook_secret: String,
    pub smtp: SmtpConfig,
    pub operator_email: String,
    pub allowed_origins: Vec<String>,
    pub frontend_url: String,
    pub bind_addr: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("stripe_mode", &self.stripe_mode)
            .field("smtp", &self.smtp)
            .field("operator_email", &self.operator_email)
            .field("allowed_origins", &self.allowed_origins)
            .field("frontend_url", &self.frontend_url)
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let stripe_mode = StripeMode::from_app_env(optional("APP_ENV").as_deref());
        let stripe_secret_key = required(stripe_mode.key_var())?;
        let webhook_secret = required("STRIPE_WEBHOOK_SECRET")?;

        let port = match optional("SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "SMTP_PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_SMTP_PORT,
        };
        let mut smtp = SmtpConfig::new(
            required("SMTP_HOST")?,
            required("SMTP_USER")?,
            required("SMTP_PASS")?,
        )
        .with_port(port);
        if let Some(from) = optional("SMTP_FROM") {
            smtp = smtp.with_from(from);
        }

        let operator_email = required("OPERATOR_EMAIL")?;
        if !is_valid_email(&operator_email) {
            return Err(ConfigError::Invalid {
                name: "OPERATOR_EMAIL",
                reason: "not an email address".into(),
            });
        }

        let allowed_origins = optional("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.into())
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let frontend_url = required("FRONTEND_URL")?;

        let bind_addr = optional("BIND_ADDR").unwrap_or_else(|| {
            format!("0.0.0.0:{}", optional("PORT").unwrap_or_else(|| DEFAULT_PORT.into()))
        });

        Ok(Self {
            stripe_mode,
            stripe_secret_key,
            webhook_secret,
            smtp,
            operator_email,
            allowed_origins,
            frontend_url,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("STRIPE_TEST_SECRET_KEY", "sk_test_1"),
        ("STRIPE_WEBHOOK_SECRET", "whsec_1"),
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_USER", "coach@example.com"),
        ("SMTP_PASS", "pw"),
        ("OPERATOR_EMAIL", "ops@example.com"),
        ("FRONTEND_URL", "https://example.github.io/"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut pairs = BASE.to_vec();
        pairs.extend_from_slice(extra);
        pairs
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(env(BASE)).unwrap();
        assert_eq!(config.stripe_mode, StripeMode::Test);
        assert_eq!(config.stripe_secret_key, "sk_test_1");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.sender(), "coach@example.com");
        assert_eq!(config.allowed_origins, vec!["https://prowleradc.github.io"]);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_smtp_is_fatal() {
        let pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != "SMTP_PASS").collect();
        assert_eq!(
            Config::from_lookup(env(&pairs)).unwrap_err(),
            ConfigError::Missing("SMTP_PASS")
        );
    }

    #[test]
    fn test_live_mode_needs_live_key() {
        let err = Config::from_lookup(env(&with(&[("APP_ENV", "production")]))).unwrap_err();
        assert_eq!(err, ConfigError::Missing("STRIPE_LIVE_SECRET_KEY"));

        let config = Config::from_lookup(env(&with(&[
            ("APP_ENV", "production"),
            ("STRIPE_LIVE_SECRET_KEY", "sk_live_1"),
        ])))
        .unwrap();
        assert_eq!(config.stripe_mode, StripeMode::Live);
        assert_eq!(config.stripe_secret_key, "sk_live_1");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Config::from_lookup(env(&with(&[("STRIPE_WEBHOOK_SECRET", "")]))).unwrap_err();
        assert_eq!(err, ConfigError::Missing("STRIPE_WEBHOOK_SECRET"));
    }

    #[test]
    fn test_origins_and_port() {
        let config = Config::from_lookup(env(&with(&[
            ("ALLOWED_ORIGINS", "https://a.io, https://b.io/ ,"),
            ("SMTP_PORT", "2525"),
            ("PORT", "8080"),
        ])))
        .unwrap();
        assert_eq!(config.allowed_origins, vec!["https://a.io", "https://b.io"]);
        assert_eq!(config.smtp.port, 2525);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(env(&with(&[("SMTP_PORT", "smtp")]))).unwrap_err(),
            ConfigError::Invalid { name: "SMTP_PORT", .. }
        ));
        assert!(matches!(
            Config::from_lookup(env(&with(&[("OPERATOR_EMAIL", "ops")]))).unwrap_err(),
            ConfigError::Invalid { name: "OPERATOR_EMAIL", .. }
        ));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", Config::from_lookup(env(BASE)).unwrap());
        assert!(!rendered.contains("sk_test_1"));
        assert!(!rendered.contains("whsec_1"));
    }
}
