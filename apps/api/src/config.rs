use anyhow::{bail, Context, Result};

use crate::layout::rules::{DEFAULT_L_INTERVAL, DEFAULT_MAX_M_RUN, DEFAULT_MAX_S_RUN};
use crate::layout::LayoutRules;

/// Where gallery items are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub port: u16,
    pub rust_log: String,
    /// Lower-cased curator emails allowed into the admin surface.
    pub admin_emails: Vec<String>,
    pub layout_rules: LayoutRules,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("GALLERY_STORE").as_deref().unwrap_or("postgres") {
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL").context(
                    "Required environment variable 'DATABASE_URL' is not set (GALLERY_STORE=postgres)",
                )?,
            },
            "memory" => StoreBackend::Memory,
            other => bail!("GALLERY_STORE must be 'postgres' or 'memory', got '{other}'"),
        };

        let layout_rules = LayoutRules::with_limits(
            parse_or(&lookup, "LAYOUT_L_INTERVAL", DEFAULT_L_INTERVAL)?,
            parse_or(&lookup, "LAYOUT_MAX_M_RUN", DEFAULT_MAX_M_RUN)?,
            parse_or(&lookup, "LAYOUT_MAX_S_RUN", DEFAULT_MAX_S_RUN)?,
        )?;

        Ok(Config {
            store,
            port: parse_or(&lookup, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            admin_emails: parse_email_list(lookup("ADMIN_EMAILS").as_deref().unwrap_or("")),
            layout_rules,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect()
}
