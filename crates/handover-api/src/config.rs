use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;
const MIN_MAX_BODY_BYTES: usize = 1024;
const MAX_MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub admin_username: String,
    pub admin_password: String,
    pub max_body_bytes: usize,
    pub import_require_signatures: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("db_path", &self.db_path)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field("max_body_bytes", &self.max_body_bytes)
            .field("import_require_signatures", &self.import_require_signatures)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "HANDOVER_API_BIND_ADDR", "127.0.0.1:4000");
        let db_path = PathBuf::from(value_or_default(
            &lookup,
            "HANDOVER_DB_PATH",
            "./data/handovers.db",
        ));

        let admin_username = value_or_default(&lookup, "ADMIN_USERNAME", "admin");
        let admin_password = value_or_default(&lookup, "ADMIN_PASSWORD", "admin123");

        let max_body_bytes = optional_trimmed(&lookup, "HANDOVER_MAX_BODY_BYTES")
            .map_or(Ok(DEFAULT_MAX_BODY_BYTES), |value| value.parse::<usize>())
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "HANDOVER_MAX_BODY_BYTES must be an integer in [{MIN_MAX_BODY_BYTES}, {MAX_MAX_BODY_BYTES}]"
                ))
            })?;
        if !(MIN_MAX_BODY_BYTES..=MAX_MAX_BODY_BYTES).contains(&max_body_bytes) {
            return Err(ConfigError::Invalid(format!(
                "HANDOVER_MAX_BODY_BYTES must be in [{MIN_MAX_BODY_BYTES}, {MAX_MAX_BODY_BYTES}]"
            )));
        }

        let import_require_signatures =
            match optional_trimmed(&lookup, "HANDOVER_IMPORT_REQUIRE_SIGNATURES") {
                None => true,
                Some(value) => parse_flag(&value).ok_or_else(|| {
                    ConfigError::Invalid(
                        "HANDOVER_IMPORT_REQUIRE_SIGNATURES must be true or false".to_string(),
                    )
                })?,
            };

        Ok(Self {
            bind_addr,
            db_path,
            admin_username,
            admin_password,
            max_body_bytes,
            import_require_signatures,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
