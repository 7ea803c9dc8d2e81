// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration, loaded from the process environment.

/// Mirrors `original_source/src/custom_types.py`'s `AppEnvVariables`: the
/// database location plus an optional, all-or-nothing SMTP block.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl AppConfig {
    pub fn from_env(database_url: String) -> Self {
        Self {
            database_url,
            smtp_host: env_string("MONEYBOX_SMTP_HOST"),
            smtp_port: env_string("MONEYBOX_SMTP_PORT").and_then(|v| v.parse().ok()),
            smtp_user: env_string("MONEYBOX_SMTP_USER"),
            smtp_password: env_string("MONEYBOX_SMTP_PASSWORD"),
        }
    }

    /// `true` only when every SMTP field is present, matching
    /// `AppEnvVariables.smtp_ready` in the original report-sender module.
    pub fn smtp_ready(&self) -> bool {
        self.smtp_host.is_some()
            && self.smtp_port.is_some()
            && self.smtp_user.is_some()
            && self.smtp_password.is_some()
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_when_no_smtp_fields_are_set() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
        };
        assert!(!config.smtp_ready());
    }

    #[test]
    fn not_ready_when_only_some_smtp_fields_are_set() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: Some(587),
            smtp_user: None,
            smtp_password: None,
        };
        assert!(!config.smtp_ready());
    }

    #[test]
    fn ready_when_all_smtp_fields_are_set() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: Some(587),
            smtp_user: Some("reports".to_string()),
            smtp_password: Some("hunter2".to_string()),
        };
        assert!(config.smtp_ready());
    }
}
