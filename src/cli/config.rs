use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::store::get_config_dir;

/// Command line preferences kept next to the session file (`settings.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliSettings {
    /// Backend to talk to instead of the configured default
    pub api_url: Option<String>,
    pub last_login: Option<LoginRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRecord {
    pub email: String,
    pub api_url: String,
    pub at: DateTime<Utc>,
}

impl LoginRecord {
    pub fn now(email: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_url: api_url.into(),
            at: Utc::now(),
        }
    }
}

impl CliSettings {
    /// Explicit setting, else the environment/config default
    pub fn effective_api_url(&self) -> String {
        self.api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| crate::config::config().api.base_url.clone())
    }
}

fn settings_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join("settings.json"))
}

pub fn load_settings() -> anyhow::Result<CliSettings> {
    let path = settings_file()?;
    if !path.exists() {
        return Ok(CliSettings::default());
    }

    let content = fs::read_to_string(path)?;
    let settings: CliSettings = serde_json::from_str(&content)?;
    Ok(settings)
}

pub fn save_settings(settings: &CliSettings) -> anyhow::Result<()> {
    let path = settings_file()?;
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_falls_back_to_config() {
        let settings = CliSettings {
            api_url: Some("  ".into()),
            last_login: None,
        };
        assert_eq!(settings.effective_api_url(), crate::config::config().api.base_url);

        let settings = CliSettings {
            api_url: Some("https://hr.example.com/api".into()),
            last_login: None,
        };
        assert_eq!(settings.effective_api_url(), "https://hr.example.com/api");
    }

    #[test]
    fn login_record_round_trips() {
        let settings = CliSettings {
            api_url: None,
            last_login: Some(LoginRecord::now("asha@example.com", "http://localhost:8000/api")),
        };
        let raw = serde_json::to_string(&settings).unwrap();
        let back: CliSettings = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, settings);
    }
}
