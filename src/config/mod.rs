use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub table: TableConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is joined onto, e.g. `http://localhost:8000/api`
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub search_debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the default `$HOME/.config/smart-hr` location
    pub config_dir: Option<PathBuf>,
    pub export_file: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("SMART_HR_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("SMART_HR_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("SMART_HR_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Table overrides
        if let Ok(v) = env::var("SMART_HR_SEARCH_DEBOUNCE_MS") {
            self.table.search_debounce_ms = v.parse().unwrap_or(self.table.search_debounce_ms);
        }

        // Storage overrides
        if let Ok(v) = env::var("SMART_HR_CONFIG_DIR") {
            self.storage.config_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("SMART_HR_EXPORT_FILE") {
            self.storage.export_file = v;
        }

        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.table.search_debounce_ms)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                request_timeout_secs: 30,
                enable_request_logging: true,
            },
            table: TableConfig {
                search_debounce_ms: 500,
            },
            storage: StorageConfig {
                config_dir: None,
                export_file: "master-data.xlsx".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.smart-hr.invalid/api".to_string(),
                request_timeout_secs: 15,
                enable_request_logging: true,
            },
            table: TableConfig {
                search_debounce_ms: 500,
            },
            storage: StorageConfig {
                config_dir: None,
                export_file: "master-data.xlsx".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://smart-hr.invalid/api".to_string(),
                request_timeout_secs: 10,
                enable_request_logging: false,
            },
            table: TableConfig {
                search_debounce_ms: 500,
            },
            storage: StorageConfig {
                config_dir: None,
                export_file: "master-data.xlsx".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
