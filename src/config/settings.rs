use crate::core::timeparse;
use crate::domain::model::HoursWindow;
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_timezone, validate_url, Validate,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSettings {
    pub service: Option<ServiceConfig>,
    pub upstream: UpstreamConfig,
    pub auth: AuthConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub listen_port: Option<u16>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub location_id: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub token_paths: Option<Vec<String>>,
    pub token_safety_margin_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub timezone: String,
    pub fallback_open: String,
    pub fallback_close: String,
}

impl BoardSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BoardError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Substitute `${VAR_NAME}` placeholders from the environment, so
    /// secrets stay out of the config file. Unset variables are left as-is
    /// and caught by validation.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoardError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("upstream.base_url", &self.upstream.base_url)?;
        validate_url("auth.base_url", &self.auth.base_url)?;
        validate_non_empty_string("upstream.location_id", &self.upstream.location_id)?;
        validate_non_empty_string("upstream.resource_id", &self.upstream.resource_id)?;
        validate_non_empty_string("auth.client_id", &self.auth.client_id)?;
        validate_non_empty_string("auth.client_secret", &self.auth.client_secret)?;

        if self.token_paths().is_empty() {
            return Err(BoardError::MissingConfigError {
                field: "auth.token_paths".to_string(),
            });
        }

        validate_range(
            "service.request_timeout_seconds",
            self.request_timeout_seconds(),
            1,
            120,
        )?;

        let tz = validate_timezone("display.timezone", &self.display.timezone)?;

        // The grid builder treats an unparseable boundary as a hard error;
        // the fallback strings must be proven parseable up front.
        let probe_date = NaiveDate::from_ymd_opt(2000, 1, 1).ok_or_else(|| {
            BoardError::ConfigError {
                message: "probe date out of range".to_string(),
            }
        })?;
        for (field, value) in [
            ("display.fallback_open", &self.display.fallback_open),
            ("display.fallback_close", &self.display.fallback_close),
        ] {
            if timeparse::parse_time_on(probe_date, value, tz).is_none() {
                return Err(BoardError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "Not a recognized time format".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn listen_port(&self) -> u16 {
        self.service
            .as_ref()
            .and_then(|s| s.listen_port)
            .unwrap_or(8080)
    }

    pub fn request_timeout_seconds(&self) -> u64 {
        self.service
            .as_ref()
            .and_then(|s| s.request_timeout_seconds)
            .unwrap_or(10)
    }

    pub fn token_paths(&self) -> Vec<String> {
        self.auth.token_paths.clone().unwrap_or_else(|| {
            vec!["/oauth/token".to_string(), "/connect/token".to_string()]
        })
    }

    pub fn token_safety_margin_seconds(&self) -> i64 {
        self.auth.token_safety_margin_seconds.unwrap_or(60)
    }

    pub fn timezone(&self) -> Result<Tz> {
        validate_timezone("display.timezone", &self.display.timezone)
    }

    pub fn fallback_window(&self) -> HoursWindow {
        HoursWindow {
            open_time: self.display.fallback_open.clone(),
            close_time: self.display.fallback_close.clone(),
        }
    }
}

impl Validate for BoardSettings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
