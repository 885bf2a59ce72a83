use serde::{Deserialize, Serialize};

const DEFAULT_BACKEND_URL: &str = "https://7n0wver1gl.execute-api.eu-west-2.amazonaws.com/dev";
const DEFAULT_PHARMACY_NO: &str = "PN1853278176";
const DEFAULT_UPLOAD_OBJECT_TYPE: &str = "vaccine";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub pharmacy_no: String,
    pub environment: String,
    pub enable_logging: bool,
    pub upload_object_type: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            pharmacy_no: DEFAULT_PHARMACY_NO.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            upload_object_type: DEFAULT_UPLOAD_OBJECT_TYPE.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolves the configuration from compile-time environment variables
    /// (`build.rs` forwards `.env`), falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("BACKEND_URL"),
            option_env!("PHARMACY_NO"),
            option_env!("ENVIRONMENT"),
            option_env!("ENABLE_LOGGING"),
            option_env!("UPLOAD_OBJECT_TYPE"),
        )
    }

    fn from_values(
        backend_url: Option<&str>,
        pharmacy_no: Option<&str>,
        environment: Option<&str>,
        enable_logging: Option<&str>,
        upload_object_type: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            backend_url: backend_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            pharmacy_no: pharmacy_no.map(str::to_string).unwrap_or(defaults.pharmacy_no),
            environment: environment.map(str::to_string).unwrap_or(defaults.environment),
            enable_logging: enable_logging
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            upload_object_type: upload_object_type
                .map(str::to_string)
                .unwrap_or(defaults.upload_object_type),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_dev_gateway() {
        let config = AppConfig::from_values(None, None, None, None, None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.pharmacy_no, "PN1853278176");
        assert!(!config.is_production());
    }

    #[test]
    fn overrides_are_applied_and_trailing_slash_dropped() {
        let config = AppConfig::from_values(
            Some("https://api.example.test/prod/"),
            Some("PN42"),
            Some("production"),
            Some("false"),
            Some("images"),
        );
        assert_eq!(config.backend_url, "https://api.example.test/prod");
        assert_eq!(config.pharmacy_no, "PN42");
        assert!(config.is_production());
        assert!(!config.is_logging_enabled());
        assert_eq!(config.upload_object_type, "images");
    }

    #[test]
    fn unparsable_logging_flag_keeps_default() {
        let config = AppConfig::from_values(None, None, None, Some("yes please"), None);
        assert!(config.is_logging_enabled());
    }
}
