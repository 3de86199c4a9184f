use std::{env, time::Duration};

use secrecy::SecretString;

use crate::generation::GenerationProfile;

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<SecretString>,
    pub quiz_profile: GenerationProfile,
    pub min_text_chars: usize,
    pub max_upload_bytes: usize,
    pub max_pdf_pages: usize,
    pub generation_timeout_secs: u64,
    pub extraction_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_server_host: "localhost".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            jwt_secret: SecretString::from(DEFAULT_JWT_SECRET.to_string()),
            jwt_expiration_hours: 24,
            llm_base_url: "http://localhost:3001".to_string(),
            llm_model: "gemma3:4b".to_string(),
            llm_api_key: None,
            quiz_profile: GenerationProfile::Compact,
            min_text_chars: 200,
            max_upload_bytes: 10 * 1024 * 1024,
            max_pdf_pages: 12,
            generation_timeout_secs: 120,
            extraction_timeout_secs: 60,
        }
    }
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            web_server_host: env::var("WEB_SERVER_HOST").unwrap_or(defaults.web_server_host),
            web_server_port: parsed_or("WEB_SERVER_PORT", defaults.web_server_port),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or(defaults.cors_allowed_origin),
            jwt_secret: env::var("JWT_SECRET")
                .map(SecretString::from)
                .unwrap_or(defaults.jwt_secret),
            jwt_expiration_hours: parsed_or("JWT_EXPIRATION_HOURS", defaults.jwt_expiration_hours),
            llm_base_url: env::var("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_model: env::var("LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_api_key: env::var("LLM_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            quiz_profile: parsed_or("QUIZ_PROFILE", defaults.quiz_profile),
            min_text_chars: parsed_or("MIN_TEXT_CHARS", defaults.min_text_chars),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            max_pdf_pages: parsed_or("MAX_PDF_PAGES", defaults.max_pdf_pages),
            generation_timeout_secs: parsed_or(
                "GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout_secs,
            ),
            extraction_timeout_secs: parsed_or(
                "EXTRACTION_TIMEOUT_SECS",
                defaults.extraction_timeout_secs,
            ),
        }
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.max_pdf_pages == 0 {
            panic!("FATAL: MAX_PDF_PAGES must be greater than zero.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            generation_timeout_secs: 5,
            extraction_timeout_secs: 5,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.llm_base_url.is_empty());
        assert!(!config.llm_model.is_empty());
        assert!(config.max_pdf_pages > 0);
    }

    #[test]
    fn test_default_limits() {
        let config = Config::default();

        assert_eq!(config.min_text_chars, 200);
        assert_eq!(config.max_pdf_pages, 12);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.quiz_profile, GenerationProfile::Compact);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.web_server_host, "127.0.0.1");
        assert_eq!(config.generation_timeout(), Duration::from_secs(5));
    }

    #[test]
    #[should_panic(expected = "JWT_SECRET is using default value")]
    fn production_validation_rejects_default_secret() {
        Config::default().validate_for_production();
    }
}
