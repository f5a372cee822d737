use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Unset key means the chat endpoint answers 503 instead of calling out.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub model: ModelConfig,
    pub affiliate_tag: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "platewise".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "platewise-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let model = ModelConfig {
            api_key: std::env::var("MODEL_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("MODEL_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".into()),
            timeout_secs: std::env::var("MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60),
        };
        let affiliate_tag = std::env::var("AFFILIATE_TAG").unwrap_or_else(|_| "platewise".into());
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            model,
            affiliate_tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_applies_defaults() {
        std::env::set_var("DATABASE_URL", "postgres://postgres@localhost/platewise");
        std::env::set_var("JWT_SECRET", "test-secret");
        for var in ["APP_HOST", "APP_PORT", "JWT_TTL_MINUTES", "MODEL_TIMEOUT_SECS"] {
            std::env::remove_var(var);
        }
        let config = AppConfig::from_env().expect("config builds");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt.ttl_minutes, 60);
        assert_eq!(config.model.timeout_secs, 60);
    }
}

