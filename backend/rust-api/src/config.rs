use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    pub session_ttl_hours: i64,
    pub gemini_api_url: String,
    pub gemini_api_key: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let data_dir = settings
            .get_string("storage.data_dir")
            .or_else(|_| env::var("DATA_DIR"))
            .unwrap_or_else(|_| "data".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let session_ttl_hours = settings
            .get_int("session.ttl_hours")
            .ok()
            .or_else(|| {
                env::var("SESSION_TTL_HOURS")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .unwrap_or(2);

        let gemini_api_url = settings
            .get_string("chat.gemini_api_url")
            .or_else(|_| env::var("GEMINI_API_URL"))
            .unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
                    .to_string()
            });

        let gemini_api_key = settings
            .get_string("chat.gemini_api_key")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .unwrap_or_else(|_| {
                eprintln!("WARNING: GEMINI_API_KEY not set; the chat assistant will answer with a fallback message");
                String::new()
            });

        Ok(Config {
            data_dir: PathBuf::from(data_dir),
            bind_addr,
            session_ttl_hours,
            gemini_api_url,
            gemini_api_key,
        })
    }
}
