use std::env;
use crate::error::{AppError, Result};
use dotenvy::dotenv;
use url::Url;

/// Default annotation endpoint; override with `VISION_ENDPOINT`.
pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Default number of labels requested per image.
pub const DEFAULT_MAX_RESULTS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub endpoint: Url,
    pub max_results: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let api_key = env::var("VISION_API_KEY")
            .map_err(|_| AppError::Config("VISION_API_KEY must be set in environment or .env file".to_string()))?;

        let endpoint = env::var("VISION_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| AppError::Config(format!("Invalid VISION_ENDPOINT: {}", e)))?;

        let max_results = match env::var("VISION_MAX_RESULTS") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|_| AppError::Config(format!("VISION_MAX_RESULTS must be a positive integer, got '{}'", v)))?,
            Err(_) => DEFAULT_MAX_RESULTS,
        };

        Ok(Self {
            api_key,
            endpoint,
            max_results,
        })
    }

    /// Builds a configuration from explicit values, bypassing the environment.
    pub fn with_key(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            endpoint: Url::parse(DEFAULT_ENDPOINT)
                .map_err(|e| AppError::Config(format!("Invalid default endpoint: {}", e)))?,
            max_results: DEFAULT_MAX_RESULTS,
        })
    }
}
