use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// Bearer credential for the generation service. Always injected from
    /// the environment, never a literal.
    pub token: String,
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // .env is optional
        let _ = dotenvy::dotenv();

        let api_url =
            env::var("FORMA_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        let token = env::var("FORMA_TOKEN")
            .context("FORMA_TOKEN must be set (bearer token for the generation service)")?;

        let poll_secs: u64 = env::var("FORMA_POLL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let max_polls: u32 = env::var("FORMA_MAX_POLLS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let data_dir = env::var("FORMA_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("forma")
        });

        Ok(Self {
            api_url,
            token,
            poll_interval: Duration::from_secs(poll_secs.max(1)),
            max_polls,
            data_dir,
        })
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.json")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.data_dir.join("models")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("forma.log")
    }
}
