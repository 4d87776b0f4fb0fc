use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};

/// Page on the school website that links every published schedule.
pub const SCHEDULE_PAGE_URL: &str =
    "https://school.kco27.ru/raspisanie-urokov-i-konsultacij/";

/// Rasterization resolution. The region catalog coordinates are measured at
/// this DPI, so it is not configurable.
pub const DPI: u32 = 400;

/// Selects the anchors that may point at schedule documents.
pub const ELEMENT_SELECTOR: &str = r#"a[target="_blank"]"#;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_STORE_PATH: &str = "scheduleData/scheduleData.csv";

/// The env vars that can override scraping defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapingEnv {
    schedule_http_timeout_secs: Option<u64>,
    pdfium_library_dir: Option<PathBuf>,
    schedule_store_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ScrapingConfig {
    pub http_timeout: Duration,
    pub pdfium_library_dir: Option<PathBuf>,
    pub store_path: PathBuf,
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_env = ScrapingEnv::load_from_env()?;
        Ok(Self::from_env(scraping_env))
    }

    /// Always the published schedule page; it isn't configurable.
    pub fn page_url(&self) -> &'static str {
        SCHEDULE_PAGE_URL
    }

    fn from_env(env: ScrapingEnv) -> Self {
        Self {
            http_timeout: Duration::from_secs(
                env.schedule_http_timeout_secs
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            pdfium_library_dir: env.pdfium_library_dir,
            store_path: env
                .schedule_store_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
        }
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
