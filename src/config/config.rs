use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::Deserialize;

pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::load().unwrap_or_else(|e| panic!("Failed to load configuration: {}", e))
});

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub admin_email: String,
    pub image_host: ImageHostConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub rehearsal: RehearsalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageHostConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct QuizConfig {
    /// JSON file with the question bank. The built-in bank is used when unset.
    pub questions_path: Option<String>,
}

/// Scripted run the projector binary plays against its own store.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RehearsalConfig {
    pub enabled: bool,
    pub guests: usize,
    /// Pause between rehearsal steps.
    pub pace_ms: u64,
    pub seed: Option<u64>,
    /// Already hosted images submitted and approved in photo mode.
    pub photo_urls: Vec<String>,
}

impl Default for RehearsalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            guests: 24,
            pace_ms: 4000,
            seed: None,
            photo_urls: (1..=5)
                .map(|n| format!("https://picsum.photos/seed/wedding{}/1280/720", n))
                .collect(),
        }
    }
}

impl AppConfig {
    /// Defaults, then an optional `wedding.toml`, then `WEDDING__*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("log_level", "debug")?
            .set_default("admin_email", "admin@example.com")?
            .set_default("image_host.base_url", "https://api.cloudinary.com/v1_1")?
            .set_default("image_host.cloud_name", "")?
            .set_default("image_host.upload_preset", "Unsigned_preset")?
            .add_source(File::with_name("wedding").required(false))
            .add_source(Environment::with_prefix("WEDDING").separator("__"))
            .build()?
            .try_deserialize()
    }
}
