use std::{env, fs, path::Path, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_CHART_URL: &str = "https://www.imdb.com/chart/top/";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_DIR: &str = "generated_images";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub chart_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub image_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chart_url: DEFAULT_CHART_URL.to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    chart_url: Option<String>,
    #[serde(alias = "openai_key")]
    openai_api_key: Option<String>,
    openai_base_url: Option<String>,
    chat_model: Option<String>,
    image_model: Option<String>,
    image_dir: Option<String>,
    export_dir: Option<String>,
}

/// Load `config.json` from the working directory, falling back to defaults.
pub fn load_config() -> AppConfig {
    let mut cfg = load_config_from(Path::new(CONFIG_FILE));
    if cfg.openai_api_key.is_none() {
        cfg.openai_api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
    }
    if cfg.openai_api_key.is_none() {
        warn!("No OpenAI API key in {CONFIG_FILE} or ${API_KEY_ENV}; generation will fail.");
    }
    cfg
}

/// Merge the file at `cfg_path` over the defaults. Missing or unparsable files
/// are not errors.
pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(url) = non_blank(parsed.chart_url) {
                    cfg.chart_url = url;
                }
                if let Some(key) = non_blank(parsed.openai_api_key) {
                    cfg.openai_api_key = Some(key);
                }
                if let Some(url) = non_blank(parsed.openai_base_url) {
                    cfg.openai_base_url = url.trim_end_matches('/').to_string();
                }
                if let Some(model) = non_blank(parsed.chat_model) {
                    cfg.chat_model = model;
                }
                if let Some(model) = non_blank(parsed.image_model) {
                    cfg.image_model = model;
                }
                if let Some(dir) = non_blank(parsed.image_dir) {
                    cfg.image_dir = PathBuf::from(dir);
                }
                if let Some(dir) = non_blank(parsed.export_dir) {
                    cfg.export_dir = PathBuf::from(dir);
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Using defaults.",
                    cfg_path.display(),
                    err
                );
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
        }
    }

    cfg
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.json"));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"{{"openai_key":"sk-test","openai_base_url":"http://localhost:8080/v1/","chat_model":"  ","image_dir":"imgs"}}"#
        )
        .unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.openai_base_url, "http://localhost:8080/v1");
        assert_eq!(cfg.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(cfg.image_dir, PathBuf::from("imgs"));
        assert_eq!(cfg.chart_url, DEFAULT_CHART_URL);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ this is not json").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
    }
}
