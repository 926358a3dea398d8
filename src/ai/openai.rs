use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{store, DialogueRequest, Generator, ImageRequest};
use crate::config::AppConfig;
use crate::error::{AppError, Result};

const CALL_TIMEOUT: Duration = Duration::from_secs(120);
const IMAGE_SIZE: &str = "1024x1024";
const MAX_ERROR_SNIPPET: usize = 400;

/// OpenAI-compatible chat + image generation over blocking HTTP.
pub struct OpenAiGenerator {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    chat_model: String,
    image_model: String,
    image_dir: PathBuf,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("reelscript/openai")
            .timeout(CALL_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: cfg.openai_api_key.clone(),
            base_url: cfg.openai_base_url.trim_end_matches('/').to_string(),
            chat_model: cfg.chat_model.clone(),
            image_model: cfg.image_model.clone(),
            image_dir: cfg.image_dir.clone(),
        })
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Generation("no API key configured".into()))
    }

    /// POST `body` to `{base_url}/{path}` and return the raw success body.
    fn post(&self, path: &str, body: &serde_json::Value) -> Result<String> {
        let key = self.key()?;
        let resp = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .bearer_auth(key)
            .json(body)
            .send()
            .map_err(|e| AppError::Generation(format!("request failed: {e}")))?;

        let status = resp.status();
        let raw = resp.text().unwrap_or_default();
        if !status.is_success() {
            let msg = extract_error_message(&raw).unwrap_or_else(|| {
                let snippet: String = raw.chars().take(MAX_ERROR_SNIPPET).collect();
                format!("HTTP {}: {snippet}", status.as_u16())
            });
            warn!("{path} failed: {msg}");
            return Err(AppError::Generation(msg));
        }
        Ok(raw)
    }

    fn chat(&self, prompt: String) -> Result<String> {
        let body = json!({
            "model": self.chat_model,
            "messages": [
                {"role": "system", "content": "You are a creative assistant for film fans."},
                {"role": "user", "content": prompt},
            ],
        });
        let raw = self.post("chat/completions", &body)?;
        parse_chat_text(&raw)
    }
}

impl Generator for OpenAiGenerator {
    fn storyline(&self, title: &str) -> Result<String> {
        self.chat(super::storyline_prompt(title))
    }

    fn dialogue(&self, req: &DialogueRequest) -> Result<String> {
        let text = self.chat(super::dialogue_prompt(req))?;
        info!("Dialogue generated for {} ({} chars)", req.title, text.len());
        Ok(text)
    }

    fn image(&self, req: &ImageRequest) -> Result<PathBuf> {
        let body = json!({
            "model": self.image_model,
            "prompt": super::image_prompt(req),
            "n": 1,
            "size": IMAGE_SIZE,
            "response_format": "url",
        });
        let raw = self.post("images/generations", &body)?;
        let url = parse_image_url(&raw)?;
        let path = store::download_and_store(&self.client, &url, &self.image_dir)?;
        info!("Image generated for {}: {}", req.title, path.display());
        Ok(path)
    }
}

fn extract_error_message(raw: &str) -> Option<String> {
    let root: serde_json::Value = serde_json::from_str(raw).ok()?;
    root.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn parse_chat_text(raw: &str) -> Result<String> {
    let resp: ChatResponse = serde_json::from_str(raw)
        .map_err(|e| AppError::Generation(format!("unexpected chat response: {e}")))?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Generation("empty chat response".into()))
}

fn parse_image_url(raw: &str) -> Result<String> {
    let resp: ImageResponse = serde_json::from_str(raw)
        .map_err(|e| AppError::Generation(format!("unexpected image response: {e}")))?;
    resp.data
        .into_iter()
        .find_map(|d| d.url)
        .ok_or_else(|| AppError::Generation("image response carried no URL".into()))
}
