// src/ai/mod.rs
pub mod openai;
pub mod store;

use std::path::PathBuf;

use crate::error::Result;

pub use openai::OpenAiGenerator;

/// Art direction offered for generated images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageStyle {
    #[default]
    Marvel,
    Futuristic,
    Cartoon,
    Realistic,
}

impl ImageStyle {
    pub const ALL: [Self; 4] = [Self::Marvel, Self::Futuristic, Self::Cartoon, Self::Realistic];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marvel => "marvel",
            Self::Futuristic => "futuristic",
            Self::Cartoon => "cartoon",
            Self::Realistic => "realistic",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueRequest {
    pub title: String,
    pub description: String,
    pub storyline: String,
    pub character_count: u32,
    pub max_words: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub title: String,
    pub description: String,
    pub storyline: String,
    pub dialogue: String,
    /// Free text; empty means "anywhere".
    pub location: String,
    pub style: ImageStyle,
}

/// Text and image generation. Calls block; the app runs them on worker threads.
pub trait Generator: Send + Sync {
    fn storyline(&self, title: &str) -> Result<String>;
    fn dialogue(&self, req: &DialogueRequest) -> Result<String>;
    /// Returns the path of an image file the caller may read but does not own.
    fn image(&self, req: &ImageRequest) -> Result<PathBuf>;
}

// Image prompts carry only the start of the script.
const DIALOGUE_EXCERPT_CHARS: usize = 600;

pub fn storyline_prompt(title: &str) -> String {
    format!(
        "Describe the storyline of the film \"{title}\" in one or two paragraphs. \
         Cover the setup, the main characters and the central conflict without \
         revealing the ending."
    )
}

pub fn dialogue_prompt(req: &DialogueRequest) -> String {
    format!(
        "Write a short dialogue script set in the world of the film \"{title}\".\n\n\
         Description: {description}\n\n\
         Storyline: {storyline}\n\n\
         Use exactly {count} speaking characters. Keep the whole dialogue under \
         {max_words} words. Format each line as `NAME: line`.",
        title = req.title,
        description = req.description,
        storyline = req.storyline,
        count = req.character_count,
        max_words = req.max_words,
    )
}

pub fn image_prompt(req: &ImageRequest) -> String {
    let excerpt: String = req.dialogue.chars().take(DIALOGUE_EXCERPT_CHARS).collect();
    let mut prompt = format!(
        "An illustration in a {style} style of a scene from the film \"{title}\". \
         Description: {description} Storyline: {storyline} \
         The scene shows the characters in this dialogue: {excerpt}",
        style = req.style.as_str(),
        title = req.title,
        description = req.description,
        storyline = req.storyline,
    );
    let location = req.location.trim();
    if !location.is_empty() {
        prompt.push_str(&format!(" The scene takes place in {location}."));
    }
    prompt.push_str(" No text or captions in the image.");
    prompt
}
