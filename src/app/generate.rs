// src/app/generate.rs
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::{GenerateDone, GenerateOutcome, GenerationInputs, Pending, SelectionContext, Tab};
use crate::ai::{DialogueRequest, Generator, ImageRequest};
use crate::error::{AppError, Result};

const SELECT_FIRST: &str = "Please select a film first.";
const STILL_LOADING: &str = "Film details are still loading.";
const DIALOGUE_FIRST: &str = "Please generate the dialogue first.";
const NOT_NUMBERS: &str = "Character count and max length must be numbers.";
const NOT_POSITIVE: &str = "Character count and max length must be greater than zero.";

impl crate::app::ReelscriptApp {
    pub fn request_dialogue(&mut self) {
        if let Err(e) = self.begin_dialogue() {
            self.notify_error("Error generating dialogue", &e);
        }
    }

    pub fn request_image(&mut self) {
        if let Err(e) = self.begin_image() {
            self.notify_error("Image generation failed", &e);
        }
    }

    fn begin_dialogue(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let sel = self.selection.as_ref().ok_or_else(|| precondition(SELECT_FIRST))?;
        let req = dialogue_request(sel, &self.inputs)?;
        let seq = sel.seq;
        self.spawn_generation(seq, Pending::Dialogue, move |g| {
            GenerateOutcome::Dialogue(g.dialogue(&req))
        });
        Ok(())
    }

    fn begin_image(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let sel = self.selection.as_ref().ok_or_else(|| precondition(SELECT_FIRST))?;
        let req = image_request(sel, &self.dialogue, &self.inputs)?;
        let seq = sel.seq;
        self.spawn_generation(seq, Pending::Image, move |g| {
            GenerateOutcome::Image(g.image(&req))
        });
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.pending {
            Some(p) => Err(precondition(format!("Still busy: {}", p.label()))),
            None => Ok(()),
        }
    }

    fn spawn_generation<F>(&mut self, seq: u64, kind: Pending, job: F)
    where
        F: FnOnce(&dyn Generator) -> GenerateOutcome + Send + 'static,
    {
        self.pending = Some(kind);
        let generator = Arc::clone(&self.generator);
        let tx = self.generate_tx.clone();
        std::thread::spawn(move || {
            debug!("generation worker started: {kind:?}");
            let outcome = job(generator.as_ref());
            let _ = tx.send(GenerateDone { seq, outcome });
        });
    }

    pub(crate) fn on_generate_done(&mut self, done: GenerateDone) {
        self.pending = None;

        let current = self.selection.as_ref().map(|s| s.seq);
        if current != Some(done.seq) {
            self.stale_completions += 1;
            debug!("dropping generation result for old selection (seq {})", done.seq);
            return;
        }

        match done.outcome {
            GenerateOutcome::Dialogue(Ok(text)) => {
                self.dialogue = text;
                self.active_tab = Tab::Dialogue;
            }
            GenerateOutcome::Dialogue(Err(e)) => {
                self.notify_error("Error generating dialogue", &e);
            }
            GenerateOutcome::Image(Ok(path)) => self.on_image_ready(path),
            GenerateOutcome::Image(Err(e)) => {
                self.notify_error("Image generation failed", &e);
            }
        }
    }

    fn on_image_ready(&mut self, path: PathBuf) {
        if !path.is_file() {
            self.notify(super::Notice::error(format!(
                "Generated image not found: {}",
                path.display()
            )));
            return;
        }
        info!("Previewing {}", path.display());
        self.image_path = Some(path);
        self.preview = None;
        self.preview_error = None;
        self.active_tab = Tab::Image;
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn image_path(&self) -> Option<&std::path::Path> {
        self.image_path.as_deref()
    }
}

fn precondition(msg: impl Into<String>) -> AppError {
    AppError::MissingPrecondition(msg.into())
}

fn loaded(sel: &SelectionContext) -> Result<&crate::imdb::FilmDetail> {
    sel.detail().ok_or_else(|| match sel.state {
        super::DetailState::Loading => precondition(STILL_LOADING),
        _ => precondition(SELECT_FIRST),
    })
}

fn parse_positive(raw: &str) -> Result<u32> {
    let n: u32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(NOT_NUMBERS.into()))?;
    if n == 0 {
        return Err(AppError::Validation(NOT_POSITIVE.into()));
    }
    Ok(n)
}

/// Build the dialogue call for the loaded selection, validating the numeric inputs.
pub fn dialogue_request(sel: &SelectionContext, inputs: &GenerationInputs) -> Result<DialogueRequest> {
    let detail = loaded(sel)?;
    let character_count = parse_positive(&inputs.character_count)?;
    let max_words = parse_positive(&inputs.max_words)?;
    Ok(DialogueRequest {
        title: detail.title.clone(),
        description: detail.description.clone(),
        storyline: detail.storyline.clone(),
        character_count,
        max_words,
    })
}

/// Build the image call; needs a loaded selection and some dialogue text.
pub fn image_request(
    sel: &SelectionContext,
    dialogue: &str,
    inputs: &GenerationInputs,
) -> Result<ImageRequest> {
    let detail = loaded(sel)?;
    let dialogue = dialogue.trim();
    if dialogue.is_empty() {
        return Err(precondition(DIALOGUE_FIRST));
    }
    Ok(ImageRequest {
        title: detail.title.clone(),
        description: detail.description.clone(),
        storyline: detail.storyline.clone(),
        dialogue: dialogue.to_string(),
        location: inputs.location.trim().to_string(),
        style: inputs.style,
    })
}
