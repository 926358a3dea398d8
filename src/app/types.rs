// src/app/types.rs
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ai::ImageStyle;
use crate::error::AppError;
use crate::imdb::{FilmDetail, FilmSummary};

// ---- cross-thread messages ----
pub enum ChartMsg {
    Done(Vec<FilmSummary>),
    Error(AppError),
}

pub struct DetailDone {
    pub seq: u64,
    pub outcome: DetailOutcome,
}

pub enum DetailOutcome {
    Loaded(FilmDetail),
    Failed(AppError),
    Cancelled,
}

pub struct GenerateDone {
    pub seq: u64,
    pub outcome: GenerateOutcome,
}

pub enum GenerateOutcome {
    Dialogue(Result<String, AppError>),
    Image(Result<PathBuf, AppError>),
}

// ---- states ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartState {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded(FilmDetail),
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pending {
    Dialogue,
    Image,
}

impl Pending {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dialogue => "Generating dialogue…",
            Self::Image => "Generating image…",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Details,
    Dialogue,
    Image,
}

/// Shared flag a worker checks between steps.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The one film the user is working with. Replaced wholesale on every selection;
/// `seq` tells worker completions for this selection apart from stale ones.
#[derive(Clone, Debug)]
pub struct SelectionContext {
    pub seq: u64,
    pub index: usize,
    pub film: FilmSummary,
    pub state: DetailState,
    pub(crate) cancel: CancelToken,
}

impl SelectionContext {
    pub fn new(seq: u64, index: usize, film: FilmSummary) -> Self {
        Self {
            seq,
            index,
            film,
            state: DetailState::Loading,
            cancel: CancelToken::default(),
        }
    }

    pub fn detail(&self) -> Option<&FilmDetail> {
        match &self.state {
            DetailState::Loaded(d) => Some(d),
            _ => None,
        }
    }

    /// Text for the "Film Details" tab.
    pub fn detail_text(&self) -> String {
        match &self.state {
            DetailState::Loading => "Loading details...\n".to_string(),
            DetailState::Loaded(d) => format!(
                "{}. {}\n{}\n\nDescription: {}\n\nStoryline: {}\n",
                self.film.rank, d.title, d.detail_url, d.description, d.storyline
            ),
            DetailState::Failed(e) => format!("Failed to load details: {e}\n"),
        }
    }
}

// ---- UI inputs ----

/// Raw text of the generation controls; parsed when a button is pressed.
#[derive(Clone, Debug, Default)]
pub struct GenerationInputs {
    pub character_count: String,
    pub max_words: String,
    pub location: String,
    pub style: ImageStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: "Success".into(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: "Warning".into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".into(),
            message: message.into(),
        }
    }

    /// Warnings carry the bare message; errors are prefixed with what failed.
    pub fn from_error(context: &str, err: &AppError) -> Self {
        if err.is_warning() {
            Self::warning(err.to_string())
        } else {
            Self::error(format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film() -> FilmSummary {
        FilmSummary {
            rank: 2,
            title: "The Godfather".into(),
            detail_url: "https://www.imdb.com/title/tt0068646/".into(),
        }
    }

    #[test]
    fn detail_text_follows_state() {
        let mut sel = SelectionContext::new(1, 1, film());
        assert_eq!(sel.detail_text(), "Loading details...\n");

        sel.state = DetailState::Loaded(FilmDetail {
            title: "The Godfather".into(),
            detail_url: "https://www.imdb.com/title/tt0068646/".into(),
            description: "N/A".into(),
            storyline: "A family saga.".into(),
        });
        assert_eq!(
            sel.detail_text(),
            "2. The Godfather\nhttps://www.imdb.com/title/tt0068646/\n\n\
             Description: N/A\n\nStoryline: A family saga.\n"
        );
        assert!(sel.detail().is_some());

        sel.state = DetailState::Failed("network error: timeout".into());
        assert!(sel.detail_text().starts_with("Failed to load details"));
        assert!(sel.detail().is_none());
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::default();
        let worker_copy = token.clone();
        assert!(!worker_copy.is_cancelled());
        token.cancel();
        assert!(worker_copy.is_cancelled());
    }

    #[test]
    fn notices_from_errors() {
        let warn = Notice::from_error("ignored", &AppError::Validation("bad input".into()));
        assert_eq!(warn, Notice::warning("bad input"));

        let err = Notice::from_error("Image generation failed", &AppError::Generation("quota".into()));
        assert_eq!(err.level, NoticeLevel::Error);
        assert_eq!(err.message, "Image generation failed: generation failed: quota");
    }
}
