// src/app/detail.rs
use std::sync::Arc;

use tracing::debug;

use super::{CancelToken, DetailDone, DetailOutcome, DetailState, SelectionContext};
use crate::ai::Generator;
use crate::imdb::{self, FilmDetail, FilmSource, FilmSummary};

impl crate::app::ReelscriptApp {
    /// Make film `index` the current selection and fetch its details in the
    /// background. Any earlier fetch is cancelled and its result will be dropped.
    pub fn select(&mut self, index: usize) {
        let Some(film) = self.films.get(index).cloned() else {
            return;
        };

        if let Some(prev) = self.selection.take() {
            prev.cancel.cancel();
        }

        self.next_seq += 1;
        let sel = SelectionContext::new(self.next_seq, index, film);
        self.dialogue.clear();
        self.active_tab = super::Tab::Details;
        debug!("select #{} {} (seq {})", sel.film.rank, sel.film.title, sel.seq);

        self.spawn_detail_fetch(&sel);
        self.selection = Some(sel);
    }

    fn spawn_detail_fetch(&self, sel: &SelectionContext) {
        let source = Arc::clone(&self.source);
        let generator = Arc::clone(&self.generator);
        let tx = self.detail_tx.clone();
        let seq = sel.seq;
        let film = sel.film.clone();
        let cancel = sel.cancel.clone();

        std::thread::spawn(move || {
            let outcome = fetch_detail(source.as_ref(), generator.as_ref(), &film, &cancel);
            let _ = tx.send(DetailDone { seq, outcome });
        });
    }

    pub(crate) fn on_detail_done(&mut self, done: DetailDone) {
        let Some(sel) = self.selection.as_mut().filter(|s| s.seq == done.seq) else {
            self.stale_completions += 1;
            debug!("dropping stale detail completion (seq {})", done.seq);
            return;
        };

        match done.outcome {
            DetailOutcome::Loaded(detail) => sel.state = DetailState::Loaded(detail),
            DetailOutcome::Failed(e) => {
                sel.state = DetailState::Failed(e.to_string());
                let title = sel.film.title.clone();
                self.notify_error(&format!("Failed to load details for {title}"), &e);
            }
            // The selection never leaves Loading without an outcome.
            DetailOutcome::Cancelled => {
                debug!("detail fetch for seq {} was cancelled", done.seq);
                sel.state = DetailState::Failed("cancelled".to_string());
            }
        }
    }

    pub fn stale_completions(&self) -> usize {
        self.stale_completions
    }
}

/// Description from the title page, then the storyline lookup.
fn fetch_detail(
    source: &dyn FilmSource,
    generator: &dyn Generator,
    film: &FilmSummary,
    cancel: &CancelToken,
) -> DetailOutcome {
    let description = match source.fetch_film_description(&film.detail_url) {
        Ok(d) => d,
        Err(e) => return DetailOutcome::Failed(e),
    };
    if cancel.is_cancelled() {
        return DetailOutcome::Cancelled;
    }

    let storyline = match imdb::fetch_storyline(generator, &film.title) {
        Ok(s) => s,
        Err(e) => return DetailOutcome::Failed(e),
    };
    if cancel.is_cancelled() {
        return DetailOutcome::Cancelled;
    }

    DetailOutcome::Loaded(FilmDetail {
        title: film.title.clone(),
        detail_url: film.detail_url.clone(),
        description,
        storyline,
    })
}
