// src/app/mod.rs — chart list, background detail fetch, background generation

// ---- Standard lib imports ----
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

// ---- Crates ----
use eframe::egui::{self as eg, TextureHandle};
use tracing::{debug, error, warn};

// ---- Local modules ----
pub mod chart;
pub mod detail;
pub mod export;
pub mod generate;
pub mod gfx;
pub mod types;
pub mod ui;


pub use types::*;

use crate::ai::Generator;
use crate::error::AppError;
use crate::imdb::{FilmSource, FilmSummary};

// ---- Tunables ----
const MAX_MSGS_PER_FRAME: usize = 16;
const BUSY_REPAINT_MS: u64 = 100;

pub struct ReelscriptApp {
    // collaborators
    source: Arc<dyn FilmSource>,
    generator: Arc<dyn Generator>,
    export_dir: PathBuf,

    // chart
    films: Vec<FilmSummary>,
    chart_state: ChartState,
    chart_tx: Sender<ChartMsg>,
    chart_rx: Receiver<ChartMsg>,

    // selection
    selection: Option<SelectionContext>,
    next_seq: u64,
    detail_tx: Sender<DetailDone>,
    detail_rx: Receiver<DetailDone>,
    stale_completions: usize,

    // generation
    inputs: GenerationInputs,
    dialogue: String,
    pending: Option<Pending>,
    generate_tx: Sender<GenerateDone>,
    generate_rx: Receiver<GenerateDone>,

    // image preview (texture uploaded lazily during paint)
    image_path: Option<PathBuf>,
    preview: Option<TextureHandle>,
    preview_error: Option<String>,

    // ui
    notices: VecDeque<Notice>,
    active_tab: Tab,
    show_export_popup: bool,
    export_tag: String,

    // one-time init guard
    did_init: bool,
}

impl ReelscriptApp {
    pub fn new(
        source: Arc<dyn FilmSource>,
        generator: Arc<dyn Generator>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        let (chart_tx, chart_rx) = mpsc::channel();
        let (detail_tx, detail_rx) = mpsc::channel();
        let (generate_tx, generate_rx) = mpsc::channel();
        Self {
            source,
            generator,
            export_dir: export_dir.into(),

            films: Vec::new(),
            chart_state: ChartState::Idle,
            chart_tx,
            chart_rx,

            selection: None,
            next_seq: 0,
            detail_tx,
            detail_rx,
            stale_completions: 0,

            inputs: GenerationInputs::default(),
            dialogue: String::new(),
            pending: None,
            generate_tx,
            generate_rx,

            image_path: None,
            preview: None,
            preview_error: None,

            notices: VecDeque::new(),
            active_tab: Tab::Details,
            show_export_popup: false,
            export_tag: String::new(),

            did_init: false,
        }
    }

    pub fn films(&self) -> &[FilmSummary] {
        &self.films
    }

    pub fn selection(&self) -> Option<&SelectionContext> {
        self.selection.as_ref()
    }

    pub fn dialogue(&self) -> &str {
        &self.dialogue
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
            || self.chart_state == ChartState::Loading
            || matches!(
                self.selection.as_ref().map(|s| &s.state),
                Some(DetailState::Loading)
            )
    }

    // ---- notices ----

    pub(crate) fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => debug!("notice: {}", notice.message),
            NoticeLevel::Warning => warn!("{}", notice.message),
            NoticeLevel::Error => error!("{}", notice.message),
        }
        self.notices.push_back(notice);
    }

    pub(crate) fn notify_error(&mut self, context: &str, err: &AppError) {
        self.notify(Notice::from_error(context, err));
    }

    pub(crate) fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    /// Drain worker completions. Returns true when anything changed.
    pub fn poll_workers(&mut self) -> bool {
        let mut changed = false;

        while let Ok(msg) = self.chart_rx.try_recv() {
            self.on_chart_done(msg);
            changed = true;
        }

        for _ in 0..MAX_MSGS_PER_FRAME {
            match self.detail_rx.try_recv() {
                Ok(done) => {
                    self.on_detail_done(done);
                    changed = true;
                }
                Err(_) => break,
            }
        }

        while let Ok(done) = self.generate_rx.try_recv() {
            self.on_generate_done(done);
            changed = true;
        }

        changed
    }
}

// ========== App impl ==========
impl eframe::App for ReelscriptApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        // First frame
        if !self.did_init {
            self.did_init = true;
            self.start_chart_load();
        }

        if self.poll_workers() {
            ctx.request_repaint();
        }
        // Workers don't hold the context; keep polling while something is in flight.
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(BUSY_REPAINT_MS));
        }

        let modal_open = !self.notices.is_empty();

        self.ui_render_film_list(ctx, !modal_open);

        eg::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                self.ui_render_controls(ui);
                ui.separator();
                self.ui_render_tabs(ctx, ui);
            });
        });

        self.ui_render_export_popup(ctx);
        self.ui_render_notice(ctx);
    }
}
