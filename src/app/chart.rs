// src/app/chart.rs
use std::sync::Arc;

use tracing::{debug, info};

use super::{ChartMsg, ChartState, Notice};

impl crate::app::ReelscriptApp {
    /// Load the top-10 list on a worker. A second call while loading is ignored.
    pub fn start_chart_load(&mut self) {
        if self.chart_state == ChartState::Loading {
            return;
        }
        self.chart_state = ChartState::Loading;

        let source = Arc::clone(&self.source);
        let tx = self.chart_tx.clone();
        std::thread::spawn(move || {
            debug!("chart worker started");
            let msg = match source.fetch_top_films() {
                Ok(films) => ChartMsg::Done(films),
                Err(e) => ChartMsg::Error(e),
            };
            let _ = tx.send(msg);
        });
    }

    pub(crate) fn on_chart_done(&mut self, msg: ChartMsg) {
        match msg {
            ChartMsg::Done(films) => {
                info!("Showing {} films", films.len());
                self.films = films;
                self.chart_state = ChartState::Ready;
            }
            ChartMsg::Error(e) => {
                self.films.clear();
                self.chart_state = ChartState::Failed;
                self.notify(Notice::error(format!("Failed to load films: {e}")));
            }
        }
    }

    pub fn chart_state(&self) -> ChartState {
        self.chart_state
    }
}
