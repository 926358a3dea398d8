// src/app/ui/list.rs
use eframe::egui as eg;

use crate::app::ChartState;

impl crate::app::ReelscriptApp {
    // ---------- LEFT PANEL: top-10 list ----------
    pub(crate) fn ui_render_film_list(&mut self, ctx: &eg::Context, enabled: bool) {
        let mut clicked: Option<usize> = None;
        let mut reload = false;

        eg::SidePanel::left("film_list_panel")
            .resizable(true)
            .default_width(320.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    ui.add_space(6.0);
                    ui.heading("Top 10 IMDb Movies");
                    ui.separator();

                    match self.chart_state {
                        ChartState::Idle | ChartState::Loading => {
                            ui.horizontal(|ui| {
                                ui.add(eg::Spinner::new().size(14.0));
                                ui.label("Loading chart…");
                            });
                        }
                        ChartState::Failed => {
                            ui.label(eg::RichText::new("Could not load the chart.").weak());
                            if ui.button("Reload").clicked() {
                                reload = true;
                            }
                        }
                        ChartState::Ready => {
                            let current = self.selection.as_ref().map(|s| s.index);
                            eg::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                                for (i, film) in self.films.iter().enumerate() {
                                    let label = eg::RichText::new(format!("{}. {}", film.rank, film.title))
                                        .size(15.0);
                                    if ui.selectable_label(current == Some(i), label).clicked() {
                                        clicked = Some(i);
                                    }
                                }
                            });
                        }
                    }
                });
            });

        if reload {
            self.start_chart_load();
        }
        if let Some(i) = clicked {
            self.select(i);
        }
    }
}
