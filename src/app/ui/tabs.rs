// src/app/ui/tabs.rs
use eframe::egui as eg;
use tracing::warn;

use crate::app::{gfx, DetailState, Tab};

impl crate::app::ReelscriptApp {
    pub(crate) fn ui_render_tabs(&mut self, ctx: &eg::Context, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.active_tab, Tab::Details, "Film Details");
            ui.selectable_value(&mut self.active_tab, Tab::Dialogue, "Generated Dialogue");
            ui.selectable_value(&mut self.active_tab, Tab::Image, "Generated Image");
        });
        ui.separator();

        match self.active_tab {
            Tab::Details => self.ui_render_details_tab(ui),
            Tab::Dialogue => self.ui_render_dialogue_tab(ui),
            Tab::Image => self.ui_render_image_tab(ctx, ui),
        }
    }

    fn ui_render_details_tab(&mut self, ui: &mut eg::Ui) {
        let Some(sel) = &self.selection else {
            ui.label("Select a film from the list to see details.");
            return;
        };

        if matches!(sel.state, DetailState::Loading) {
            ui.horizontal(|ui| {
                ui.add(eg::Spinner::new().size(14.0));
                ui.label(format!("{}. {}", sel.film.rank, sel.film.title));
            });
        } else {
            ui.hyperlink_to("Open on IMDb", &sel.film.detail_url);
        }
        ui.add_space(4.0);

        let mut text = sel.detail_text();
        eg::ScrollArea::vertical()
            .id_source("details_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add(
                    eg::TextEdit::multiline(&mut text)
                        .interactive(false)
                        .desired_width(f32::INFINITY)
                        .font(eg::TextStyle::Body),
                );
            });
    }

    fn ui_render_dialogue_tab(&mut self, ui: &mut eg::Ui) {
        eg::ScrollArea::vertical()
            .id_source("dialogue_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_sized(
                    ui.available_size(),
                    eg::TextEdit::multiline(&mut self.dialogue)
                        .hint_text("Generated dialogue appears here.")
                        .font(eg::TextStyle::Body),
                );
            });
    }

    fn ui_render_image_tab(&mut self, ctx: &eg::Context, ui: &mut eg::Ui) {
        let Some(path) = self.image_path.clone() else {
            ui.label("No image generated yet.");
            return;
        };

        // Lazy upload on first paint after a new image arrives
        if self.preview.is_none() && self.preview_error.is_none() {
            match gfx::load_preview(ctx, &path) {
                Ok(tex) => self.preview = Some(tex),
                Err(e) => {
                    warn!("preview failed: {e}");
                    self.preview_error = Some(e);
                }
            }
        }

        if let Some(err) = &self.preview_error {
            ui.label(eg::RichText::new(format!("Could not display image: {err}")).weak());
            return;
        }
        if let Some(tex) = &self.preview {
            let size = gfx::fit_size(tex.size_vec2(), ui.available_size());
            ui.vertical_centered(|ui| {
                ui.image((tex.id(), size));
            });
            ui.label(eg::RichText::new(path.display().to_string()).weak().small());
        }
    }
}
