// src/app/ui/controls.rs
use eframe::egui as eg;

use crate::ai::ImageStyle;

impl crate::app::ReelscriptApp {
    // ---------- INPUTS + ACTION BUTTONS ----------
    pub(crate) fn ui_render_controls(&mut self, ui: &mut eg::Ui) {
        ui.add_space(4.0);
        eg::Grid::new("generation_inputs")
            .num_columns(6)
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                ui.label("Char Count:");
                ui.add(
                    eg::TextEdit::singleline(&mut self.inputs.character_count)
                        .hint_text("2")
                        .desired_width(60.0),
                );
                ui.label("Location:");
                ui.add(
                    eg::TextEdit::singleline(&mut self.inputs.location)
                        .hint_text("optional")
                        .desired_width(120.0),
                );
                ui.label("Max Length (words):");
                ui.add(
                    eg::TextEdit::singleline(&mut self.inputs.max_words)
                        .hint_text("150")
                        .desired_width(60.0),
                );
                ui.end_row();

                ui.label("Style:");
                eg::ComboBox::from_id_source("image_style_combo")
                    .selected_text(self.inputs.style.as_str())
                    .show_ui(ui, |ui| {
                        for style in ImageStyle::ALL {
                            ui.selectable_value(&mut self.inputs.style, style, style.as_str());
                        }
                    });
                ui.end_row();
            });

        ui.add_space(6.0);

        let idle = self.pending.is_none();
        let mut dialogue = false;
        let mut image = false;
        let mut export = false;
        ui.horizontal(|ui| {
            ui.add_enabled_ui(idle, |ui| {
                dialogue = ui.button("Generate Dialogue").clicked();
                image = ui.button("Generate Image").clicked();
                export = ui.button("Export Dialogue").clicked();
            });
            if let Some(p) = self.pending {
                ui.add_space(8.0);
                ui.add(eg::Spinner::new().size(14.0));
                ui.label(eg::RichText::new(p.label()).italics().weak());
            }
        });

        if dialogue {
            self.request_dialogue();
        }
        if image {
            self.request_image();
        }
        if export {
            self.request_export();
        }
    }
}
