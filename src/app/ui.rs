// src/app/ui.rs
pub mod controls;
pub mod list;
pub mod tabs;

use eframe::egui as eg;

use super::NoticeLevel;

impl crate::app::ReelscriptApp {
    /// Front notice as a modal window; the rest of the UI is disabled meanwhile.
    pub(crate) fn ui_render_notice(&mut self, ctx: &eg::Context) {
        let Some(notice) = self.notices.front().cloned() else {
            return;
        };

        let color = match notice.level {
            NoticeLevel::Info => eg::Color32::from_rgb(130, 200, 130),
            NoticeLevel::Warning => eg::Color32::from_rgb(230, 190, 90),
            NoticeLevel::Error => eg::Color32::from_rgb(230, 110, 110),
        };

        let mut dismissed = false;
        eg::Window::new(notice.title.as_str())
            .id(eg::Id::new("notice_modal"))
            .collapsible(false)
            .resizable(false)
            .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(420.0);
                ui.label(eg::RichText::new(&notice.message).color(color));
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.dismiss_notice();
        }
    }

    // ---------- EXPORT POPUP ----------
    pub(crate) fn ui_render_export_popup(&mut self, ctx: &eg::Context) {
        if !self.show_export_popup || !self.notices.is_empty() {
            return;
        }

        let mut open = self.show_export_popup;
        let mut save = false;
        let mut cancel = false;
        eg::Window::new("Export Dialogue")
            .collapsible(false)
            .resizable(false)
            .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Enter a name for the dialogue file:");
                let resp = ui.add(
                    eg::TextEdit::singleline(&mut self.export_tag)
                        .hint_text("scene1")
                        .desired_width(220.0),
                );
                resp.request_focus();
                if resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter)) {
                    save = true;
                }
                ui.label(
                    eg::RichText::new(format!(
                        "Saved as <name>.{} in {}",
                        super::export::EXPORT_EXT,
                        self.export_dir.display()
                    ))
                    .weak(),
                );
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        // Apply after .show so the window closure's borrow has ended
        if save {
            let tag = std::mem::take(&mut self.export_tag);
            self.export_dialogue(&tag);
            open = false;
        }
        if cancel {
            self.export_tag.clear();
            open = false;
        }
        self.show_export_popup = open;
    }
}
