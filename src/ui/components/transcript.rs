//! Conversation transcript component
//!
//! Renders the chat log as timestamped bubbles, user on the left,
//! assistant on the right.

use crate::session::{ChatEntry, Speaker};
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use egui::{Align, Color32, Layout, RichText};

pub struct Transcript<'a> {
    state: &'a UiState,
    theme: &'a Theme,
}

impl<'a> Transcript<'a> {
    pub fn new(state: &'a UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let entries = self.state.chat_log();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                if entries.is_empty() {
                    self.show_empty_state(ui);
                } else {
                    for entry in &entries {
                        self.show_entry(ui, entry);
                        ui.add_space(self.theme.spacing_sm);
                    }
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.label(
                RichText::new("Voice assistant")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing);
            ui.label(
                RichText::new("Press the microphone, ask a question, and the reply is spoken back.")
                    .size(14.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_entry(&self, ui: &mut egui::Ui, entry: &ChatEntry) {
        let is_user = entry.speaker == Speaker::User;
        let (layout, fill, text_color) = if is_user {
            (
                Layout::left_to_right(Align::TOP),
                self.theme.bubble_user,
                Color32::WHITE,
            )
        } else {
            (
                Layout::right_to_left(Align::TOP),
                self.theme.bubble_bot,
                self.theme.text_primary,
            )
        };

        ui.with_layout(layout, |ui| {
            let max_width = ui.available_width() * 0.7;

            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(&entry.text).size(14.0).color(text_color));
                });

            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new(&entry.timestamp)
                    .size(11.0)
                    .color(self.theme.text_muted),
            );
        });
    }
}
