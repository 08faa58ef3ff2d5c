//! Record bar component
//!
//! The microphone button plus a status line for the current phase and
//! the last error, if any.

use crate::ui::state::{RecordPhase, UiState};
use crate::ui::theme::Theme;
use egui::{Key, RichText, Sense, Vec2};

pub struct RecordBar<'a> {
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> RecordBar<'a> {
    pub fn new(state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            self.show_button(ui);
            ui.add_space(self.theme.spacing);
            self.show_status(ui);
        });

        // Space toggles recording, Escape cancels it.
        if ui.input(|i| i.key_pressed(Key::Space)) && !ui.memory(|m| m.focused().is_some()) {
            self.state.toggle_recording();
        }
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            self.state.cancel_recording();
        }
    }

    fn show_button(&mut self, ui: &mut egui::Ui) {
        let size = Vec2::splat(56.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let fill = match self.state.phase {
                RecordPhase::Recording => self.theme.recording,
                RecordPhase::Processing => self.theme.bg_tertiary,
                RecordPhase::Idle if response.hovered() => self.theme.primary.gamma_multiply(1.2),
                RecordPhase::Idle => self.theme.primary,
            };
            painter.circle_filled(rect.center(), 26.0, fill);

            let glyph = match self.state.phase {
                RecordPhase::Recording => "⏹",
                RecordPhase::Processing => "…",
                RecordPhase::Idle => "🎙",
            };
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                glyph,
                egui::FontId::proportional(22.0),
                self.theme.text_primary,
            );
        }

        let hover = match self.state.phase {
            RecordPhase::Recording => "Stop recording",
            RecordPhase::Processing => "Processing...",
            RecordPhase::Idle => "Record a question",
        };
        if response.on_hover_text(hover).clicked() {
            self.state.toggle_recording();
        }
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            let phase_text = match self.state.phase {
                RecordPhase::Idle => "Ready",
                RecordPhase::Recording => "Recording...",
                RecordPhase::Processing => "Thinking...",
            };
            ui.label(
                RichText::new(phase_text)
                    .size(13.0)
                    .color(self.theme.text_secondary),
            );

            if let Some(error) = &self.state.last_error {
                ui.label(RichText::new(error).size(12.0).color(self.theme.error));
            } else if let Some(heard) = &self.state.last_heard {
                ui.label(
                    RichText::new(format!("Heard: {}", heard))
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
            }
        });
    }
}
