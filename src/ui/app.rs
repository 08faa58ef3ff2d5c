//! Main application struct and eframe integration

use crate::pipeline::PipelineHandle;
use crate::session::{ChatModel, SharedSession};
use crate::ui::components::{RecordBar, Sidebar, Transcript};
use crate::ui::state::{RecordPhase, UiState};
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText, SidePanel, TopBottomPanel};

/// The assistant window
pub struct ParleyApp {
    state: UiState,
    theme: Theme,
}

impl ParleyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        handle: PipelineHandle,
        session: SharedSession,
        default_model: ChatModel,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state: UiState::new(handle, session, default_model),
            theme,
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Parley")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Voice assistant")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_sidebar(&mut self, ctx: &egui::Context) {
        SidePanel::left("sidebar")
            .resizable(false)
            .default_width(220.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                Sidebar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_record_bar(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("record_bar")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                RecordBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_transcript(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                Transcript::new(&self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for ParleyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_events();

        self.show_header(ctx);
        self.show_sidebar(ctx);
        self.show_record_bar(ctx);
        self.show_transcript(ctx);

        // Keep polling while a recording or turn is in flight.
        if self.state.phase != RecordPhase::Idle {
            ctx.request_repaint();
        }
    }
}
