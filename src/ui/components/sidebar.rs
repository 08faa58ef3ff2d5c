//! Sidebar component
//!
//! API key entry, model selection and the session reset button.

use crate::session::ChatModel;
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use egui::RichText;

/// Sidebar with the credential field, model radio and reset button
pub struct Sidebar<'a> {
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_sm);

        ui.label(
            RichText::new("OpenAI API Key")
                .size(13.0)
                .color(self.theme.text_secondary),
        );
        ui.add(
            egui::TextEdit::singleline(&mut self.state.api_key)
                .hint_text("Enter Your API Key")
                .password(true)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(self.theme.spacing);
        ui.separator();
        ui.add_space(self.theme.spacing_sm);

        ui.label(
            RichText::new("Chat model")
                .size(13.0)
                .color(self.theme.text_secondary),
        );
        let mut selection = self.state.selected_model;
        for model in ChatModel::ALL {
            ui.radio_value(&mut selection, model, model.id());
        }
        self.state.select_model(selection);

        ui.add_space(self.theme.spacing);
        ui.separator();
        ui.add_space(self.theme.spacing_sm);

        let reset = egui::Button::new(RichText::new("Reset conversation").size(13.0));
        if ui
            .add_enabled(!self.state.is_busy(), reset)
            .on_hover_text("Clear the conversation and start over")
            .clicked()
        {
            self.state.reset_session();
        }
    }
}
