use eframe::egui;

use crate::{
    core::Credentials,
    gui::theme::Theme,
};

pub enum SetupAction {
    Submit { key: String, database_id: String },
    UseDemo,
}

#[derive(Default)]
pub struct SetupForm {
    key: String,
    database_id: String,
}

impl SetupForm {
    pub fn fill(&mut self, credentials: &Credentials) {
        self.key = credentials.key.clone();
        self.database_id = credentials.database_id.clone();
    }

    pub fn clear(&mut self) {
        self.key.clear();
        self.database_id.clear();
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        notice: Option<&str>,
    ) -> Option<SetupAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(theme.heading(ui.ctx(), "Connect Notion"));
            ui.label("Enter your integration details to start studying.");
            ui.add_space(16.0);

            if let Some(notice) = notice {
                ui.colored_label(theme.red(ui.ctx()), notice);
                ui.add_space(8.0);
            }

            ui.add_sized(
                [320.0, 28.0],
                egui::TextEdit::singleline(&mut self.key)
                    .password(true)
                    .hint_text("Internal Integration Secret"),
            );
            ui.add_space(6.0);
            let db_response = ui.add_sized(
                [320.0, 28.0],
                egui::TextEdit::singleline(&mut self.database_id).hint_text("Database ID"),
            );
            ui.add_space(12.0);

            let submitted = db_response.lost_focus()
                && ui.input(|input| input.key_pressed(egui::Key::Enter));

            if ui.button("Connect & Fetch").clicked() || submitted {
                action = Some(SetupAction::Submit {
                    key: self.key.clone(),
                    database_id: self.database_id.clone(),
                });
            }

            if ui.button("Use demo credentials").clicked() {
                action = Some(SetupAction::UseDemo);
            }

            ui.add_space(12.0);
            ui.label(theme.hint(ui.ctx(), "Keys are stored locally on this computer."));
        });

        action
    }
}
