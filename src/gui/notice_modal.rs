use eframe::egui;

/// Blocking notice with a single OK button, used for the end of a deck.
pub struct NoticeModal {
    open: bool,
    title: String,
    message: String,
}

impl NoticeModal {
    pub fn new() -> Self {
        Self { open: false, title: String::new(), message: String::new() }
    }

    pub fn show_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = message.into();
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("notice_modal")).show(ctx, |ui| {
            ui.set_width(360.0);

            ui.label(egui::RichText::new(&self.title).size(18.0).strong());
            ui.add_space(10.0);
            ui.label(egui::RichText::new(&self.message).size(14.0));
            ui.add_space(15.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    ui.close();
                }
            });
        });

        if modal.should_close() {
            self.open = false;
        }
    }
}

impl Default for NoticeModal {
    fn default() -> Self {
        Self::new()
    }
}
