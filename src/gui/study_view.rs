use eframe::egui;

use crate::{
    client::Deck,
    core::Level,
    gui::theme::Theme,
};

pub enum StudyAction {
    Flip,
    Rate(Level),
    Logout,
    Refresh,
    BackToSetup,
}

const CARD_SIZE: egui::Vec2 = egui::Vec2::new(420.0, 240.0);

fn nav_bar(ui: &mut egui::Ui, action: &mut Option<StudyAction>) {
    ui.horizontal(|ui| {
        if ui.link("← Change Database").clicked() {
            *action = Some(StudyAction::Logout);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⟳ Refresh").clicked() {
                *action = Some(StudyAction::Refresh);
            }
        });
    });
}

pub fn study_view(ui: &mut egui::Ui, deck: &Deck, theme: &Theme) -> Option<StudyAction> {
    let mut action = None;
    let ctx = ui.ctx().clone();

    nav_bar(ui, &mut action);

    ui.vertical_centered(|ui| {
        ui.label(theme.heading(&ctx, "Flashcards"));
        ui.label(theme.hint(&ctx, &format!("{} / {}", deck.current_index() + 1, deck.len())));
        ui.add_space(12.0);

        let card = deck.current_card();
        let (text, fill) = if deck.is_flipped() {
            (&card.answer, theme.card_back(&ctx))
        } else {
            (&card.question, theme.card_front(&ctx))
        };

        let frame = egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(12))
            .inner_margin(egui::Margin::same(24))
            .show(ui, |ui| {
                ui.set_min_size(CARD_SIZE);
                ui.set_max_width(CARD_SIZE.x);
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new(text).size(22.0));
                });
            });

        let card_response =
            ui.interact(frame.response.rect, ui.id().with("card"), egui::Sense::click());
        if card_response.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if card_response.clicked() {
            action = Some(StudyAction::Flip);
        }

        ui.add_space(16.0);

        if deck.is_flipped() {
            ui.horizontal(|ui| {
                // four buttons of 90px plus spacing, centered
                let width = 4.0 * 90.0 + 3.0 * ui.spacing().item_spacing.x;
                ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));

                for level in Level::ALL {
                    let button = egui::Button::new(
                        egui::RichText::new(level.as_str()).color(egui::Color32::BLACK).strong(),
                    )
                    .fill(theme.level_color(&ctx, level))
                    .min_size(egui::vec2(90.0, 32.0));

                    if ui.add(button).clicked() {
                        action = Some(StudyAction::Rate(level));
                    }
                }
            });
        } else if !deck.is_advancing() {
            ui.label(theme.hint(&ctx, "Click the card to see the answer"));
        }
    });

    action
}

pub fn empty_view(ui: &mut egui::Ui, theme: &Theme) -> Option<StudyAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(theme.hint(ui.ctx(), "No cards found or database empty."));
        ui.add_space(12.0);
        if ui.button("Back to Setup").clicked() {
            action = Some(StudyAction::BackToSetup);
        }
        if ui.button("⟳ Refresh").clicked() {
            action = Some(StudyAction::Refresh);
        }
    });

    action
}
