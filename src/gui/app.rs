use std::time::Instant;

use eframe::egui;
use tracing::info;

use super::{
    message_overlay::MessageOverlay,
    notice_modal::NoticeModal,
    setup_form::{
        SetupAction,
        SetupForm,
    },
    study_view::{
        empty_view,
        study_view,
        StudyAction,
    },
    tasks::{
        TaskManager,
        TaskResult,
    },
    theme::{
        set_theme,
        Theme,
    },
};
use crate::client::{
    session::{
        ADVANCE_DELAY,
        DECK_FINISHED,
    },
    Advance,
    CredentialStore,
    Effect,
    Session,
    ViewState,
};

pub struct FlashcardsApp {
    session: Session,
    tasks: TaskManager,

    // UI State
    setup_form: SetupForm,
    theme: Theme,
    overlay: MessageOverlay,
    notice: NoticeModal,
    advance_at: Option<Instant>,
}

impl FlashcardsApp {
    pub fn new(cc: &eframe::CreationContext<'_>, tasks: TaskManager, store: CredentialStore) -> Self {
        let theme = Theme::dracula();
        set_theme(&cc.egui_ctx, &theme);
        cc.egui_ctx.set_zoom_factor(1.25);

        let (session, effect) = Session::start(store);

        let mut setup_form = SetupForm::default();
        if let Some(credentials) = session.credentials() {
            setup_form.fill(credentials);
        }

        let mut app = Self {
            session,
            tasks,
            setup_form,
            theme,
            overlay: MessageOverlay::default(),
            notice: NoticeModal::default(),
            advance_at: None,
        };
        app.dispatch(effect, &cc.egui_ctx);
        app
    }

    fn dispatch(&mut self, effect: Option<Effect>, ctx: &egui::Context) {
        if let Some(effect) = effect {
            self.tasks.run(effect, ctx);
        }
    }

    fn handle_task_results(&mut self) {
        for result in self.tasks.poll_results() {
            match result {
                TaskResult::CardsLoaded { generation, result } => {
                    self.session.cards_loaded(generation, result);
                    if let ViewState::Studying(deck) = self.session.state() {
                        info!("Studying {} cards", deck.len());
                    }
                }
                TaskResult::CardUpdated(result) => self.session.card_updated(result),
                TaskResult::DemoCredentials(result) => {
                    if let Some(credentials) = self.session.demo_credentials_loaded(result) {
                        self.setup_form.fill(&credentials);
                    }
                }
            }
        }
    }

    /// The advance runs on a timer, whether or not the update has finished.
    fn tick_advance(&mut self, ctx: &egui::Context) {
        let Some(advance_at) = self.advance_at else {
            return;
        };

        let now = Instant::now();
        if now < advance_at {
            ctx.request_repaint_after(advance_at - now);
            return;
        }

        self.advance_at = None;
        if let Some(Advance::DeckFinished) = self.session.advance() {
            self.notice.show_notice("Deck finished", DECK_FINISHED);
        }
    }

    fn apply_setup_action(&mut self, action: SetupAction, ctx: &egui::Context) {
        let effect = match action {
            SetupAction::Submit { key, database_id } => {
                self.session.submit_credentials(&key, &database_id)
            }
            SetupAction::UseDemo => self.session.request_demo_credentials(),
        };
        self.dispatch(effect, ctx);
    }

    fn apply_study_action(&mut self, action: StudyAction, ctx: &egui::Context) {
        match action {
            StudyAction::Flip => self.session.flip(),
            StudyAction::Rate(level) => {
                let effect = self.session.rate(level);
                if effect.is_some() {
                    self.advance_at = Some(Instant::now() + ADVANCE_DELAY);
                    ctx.request_repaint_after(ADVANCE_DELAY);
                }
                self.dispatch(effect, ctx);
            }
            StudyAction::Refresh => {
                self.advance_at = None;
                let effect = self.session.refresh();
                self.dispatch(effect, ctx);
            }
            StudyAction::Logout => {
                self.advance_at = None;
                self.session.logout();
                self.setup_form.clear();
            }
            StudyAction::BackToSetup => {
                self.session.return_to_setup();
                self.setup_form.clear();
            }
        }
    }
}

impl eframe::App for FlashcardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_task_results();
        self.tick_advance(ctx);

        let mut setup_action = None;
        let mut study_action = None;

        egui::CentralPanel::default().show(ctx, |ui| match self.session.state() {
            ViewState::Unconfigured { notice } => {
                setup_action = self.setup_form.show(ui, &self.theme, notice.as_deref());
            }
            ViewState::Loading => {
                self.overlay.show(ctx, &self.theme);
            }
            ViewState::Empty => {
                study_action = empty_view(ui, &self.theme);
            }
            ViewState::Studying(deck) => {
                let action = study_view(ui, deck, &self.theme);
                // the end-of-deck notice has to be dismissed first
                if !self.notice.is_open() {
                    study_action = action;
                }
            }
        });

        self.notice.show(ctx);

        if let Some(action) = setup_action {
            self.apply_setup_action(action, ctx);
        }
        if let Some(action) = study_action {
            self.apply_study_action(action, ctx);
        }
    }
}
