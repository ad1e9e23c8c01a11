pub mod app;
pub mod message_overlay;
pub mod notice_modal;
pub mod setup_form;
pub mod study_view;
pub mod tasks;
pub mod theme;

pub use app::FlashcardsApp;
pub use tasks::TaskManager;
