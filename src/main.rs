use std::env;

use eframe::egui;
use notion_flashcards::{
    client::{
        CredentialStore,
        DEFAULT_SERVER_URL,
    },
    gui::{
        FlashcardsApp,
        TaskManager,
    },
    init_logging,
};
use tracing::{
    error,
    info,
};

fn main() -> eframe::Result {
    dotenvy::dotenv().ok();
    init_logging();

    let server_url =
        env::var("FLASHCARDS_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    info!("Using flashcards server at {server_url}");

    let tasks = match TaskManager::new(server_url) {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("Failed to start background runtime: {e}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Flashcards")
            .with_inner_size([560.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "notion-flashcards",
        options,
        Box::new(|cc| Ok(Box::new(FlashcardsApp::new(cc, tasks, CredentialStore::default())))),
    )
}
