use std::sync::{
    mpsc,
    Arc,
};

use eframe::egui;
use tokio::runtime::Runtime;

use crate::{
    client::{
        api::demo_credentials,
        BackendClient,
        Effect,
    },
    core::{
        Card,
        Credentials,
        FlashcardError,
    },
};

#[derive(Debug)]
pub enum TaskResult {
    CardsLoaded { generation: u64, result: Result<Vec<Card>, FlashcardError> },
    CardUpdated(Result<(), FlashcardError>),
    DemoCredentials(Result<Credentials, FlashcardError>),
}

/// Runs session effects on a tokio runtime and hands results back to the UI
/// thread, which drains them once per frame.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    server_url: String,
}

impl TaskManager {
    pub fn new(server_url: impl Into<String>) -> Result<Self, FlashcardError> {
        let runtime = Arc::new(Runtime::new()?);
        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender, server_url: server_url.into() })
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    pub fn run(&self, effect: Effect, ctx: &egui::Context) {
        let sender = self.sender.clone();
        let server_url = self.server_url.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = match effect {
                Effect::FetchCards { generation, credentials } => {
                    let client = BackendClient::new(server_url, credentials);
                    TaskResult::CardsLoaded { generation, result: client.list_cards().await }
                }
                Effect::UpdateCard { credentials, card_id, level, times_studied } => {
                    let client = BackendClient::new(server_url, credentials);
                    TaskResult::CardUpdated(
                        client.update_card(&card_id, level, times_studied).await,
                    )
                }
                Effect::FetchDemoCredentials => {
                    TaskResult::DemoCredentials(demo_credentials(&server_url).await)
                }
            };

            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }
}
