//! Verifies `NOTION_KEY` / `NOTION_DATABASE_ID` against the Notion API and
//! prints the cards the server would hand out.
use std::env;

use notion_flashcards::{
    core::{
        Card,
        Credentials,
        FlashcardError,
    },
    init_logging,
    notion::{
        self,
        api::NOTION_API_URL,
        NotionClient,
    },
};
use tracing::{
    error,
    info,
};

fn print_table(cards: &[Card]) {
    println!("{:<38} {:<30} {:<30} {:>6}", "id", "question", "answer", "times");
    for card in cards {
        println!(
            "{:<38} {:<30} {:<30} {:>6}",
            card.id,
            truncate(&card.question, 30),
            truncate(&card.answer, 30),
            card.times_studied
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width - 1).collect();
    short.push('…');
    short
}

async fn check(client: &NotionClient, credentials: &Credentials) -> Result<(), FlashcardError> {
    info!("Sending request to Notion...");

    let database = notion::retrieve_database(client, credentials).await?;
    println!("Success! I can see your database named: {}", database.title);

    let cards = notion::query_cards(client, credentials).await?;
    print_table(&cards);
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    let credentials = Credentials::new(
        env::var("NOTION_KEY").unwrap_or_default(),
        env::var("NOTION_DATABASE_ID").unwrap_or_default(),
    );
    if !credentials.is_complete() {
        error!("NOTION_KEY and NOTION_DATABASE_ID must both be set");
        std::process::exit(2);
    }

    let base_url = env::var("NOTION_API_URL").unwrap_or_else(|_| NOTION_API_URL.to_string());
    let client = NotionClient::new(base_url);

    if let Err(e) = check(&client, &credentials).await {
        error!("Connection check failed: {e}");
        std::process::exit(1);
    }
}
