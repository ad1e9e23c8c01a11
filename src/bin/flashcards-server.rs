use notion_flashcards::{
    init_logging,
    server::{
        config::Config,
        start_server,
    },
};
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    let result = match Config::load() {
        Ok(config) => start_server(config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
