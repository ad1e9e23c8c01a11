pub mod api;
pub mod session;
pub mod store;

pub use api::{
    demo_credentials,
    BackendClient,
    DEFAULT_SERVER_URL,
};
pub use session::{
    Advance,
    Deck,
    Effect,
    Session,
    ViewState,
};
pub use store::CredentialStore;
