pub mod errors;
pub mod models;

pub use errors::FlashcardError;
pub use models::{
    Card,
    Credentials,
    DemoCredentials,
    ErrorBody,
    Level,
    UpdateAck,
    UpdateCardRequest,
    DATABASE_HEADER,
    KEY_HEADER,
};
