use std::time::Duration;

use tracing::{
    info,
    warn,
};

use super::store::CredentialStore;
use crate::core::{
    Card,
    Credentials,
    FlashcardError,
    Level,
};

/// Pause between rating a card and showing the next one.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(150);
pub const DECK_FINISHED: &str = "Deck finished! Refresh to see updated intervals.";

/// A non-empty list of cards being studied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    current: usize,
    flipped: bool,
    advance_pending: bool,
}

impl Deck {
    fn new(cards: Vec<Card>) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        Some(Self { cards, current: 0, flipped: false, advance_pending: false })
    }

    pub fn current_card(&self) -> &Card {
        &self.cards[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_advancing(&self) -> bool {
        self.advance_pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Setup form. `notice` carries the reason we landed here, if any.
    Unconfigured { notice: Option<String> },
    Loading,
    Empty,
    Studying(Deck),
}

/// Work the session wants done off the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCards { generation: u64, credentials: Credentials },
    UpdateCard { credentials: Credentials, card_id: String, level: Level, times_studied: u32 },
    FetchDemoCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    DeckFinished,
}

pub struct Session {
    store: CredentialStore,
    credentials: Option<Credentials>,
    state: ViewState,
    generation: u64,
}

impl Session {
    /// Restores stored credentials and, if there are any, starts fetching.
    pub fn start(store: CredentialStore) -> (Self, Option<Effect>) {
        let credentials = store.load();
        let mut session = Self {
            store,
            credentials,
            state: ViewState::Unconfigured { notice: None },
            generation: 0,
        };
        let effect = session.begin_fetch();
        (session, effect)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn begin_fetch(&mut self) -> Option<Effect> {
        let credentials = self.credentials.clone()?;
        self.generation += 1;
        self.state = ViewState::Loading;
        Some(Effect::FetchCards { generation: self.generation, credentials })
    }

    pub fn submit_credentials(&mut self, key: &str, database_id: &str) -> Option<Effect> {
        if !matches!(self.state, ViewState::Unconfigured { .. }) {
            return None;
        }

        let credentials = Credentials::new(key.trim(), database_id.trim());
        if !credentials.is_complete() {
            self.state = ViewState::Unconfigured {
                notice: Some("Enter both the integration secret and the database ID.".to_string()),
            };
            return None;
        }

        if let Err(e) = self.store.save(&credentials) {
            warn!("Failed to persist credentials: {e}");
        }
        self.credentials = Some(credentials);
        self.begin_fetch()
    }

    /// Results from a fetch that is no longer the latest one are dropped.
    pub fn cards_loaded(&mut self, generation: u64, result: Result<Vec<Card>, FlashcardError>) {
        if self.state != ViewState::Loading || generation != self.generation {
            info!("Ignoring stale card list (generation {generation})");
            return;
        }

        self.state = match result {
            Ok(cards) => match Deck::new(cards) {
                Some(deck) => ViewState::Studying(deck),
                None => ViewState::Empty,
            },
            Err(e) => {
                warn!("Failed to load cards: {e}");
                ViewState::Unconfigured { notice: Some(format!("Error: {e}")) }
            }
        };
    }

    pub fn flip(&mut self) {
        if let ViewState::Studying(deck) = &mut self.state {
            if !deck.advance_pending {
                deck.flipped = !deck.flipped;
            }
        }
    }

    /// Records a rating for the current card. The caller should invoke
    /// [`Session::advance`] after [`ADVANCE_DELAY`], independently of the update.
    pub fn rate(&mut self, level: Level) -> Option<Effect> {
        let credentials = self.credentials.clone()?;
        let ViewState::Studying(deck) = &mut self.state else {
            return None;
        };
        if !deck.flipped || deck.advance_pending {
            return None;
        }

        let card = deck.current_card();
        let effect = Effect::UpdateCard {
            credentials,
            card_id: card.id.clone(),
            level,
            times_studied: card.times_studied,
        };

        deck.flipped = false;
        deck.advance_pending = true;
        Some(effect)
    }

    pub fn advance(&mut self) -> Option<Advance> {
        let ViewState::Studying(deck) = &mut self.state else {
            return None;
        };
        if !deck.advance_pending {
            return None;
        }

        deck.advance_pending = false;
        if deck.current + 1 < deck.cards.len() {
            deck.current += 1;
            Some(Advance::Next(deck.current))
        } else {
            deck.current = 0;
            Some(Advance::DeckFinished)
        }
    }

    pub fn card_updated(&self, result: Result<(), FlashcardError>) {
        if let Err(e) = result {
            warn!("Failed to record review: {e}");
        }
    }

    pub fn refresh(&mut self) -> Option<Effect> {
        match self.state {
            ViewState::Studying(_) | ViewState::Empty => self.begin_fetch(),
            _ => None,
        }
    }

    pub fn request_demo_credentials(&self) -> Option<Effect> {
        match self.state {
            ViewState::Unconfigured { .. } => Some(Effect::FetchDemoCredentials),
            _ => None,
        }
    }

    /// Demo credentials only prefill the form; they are saved on submit.
    pub fn demo_credentials_loaded(
        &mut self,
        result: Result<Credentials, FlashcardError>,
    ) -> Option<Credentials> {
        if !matches!(self.state, ViewState::Unconfigured { .. }) {
            return None;
        }

        match result {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                warn!("Failed to fetch demo credentials: {e}");
                self.state = ViewState::Unconfigured {
                    notice: Some(format!("Demo credentials unavailable: {e}")),
                };
                None
            }
        }
    }

    pub fn return_to_setup(&mut self) {
        if self.state == ViewState::Empty {
            self.reset();
        }
    }

    pub fn logout(&mut self) {
        if matches!(self.state, ViewState::Studying(_) | ViewState::Empty) {
            self.reset();
        }
    }

    fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored credentials: {e}");
        }
        self.credentials = None;
        self.generation += 1;
        self.state = ViewState::Unconfigured { notice: None };
    }
}
