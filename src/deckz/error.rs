use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckzError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Card not found: {card} (deck {deck})")]
    CardNotFound { deck: String, card: String },

    #[error("Could not persist collection: {0}")]
    Persistence(String),

    #[error("Could not load source: {0}")]
    SourceLoad(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DeckzError {
    pub fn card_not_found(deck: &str, card: &str) -> Self {
        DeckzError::CardNotFound {
            deck: deck.to_string(),
            card: card.to_string(),
        }
    }

    /// True for the "referenced id does not exist" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DeckzError::DeckNotFound(_) | DeckzError::CardNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DeckzError>;
