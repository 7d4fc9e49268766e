use crate::normalize::{non_blank, parse_hashtags, parse_images};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Schema version written into full-state backups.
pub const BACKUP_VERSION: &str = "1.0.0";

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    // Older documents call this "horizontal" or "landscape"
    #[serde(alias = "horizontal", alias = "landscape")]
    Row,
    #[default]
    Column,
}

impl Layout {
    pub fn toggled(self) -> Self {
        match self {
            Layout::Row => Layout::Column,
            Layout::Column => Layout::Row,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Row => "row",
            Layout::Column => "column",
        }
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "row" | "horizontal" | "landscape" => Ok(Layout::Row),
            "column" => Ok(Layout::Column),
            other => Err(format!("Unknown layout: {} (expected row or column)", other)),
        }
    }
}

/// Where the current version of a deck or card comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Baseline,
    #[default]
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CardRecord")]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub hashtags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub rank: usize,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub source: Provenance,
}

/// A card as stored on disk, in any of the shapes older documents use.
///
/// Cards imported by earlier versions carry `images`; editing them later adds
/// `galleryImages` next to it, which wins. Unreadable timestamps do not reject
/// the card.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRecord {
    id: String,
    title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    category: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    notes: Option<String>,
    #[serde(default)]
    hashtags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    cover_image: Option<String>,
    #[serde(default)]
    gallery_images: Option<Vec<String>>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default, alias = "order")]
    rank: usize,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    source: Provenance,
}

impl From<CardRecord> for Card {
    fn from(record: CardRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            category: record.category,
            description: record.description,
            notes: record.notes,
            hashtags: record.hashtags.unwrap_or_default(),
            cover_image: record.cover_image,
            gallery_images: record
                .gallery_images
                .or(record.images)
                .unwrap_or_default(),
            rank: record.rank,
            created_at: record.created_at.unwrap_or_else(Utc::now),
            updated_at: record.updated_at,
            source: record.source,
        }
    }
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            category: None,
            description: None,
            notes: None,
            hashtags: Vec::new(),
            cover_image: None,
            gallery_images: Vec::new(),
            rank: 0,
            created_at: Utc::now(),
            updated_at: None,
            source: Provenance::Overlay,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builds a card from validated form input.
    pub fn from_fields(fields: &CardFields, rank: usize) -> Self {
        let mut card = Card::new(fields.title.trim());
        card.assign(fields);
        card.rank = rank;
        card
    }

    /// Replaces every user-editable field and stamps `updated_at`.
    pub fn apply_fields(&mut self, fields: &CardFields) {
        self.title = fields.title.trim().to_string();
        self.assign(fields);
        self.updated_at = Some(Utc::now());
        self.source = Provenance::Overlay;
    }

    fn assign(&mut self, fields: &CardFields) {
        self.category = non_blank(&fields.category);
        self.description = non_blank(&fields.description);
        self.notes = non_blank(&fields.notes);
        self.hashtags = parse_hashtags(&fields.hashtags);
        self.cover_image = non_blank(&fields.cover_image);
        self.gallery_images = parse_images(&fields.gallery_images);
    }

    /// Lowercased haystack for free-text search.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.description.as_deref().unwrap_or_default(),
            self.notes.as_deref().unwrap_or_default(),
            self.hashtags.join(" ")
        )
        .to_lowercase()
    }

    /// Compares the user-visible content, ignoring ids, ranks, timestamps and provenance.
    pub fn same_content(&self, other: &Card) -> bool {
        self.title == other.title
            && self.category == other.category
            && self.description == other.description
            && self.notes == other.notes
            && self.hashtags == other.hashtags
            && self.cover_image == other.cover_image
            && self.gallery_images == other.gallery_images
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, alias = "order")]
    pub rank: usize,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub source: Provenance,
}

impl Deck {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            description,
            cards: Vec::new(),
            layout: Layout::default(),
            rank: 0,
            created_at: Utc::now(),
            source: Provenance::Overlay,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    pub fn card_position(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    /// Tags the deck and every card it owns.
    pub fn mark_source(&mut self, source: Provenance) {
        self.source = source;
        for card in &mut self.cards {
            card.source = source;
        }
    }
}

/// Raw card input, as typed into a form or read from an import row.
///
/// Hashtags and gallery images are the unparsed text fields; normalization
/// happens when the card is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub title: String,
    pub category: String,
    pub description: String,
    pub notes: String,
    pub hashtags: String,
    pub cover_image: String,
    pub gallery_images: String,
}

impl CardFields {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Pre-fills the form from an existing card (tags re-marked, images comma joined).
    pub fn from_card(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            category: card.category.clone().unwrap_or_default(),
            description: card.description.clone().unwrap_or_default(),
            notes: card.notes.clone().unwrap_or_default(),
            hashtags: crate::normalize::format_hashtags(&card.hashtags),
            cover_image: card.cover_image.clone().unwrap_or_default(),
            gallery_images: card.gallery_images.join(", "),
        }
    }
}

/// The unit of persistence: every deck with its cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub decks: Vec<Deck>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// The live, ordered set of decks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub decks: Vec<Deck>,
}

impl Collection {
    pub fn new(decks: Vec<Deck>) -> Self {
        Self { decks }
    }

    pub fn deck(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    pub fn deck_mut(&mut self, deck_id: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.id == deck_id)
    }

    pub fn deck_position(&self, deck_id: &str) -> Option<usize> {
        self.decks.iter().position(|d| d.id == deck_id)
    }

    pub fn deck_by_name(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.name == name)
    }

    pub fn card_count(&self) -> usize {
        self.decks.iter().map(|d| d.cards.len()).sum()
    }

    /// Every card paired with its owning deck, in display order.
    pub fn cards(&self) -> impl Iterator<Item = (&Deck, &Card)> {
        self.decks
            .iter()
            .flat_map(|deck| deck.cards.iter().map(move |card| (deck, card)))
    }

    pub fn snapshot(&self, version: Option<&str>) -> Snapshot {
        Snapshot {
            decks: self.decks.clone(),
            last_modified: Utc::now(),
            version: version.map(str::to_string),
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(non_blank))
}

/// Reads an RFC 3339 timestamp. Anything else reads as `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|t| t.with_timezone(&Utc)))
}

fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_timestamp(deserializer)?.unwrap_or_else(Utc::now))
}
