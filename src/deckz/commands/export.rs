//! CSV export: one row per card, flattened with its deck's name.
//!
//! Every field is quoted and embedded quotes are doubled, so a title such as
//! `He said "hi"` is written as `"He said ""hi"""`.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DeckzError, Result};
use crate::model::{Card, Collection};
use crate::normalize::format_hashtags;
use chrono::SecondsFormat;
use std::io::Write;

pub const CSV_HEADER: [&str; 8] = [
    "Deck",
    "Title",
    "Category",
    "Description",
    "Notes",
    "Hashtags",
    "Images",
    "CreatedAt",
];

pub fn run(collection: &Collection) -> Result<CmdResult> {
    let mut buf = Vec::new();
    let rows = write_csv(&mut buf, collection)?;
    let text = String::from_utf8(buf)
        .map_err(|e| DeckzError::Validation(format!("export produced invalid UTF-8: {}", e)))?;

    let mut result = CmdResult::default().with_output(text);
    result.add_message(CmdMessage::success(format!("Exported {} cards", rows)));
    Ok(result)
}

/// Writes the header and every card; returns the number of card rows.
pub fn write_csv<W: Write>(writer: W, collection: &Collection) -> Result<usize> {
    let mut csv = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    let mut rows = 0;
    for (deck, card) in collection.cards() {
        csv.write_record(card_row(&deck.name, card))?;
        rows += 1;
    }
    csv.flush().map_err(DeckzError::Io)?;
    Ok(rows)
}

fn card_row(deck_name: &str, card: &Card) -> [String; 8] {
    [
        deck_name.to_string(),
        card.title.clone(),
        card.category.clone().unwrap_or_default(),
        card.description.clone().unwrap_or_default(),
        card.notes.clone().unwrap_or_default(),
        format_hashtags(&card.hashtags),
        card.gallery_images.join(", "),
        card.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    ]
}
