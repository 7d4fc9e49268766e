//! CSV import, using the export column layout.
//!
//! The first line is always treated as the header. Rows with fewer than eight
//! fields, unparseable rows and rows with a blank title are skipped. Cards are
//! appended to the deck with the matching name, creating it when needed.

use crate::commands::{CmdMessage, CmdResult, ImportSummary};
use crate::error::Result;
use crate::model::{Card, CardFields, Collection, Deck, Layout};
use crate::normalize::parse_images;
use crate::store::OverlayStore;
use chrono::{DateTime, Utc};
use std::io::Read;
use tracing::{debug, info};

use super::helpers::persist;

const MIN_FIELDS: usize = 8;

pub fn run<S: OverlayStore, R: Read>(
    collection: &mut Collection,
    store: &mut S,
    input: R,
    layout: Layout,
) -> Result<CmdResult> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut summary = ImportSummary::default();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                debug!(row = line + 1, error = %err, "unreadable row skipped");
                summary.skipped += 1;
                continue;
            }
        };
        if record.len() < MIN_FIELDS {
            debug!(row = line + 1, fields = record.len(), "short row skipped");
            summary.skipped += 1;
            continue;
        }

        let field = |i: usize| record.get(i).unwrap_or_default();
        let deck_name = field(0).trim();
        // imported cards take their first image as the cover
        let cover_image = parse_images(field(6)).into_iter().next().unwrap_or_default();
        let fields = CardFields {
            title: field(1).to_string(),
            category: field(2).to_string(),
            description: field(3).to_string(),
            notes: field(4).to_string(),
            hashtags: field(5).to_string(),
            cover_image,
            gallery_images: field(6).to_string(),
        };
        if deck_name.is_empty() || fields.title.trim().is_empty() {
            debug!(row = line + 1, "row without deck or title skipped");
            summary.skipped += 1;
            continue;
        }

        let deck = match collection.decks.iter().position(|d| d.name == deck_name) {
            Some(pos) => &mut collection.decks[pos],
            None => {
                let mut deck = Deck::new(
                    deck_name,
                    Some(format!("Imported deck - {}", Utc::now().format("%Y-%m-%d"))),
                );
                deck.layout = layout;
                deck.rank = collection.decks.len();
                collection.decks.push(deck);
                summary.decks_created += 1;
                let last = collection.decks.len() - 1;
                &mut collection.decks[last]
            }
        };

        let mut card = Card::from_fields(&fields, deck.cards.len());
        if let Some(created_at) = parse_timestamp(field(7)) {
            card.created_at = created_at;
        }
        deck.cards.push(card);
        summary.imported += 1;
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        decks_created = summary.decks_created,
        "csv import finished"
    );

    let mut result = CmdResult::default();
    if summary.skipped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} malformed rows",
            summary.skipped
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Imported {} cards",
        summary.imported
    )));
    if summary.imported > 0 {
        persist(store, collection, &mut result);
    }
    result.import = Some(summary);
    Ok(result)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
