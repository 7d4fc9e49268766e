use chrono::{DateTime, Utc};
use colored::Colorize;
use deckz::api::{CardOrigin, CmdMessage, MessageLevel};
use deckz::commands::{CardHit, CollectionStatus, ImportSummary};
use deckz::config::{DeckzConfig, CONFIG_KEYS};
use deckz::model::{Card, Deck, Layout};
use deckz::normalize::format_hashtags;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const SHORT_ID: usize = 8;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_decks(decks: &[Deck]) {
    if decks.is_empty() {
        println!("No decks.");
        return;
    }
    for (i, deck) in decks.iter().enumerate() {
        let idx = format!("{:>3}. ", i + 1);
        let layout = match deck.layout {
            Layout::Row => "row",
            Layout::Column => "col",
        };
        let suffix = format!(" {:>4} cards  {}", deck.cards.len(), layout);
        let available = LINE_WIDTH
            .saturating_sub(idx.width() + SHORT_ID + 2 + suffix.width() + TIME_WIDTH);
        let name = truncate_to_width(&deck.name, available);
        let padding = available.saturating_sub(name.width());

        println!(
            "{}{}  {}{}{}{}",
            idx.yellow(),
            short_id(&deck.id).dimmed(),
            name.bold(),
            " ".repeat(padding),
            suffix,
            format_time_ago(deck.created_at).dimmed()
        );
    }
}

pub(super) fn print_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("No cards.");
        return;
    }
    for (i, card) in cards.iter().enumerate() {
        print_card_line(&format!("{:>3}. ", i + 1), card, None);
    }
}

pub(super) fn print_hits(hits: &[CardHit]) {
    if hits.is_empty() {
        println!("No cards found.");
        return;
    }
    for hit in hits {
        print_card_line("   ", &hit.card, Some(&hit.deck_name));
    }
}

fn print_card_line(idx: &str, card: &Card, deck_name: Option<&str>) {
    let deck = deck_name.map(|n| format!("[{}] ", n)).unwrap_or_default();
    let tags = format_hashtags(&card.hashtags);
    let body = if tags.is_empty() {
        format!("{}{}", deck, card.title)
    } else {
        format!("{}{} {}", deck, card.title, tags)
    };

    let available = LINE_WIDTH.saturating_sub(idx.width() + SHORT_ID + 2 + TIME_WIDTH);
    let body = truncate_to_width(&body, available);
    let padding = available.saturating_sub(body.width());

    println!(
        "{}{}  {}{}{}",
        idx.yellow(),
        short_id(&card.id).dimmed(),
        body,
        " ".repeat(padding),
        format_time_ago(card.created_at).dimmed()
    );
}

pub(super) fn print_card_detail(hit: &CardHit, origin: Option<CardOrigin>) {
    let card = &hit.card;
    println!("{}", card.title.bold());
    println!("--------------------------------");
    println!("{:<12}{}", "id", card.id);
    println!("{:<12}{}", "deck", hit.deck_name);
    if let Some(category) = &card.category {
        println!("{:<12}{}", "category", category);
    }
    if !card.hashtags.is_empty() {
        println!("{:<12}{}", "hashtags", format_hashtags(&card.hashtags).cyan());
    }
    if let Some(cover) = &card.cover_image {
        println!("{:<12}{}", "cover", cover);
    }
    if !card.gallery_images.is_empty() {
        println!("{:<12}{}", "images", card.gallery_images.join(", "));
    }
    println!("{:<12}{}", "created", format_time_ago(card.created_at).trim());
    if let Some(updated) = card.updated_at {
        println!("{:<12}{}", "updated", format_time_ago(updated).trim());
    }
    if let Some(origin) = origin {
        let label = match origin {
            CardOrigin::Baseline => "baseline".normal(),
            CardOrigin::ModifiedLocally => "modified locally".yellow(),
            CardOrigin::LocalOnly => "local only".green(),
        };
        println!("{:<12}{}", "origin", label);
    }
    if let Some(description) = &card.description {
        println!("\n{}", description);
    }
    if let Some(notes) = &card.notes {
        println!("\n{}\n{}", "Notes".dimmed(), notes);
    }
}

pub(super) fn print_labels(labels: &[String], empty: &str) {
    if labels.is_empty() {
        println!("{}", empty);
        return;
    }
    for label in labels {
        println!("{}", label);
    }
}

pub(super) fn print_status(status: &CollectionStatus) {
    println!("{:<14}{}", "decks", status.decks);
    println!(
        "{:<14}{} baseline, {} local",
        "", status.baseline_decks, status.overlay_decks
    );
    println!("{:<14}{}", "cards", status.cards);
    println!(
        "{:<14}{} baseline, {} local",
        "", status.baseline_cards, status.overlay_cards
    );
    match status.last_saved {
        Some(at) => println!("{:<14}{}", "last saved", format_time_ago(at).trim()),
        None => println!("{:<14}{}", "last saved", "never".dimmed()),
    }
    if status.unsaved {
        println!("{}", "Local changes are not saved.".yellow());
    }
}

pub(super) fn print_import_summary(summary: &ImportSummary) {
    println!(
        "{} imported, {} skipped, {} decks created",
        summary.imported, summary.skipped, summary.decks_created
    );
}

pub(super) fn print_config(config: &DeckzConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn short_id(id: &str) -> String {
    let short: String = id.chars().take(SHORT_ID).collect();
    format!("{:<width$}", short, width = SHORT_ID)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
