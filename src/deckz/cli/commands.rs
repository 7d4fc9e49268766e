//! # CLI Layer
//!
//! This module is **one possible UI client** for deckz, not the application
//! itself. It is the only place that parses arguments, prints, and decides
//! exit codes.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data dir, loads config, opens the API
//! - `handle_*()`: Per-command handlers that call the API and print
//! - `resolve_*()`: Turn user references (id, name, position) into ids

use super::print::{
    print_card_detail, print_cards, print_config, print_decks, print_hits,
    print_import_summary, print_labels, print_messages, print_status,
};
use super::setup::{CardCommands, Cli, Commands, DeckCommands, FieldArgs};
use clap::Parser;
use deckz::api::{CardFilter, ConfigAction, DeckzApi};
use deckz::config::DeckzConfig;
use deckz::error::{DeckzError, Result};
use deckz::model::{CardFields, Deck};
use deckz::store::fs::FileStore;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const HOME_ENV: &str = "DECKZ_HOME";
const LOG_ENV: &str = "DECKZ_LOG";

struct AppContext {
    api: DeckzApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context()?;

    let result = match cli.command {
        Some(Commands::Deck(cmd)) => handle_deck(&mut ctx, cmd),
        Some(Commands::Card(cmd)) => handle_card(&mut ctx, cmd),
        Some(Commands::Search {
            term,
            categories,
            tags,
        }) => handle_search(&ctx, term, categories, tags),
        Some(Commands::Categories) => {
            let result = ctx.api.list_categories();
            print_labels(&result.labels, "No categories.");
            Ok(())
        }
        Some(Commands::Tags) => {
            let result = ctx.api.list_hashtags();
            print_labels(&result.labels, "No hashtags.");
            Ok(())
        }
        Some(Commands::Export { output }) => handle_export(&ctx, output),
        Some(Commands::Import { file }) => handle_import(&mut ctx, &file),
        Some(Commands::Backup { output }) => handle_backup(&ctx, output),
        Some(Commands::Restore { file }) => handle_restore(&mut ctx, &file),
        Some(Commands::Reset { yes }) => handle_reset(&mut ctx, yes),
        Some(Commands::Status) => {
            let result = ctx.api.status();
            if let Some(status) = &result.status {
                print_status(status);
            }
            Ok(())
        }
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_deck(&mut ctx, DeckCommands::List),
    };

    if ctx.api.is_unsaved() {
        eprintln!("Warning: changes could not be written to {}", ctx.api.data_dir().display());
    }
    result
}

fn init_logging(verbose: bool) {
    let default = if verbose { "deckz=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = DeckzConfig::load(&data_dir)?;
    let store = FileStore::new(data_dir.clone());
    let api = DeckzApi::open(store, data_dir, &config);
    Ok(AppContext { api })
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "deckz", "deckz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            DeckzError::Config(format!(
                "Could not determine a data directory, set {}",
                HOME_ENV
            ))
        })
}

// --- decks ---

fn handle_deck(ctx: &mut AppContext, cmd: DeckCommands) -> Result<()> {
    let result = match cmd {
        DeckCommands::List => {
            let result = ctx.api.list_decks();
            print_decks(&result.affected_decks);
            return Ok(());
        }
        DeckCommands::Add { name, description } => ctx.api.create_deck(&name, &description)?,
        DeckCommands::Edit {
            deck,
            name,
            description,
        } => {
            let current = resolve_deck(&ctx.api, &deck)?.clone();
            ctx.api.edit_deck(
                &current.id,
                name.as_deref().unwrap_or(&current.name),
                description
                    .as_deref()
                    .unwrap_or(current.description.as_deref().unwrap_or_default()),
            )?
        }
        DeckCommands::Delete { deck } => {
            let deck_id = resolve_deck(&ctx.api, &deck)?.id.clone();
            ctx.api.delete_deck(&deck_id)?
        }
        DeckCommands::Layout { deck } => {
            let deck_id = resolve_deck(&ctx.api, &deck)?.id.clone();
            ctx.api.toggle_deck_layout(&deck_id)?
        }
        DeckCommands::Order { decks } => {
            let ids = decks
                .iter()
                .map(|d| resolve_deck(&ctx.api, d).map(|deck| deck.id.clone()))
                .collect::<Result<Vec<_>>>()?;
            ctx.api.reorder_decks(&ids)?
        }
    };
    print_messages(&result.messages);
    Ok(())
}

// --- cards ---

fn handle_card(ctx: &mut AppContext, cmd: CardCommands) -> Result<()> {
    let result = match cmd {
        CardCommands::List { deck } => {
            let deck = resolve_deck(&ctx.api, &deck)?;
            print_cards(&deck.cards);
            return Ok(());
        }
        CardCommands::Add {
            deck,
            title,
            fields,
        } => {
            let deck_id = resolve_deck(&ctx.api, &deck)?.id.clone();
            let mut card_fields = CardFields::titled(title);
            apply_field_args(&mut card_fields, fields);
            ctx.api.create_card(&deck_id, &card_fields)?
        }
        CardCommands::Edit {
            deck,
            card,
            title,
            fields,
        } => {
            let (deck_id, card_id) = resolve_card(&ctx.api, &deck, &card)?;
            let current = ctx.api.show_card(&deck_id, &card_id)?;
            let mut card_fields = current
                .listed_cards
                .first()
                .map(|hit| CardFields::from_card(&hit.card))
                .unwrap_or_default();
            if let Some(title) = title {
                card_fields.title = title;
            }
            apply_field_args(&mut card_fields, fields);
            ctx.api.edit_card(&deck_id, &card_id, &card_fields)?
        }
        CardCommands::Delete { deck, card } => {
            let (deck_id, card_id) = resolve_card(&ctx.api, &deck, &card)?;
            ctx.api.delete_card(&deck_id, &card_id)?
        }
        CardCommands::Move {
            deck,
            card,
            target,
            position,
        } => {
            let (deck_id, card_id) = resolve_card(&ctx.api, &deck, &card)?;
            let target_id = resolve_deck(&ctx.api, &target)?.id.clone();
            match position {
                Some(position) => ctx.api.move_card_to_position(
                    &card_id,
                    &deck_id,
                    &target_id,
                    position.saturating_sub(1),
                )?,
                None => ctx.api.move_card(&card_id, &deck_id, &target_id)?,
            }
        }
        CardCommands::Order { deck, cards } => {
            let deck_id = resolve_deck(&ctx.api, &deck)?.id.clone();
            let ids = cards
                .iter()
                .map(|c| resolve_card(&ctx.api, &deck_id, c).map(|(_, card_id)| card_id))
                .collect::<Result<Vec<_>>>()?;
            ctx.api.reorder_cards(&deck_id, &ids)?
        }
        CardCommands::Show { deck, card } => {
            let (deck_id, card_id) = resolve_card(&ctx.api, &deck, &card)?;
            let shown = ctx.api.show_card(&deck_id, &card_id)?;
            let origin = ctx.api.card_status(&deck_id, &card_id)?.origin;
            if let Some(hit) = shown.listed_cards.first() {
                print_card_detail(hit, origin);
            }
            return Ok(());
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn apply_field_args(fields: &mut CardFields, args: FieldArgs) {
    let FieldArgs {
        category,
        description,
        notes,
        tags,
        cover,
        images,
    } = args;
    let targets = [
        (&mut fields.category, category),
        (&mut fields.description, description),
        (&mut fields.notes, notes),
        (&mut fields.hashtags, tags),
        (&mut fields.cover_image, cover),
        (&mut fields.gallery_images, images),
    ];
    for (target, value) in targets {
        if let Some(value) = value {
            *target = value;
        }
    }
}

// --- queries and whole-collection commands ---

fn handle_search(
    ctx: &AppContext,
    term: Option<String>,
    categories: Vec<String>,
    hashtags: Vec<String>,
) -> Result<()> {
    let filter = CardFilter {
        query: term.unwrap_or_default(),
        categories,
        hashtags,
    };
    let result = ctx.api.filter_cards(&filter);
    print_hits(&result.listed_cards);
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export_csv()?;
    write_artifact(result.output.as_deref().unwrap_or_default(), output.as_deref())?;
    if output.is_some() {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let reader = fs::File::open(file)?;
    let result = ctx.api.import_csv(reader)?;
    if let Some(summary) = &result.import {
        print_import_summary(summary);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_backup(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.backup()?;
    write_artifact(result.output.as_deref().unwrap_or_default(), output.as_deref())?;
    if output.is_some() {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_restore(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file)?;
    let result = ctx.api.restore_backup(&json)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reset(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes {
        return Err(DeckzError::Validation(
            "reset deletes all local data; pass --yes to confirm".to_string(),
        ));
    }
    let result = ctx.api.reset()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn write_artifact(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)?,
        None => print!("{}", text),
    }
    Ok(())
}

// --- reference resolution ---

fn resolve_deck<'a>(api: &'a DeckzApi<FileStore>, reference: &str) -> Result<&'a Deck> {
    let decks = &api.collection().decks;
    let by_position = reference
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| decks.get(i));

    decks
        .iter()
        .find(|d| d.id == reference)
        .or(by_position)
        .or_else(|| {
            decks
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(reference))
        })
        .ok_or_else(|| DeckzError::DeckNotFound(reference.to_string()))
}

fn resolve_card(
    api: &DeckzApi<FileStore>,
    deck_ref: &str,
    reference: &str,
) -> Result<(String, String)> {
    let deck = resolve_deck(api, deck_ref)?;
    let not_found = || DeckzError::card_not_found(&deck.name, reference);

    if let Some(card) = deck.card(reference) {
        return Ok((deck.id.clone(), card.id.clone()));
    }
    if let Some(i) = reference.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
        return deck
            .cards
            .get(i)
            .map(|card| (deck.id.clone(), card.id.clone()))
            .ok_or_else(not_found);
    }

    let mut matches = deck.cards.iter().filter(|c| c.id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(card), None) => Ok((deck.id.clone(), card.id.clone())),
        (Some(_), Some(_)) => Err(DeckzError::Validation(format!(
            "card reference {} is ambiguous",
            reference
        ))),
        (None, _) => Err(not_found()),
    }
}
