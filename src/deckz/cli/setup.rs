use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "deckz", bin_name = "deckz", version = get_version())]
#[command(about = "Organize cards into decks, on top of a shipped baseline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Debug logging on stderr (DECKZ_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage decks
    #[command(subcommand)]
    Deck(DeckCommands),

    /// Manage cards
    #[command(subcommand)]
    Card(CardCommands),

    /// Search cards by text, category and hashtag
    #[command(alias = "s")]
    Search {
        /// Matched against title, description, notes and hashtags
        term: Option<String>,

        /// Only cards in this category (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Only cards with this hashtag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List every category in use
    Categories,

    /// List every hashtag in use
    Tags,

    /// Export all cards as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import cards from a CSV file in the export layout
    Import { file: PathBuf },

    /// Write a full JSON backup
    Backup {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace everything with the contents of a backup
    Restore { file: PathBuf },

    /// Clear all local data
    Reset {
        /// Required, there is no undo
        #[arg(long)]
        yes: bool,
    },

    /// Show collection statistics
    Status,

    /// Get or set configuration
    Config {
        /// Configuration key (baseline-path, default-deck-name, default-layout)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Decks are referenced by id, by name or by their 1-based position.
#[derive(Subcommand, Debug)]
pub enum DeckCommands {
    /// List decks
    #[command(alias = "ls")]
    List,

    /// Create a deck
    #[command(alias = "new")]
    Add {
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Rename a deck or change its description
    Edit {
        deck: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a deck and all its cards
    #[command(alias = "rm")]
    Delete { deck: String },

    /// Switch a deck between row and column layout
    Layout { deck: String },

    /// Set the deck order; every deck must be listed
    Order {
        #[arg(required = true, num_args = 1..)]
        decks: Vec<String>,
    },
}

/// Cards are referenced by id, a unique id prefix or their 1-based position in the deck.
#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// List the cards of a deck
    #[command(alias = "ls")]
    List { deck: String },

    /// Create a card
    #[command(alias = "new")]
    Add {
        deck: String,
        title: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Change card fields; omitted fields keep their value
    Edit {
        deck: String,
        card: String,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a card
    #[command(alias = "rm")]
    Delete { deck: String, card: String },

    /// Move a card to another deck
    #[command(alias = "mv")]
    Move {
        deck: String,
        card: String,
        target: String,

        /// Insert at this 1-based position instead of appending
        #[arg(short, long)]
        position: Option<usize>,
    },

    /// Set the card order of a deck; every card must be listed
    Order {
        deck: String,

        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
    },

    /// Show one card in full
    Show { deck: String, card: String },
}

#[derive(clap::Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub notes: Option<String>,

    /// Hashtags, e.g. "#rust #cli" (words without # are ignored)
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Cover image reference
    #[arg(long)]
    pub cover: Option<String>,

    /// Comma separated gallery image references
    #[arg(short, long)]
    pub images: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deckz").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn card_add_with_fields() {
        let cli = parse(&["card", "add", "General", "Title", "-t", "#a #b", "-i", "x.png"]);
        match cli.command {
            Some(Commands::Card(CardCommands::Add { deck, title, fields })) => {
                assert_eq!(deck, "General");
                assert_eq!(title, "Title");
                assert_eq!(fields.tags.as_deref(), Some("#a #b"));
                assert_eq!(fields.images.as_deref(), Some("x.png"));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn search_repeats_filters() {
        let cli = parse(&["search", "-c", "web", "-c", "devops", "--tag", "ci", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Search {
                term,
                categories,
                tags,
            }) => {
                assert_eq!(term, None);
                assert_eq!(categories, vec!["web", "devops"]);
                assert_eq!(tags, vec!["ci"]);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn aliases() {
        assert!(matches!(
            parse(&["card", "mv", "1", "2", "3", "-p", "1"]).command,
            Some(Commands::Card(CardCommands::Move {
                position: Some(1),
                ..
            }))
        ));
        assert!(matches!(
            parse(&["deck", "rm", "General"]).command,
            Some(Commands::Deck(DeckCommands::Delete { .. }))
        ));
    }

    #[test]
    fn order_needs_ids() {
        assert!(Cli::try_parse_from(["deckz", "deck", "order"]).is_err());
    }
}
