//! # Vectorsearch Client CLI (`vsc`)
//!
//! The `vsc` binary drives a vector-search and AI-summarization service:
//! ingest documents into categories, run paginated similarity search, stream
//! AI summaries of individual hits, and manage the owner identity the server
//! scopes everything to.
//!
//! ## Usage
//!
//! ```bash
//! vsc --config ./config/vsc.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vsc owner show` | Print the persisted owner identifier (minted on first use) |
//! | `vsc owner delete` | Delete the owner server-side and forget the local identifier |
//! | `vsc categories` | List the owner's categories |
//! | `vsc upload <files>...` | Extract, truncate, and upload documents |
//! | `vsc upload --text "..."` | Upload one pasted text block |
//! | `vsc search "<query>"` | One page of similarity results |
//! | `vsc search "<query>" --interactive` | Page through results, summarize and delete hits |
//! | `vsc summarize <id>` | Stream an AI summary of one document |
//! | `vsc delete category <name>` | Delete a category and its documents |
//! | `vsc delete document <id>` | Delete one document |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vectorsearch_client::{categories, chat, config, ingest, owner, search};

/// Vectorsearch client — ingest, search, and summarize documents against a
/// vector-search service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/vsc.example.toml` for a full example; a missing file
/// falls back to built-in defaults.
#[derive(Parser)]
#[command(
    name = "vsc",
    about = "Vectorsearch client — ingest, search, and summarize documents",
    version,
    long_about = "A command-line client for a vector-search and AI-summarization service. \
    Documents (typed text, PDF, or Word files) are normalized client-side and uploaded into \
    categories; similarity search pages through results with a fixed window; AI summaries \
    stream incrementally as the backend generates them."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/vsc.toml`. API origin, search window size,
    /// ingestion limits, and the state directory are read from this file.
    #[arg(long, global = true, default_value = "./config/vsc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Manage the owner identifier that scopes all server-side data.
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// List the owner's categories.
    ///
    /// An empty server-side list shows the default `General` category,
    /// which is synthesized client-side.
    Categories,

    /// Extract, truncate, and upload documents into a category.
    ///
    /// Files are dispatched by suffix: `.pdf` and `.docx` decode through
    /// their format parsers, everything else is read as plain text. Each
    /// document is cut to the configured character budget before upload.
    /// A file that fails extraction is reported and skipped; the rest of
    /// the batch still uploads.
    Upload {
        /// Files to ingest, processed in the given order.
        #[arg(conflicts_with = "text")]
        files: Vec<PathBuf>,

        /// Target category.
        #[arg(long, default_value = categories::DEFAULT_CATEGORY)]
        category: String,

        /// Upload this text block instead of files.
        #[arg(long)]
        text: Option<String>,
    },

    /// Run a similarity search against a category.
    ///
    /// Results come back one window at a time; a page shorter than the
    /// window is the last one.
    Search {
        /// The search query string.
        query: String,

        /// Category to search in.
        #[arg(long, default_value = categories::DEFAULT_CATEGORY)]
        category: String,

        /// Fetch this 1-based page instead of the first.
        #[arg(long, conflicts_with = "interactive")]
        page: Option<usize>,

        /// Page through results interactively: `n`/`p` to navigate,
        /// `s <n>` to stream an AI summary, `v <n>` to view the full text,
        /// `d <n>` to delete a document, `q` to quit.
        #[arg(long)]
        interactive: bool,
    },

    /// Stream an AI summary of one document to stdout.
    Summarize {
        /// Document id as returned by search or upload.
        document_id: u64,

        /// Override the summary prompt.
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Delete a category or a single document (cascades server-side).
    Delete {
        #[command(subcommand)]
        target: DeleteTarget,
    },
}

/// Owner identity subcommands.
#[derive(Subcommand)]
enum OwnerAction {
    /// Print the persisted identifier, minting one on first use.
    Show,
    /// Delete everything stored under this owner and forget the local id.
    Delete,
}

/// Deletion targets.
#[derive(Subcommand)]
enum DeleteTarget {
    /// Delete a whole category and its documents.
    ///
    /// Deleting the last remaining category is refused.
    Category {
        /// Category name.
        name: String,
    },
    /// Delete one document from a category.
    Document {
        /// Document id.
        document_id: u64,

        /// Category the document belongs to.
        #[arg(long, default_value = categories::DEFAULT_CATEGORY)]
        category: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Owner { action } => match action {
            OwnerAction::Show => {
                owner::run_owner_show(&cfg)?;
            }
            OwnerAction::Delete => {
                owner::run_owner_delete(&cfg).await?;
            }
        },
        Commands::Categories => {
            categories::run_categories(&cfg).await?;
        }
        Commands::Upload {
            files,
            category,
            text,
        } => {
            if files.is_empty() && text.is_none() {
                anyhow::bail!("nothing to upload: pass files or --text");
            }
            ingest::run_upload(&cfg, &category, files, text).await?;
        }
        Commands::Search {
            query,
            category,
            page,
            interactive,
        } => {
            search::run_search(&cfg, &query, &category, page, interactive).await?;
        }
        Commands::Summarize {
            document_id,
            prompt,
        } => {
            chat::run_summarize(&cfg, document_id, prompt).await?;
        }
        Commands::Delete { target } => match target {
            DeleteTarget::Category { name } => {
                categories::run_delete_category(&cfg, &name).await?;
            }
            DeleteTarget::Document {
                document_id,
                category,
            } => {
                categories::run_delete_document(&cfg, &category, document_id).await?;
            }
        },
    }

    Ok(())
}
