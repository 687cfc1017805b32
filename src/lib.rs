//! # Vectorsearch Client
//!
//! A command-line client for a vector-search and AI-summarization service.
//!
//! Users organize text into categories, ingest documents (typed text, PDF,
//! or Word files), run similarity search against a category, page through
//! results, and request on-demand AI summaries streamed as they are
//! generated. Embedding, vector search, storage, and summarization all live
//! in the backend, reached exclusively over JSON-over-HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   ┌─────────────┐   ┌───────────────┐
//! │ Files / text  │──▶│  Assembler   │──▶│  /api/upload  │
//! │ (pdf, docx…)  │   │ extract+trim │   └───────────────┘
//! └───────────────┘   └─────────────┘
//! ┌───────────────┐   ┌─────────────┐   ┌───────────────┐
//! │ Query + page  │──▶│  Paginator   │──▶│  /api/search  │
//! └───────────────┘   └─────────────┘   └───────────────┘
//! ┌───────────────┐   ┌─────────────┐   ┌───────────────┐
//! │ Result + "AI" │──▶│   Stream     │──▶│   /api/chat   │
//! └───────────────┘   │  consumer    │   │  (text/plain) │
//!                     └─────────────┘   └───────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`owner`] | Persistent owner-identity bootstrap |
//! | [`extract`] | Per-format text extraction (plain, PDF, DOCX) |
//! | [`ingest`] | Batch assembly and upload |
//! | [`api`] | Wire types and HTTP client |
//! | [`search`] | Windowed retrieval paginator |
//! | [`chat`] | Accumulated streaming for summaries |
//! | [`categories`] | Category list state |

pub mod api;
pub mod categories;
pub mod chat;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod owner;
pub mod search;
