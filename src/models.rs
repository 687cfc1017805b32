//! Core data types that flow through the ingestion and retrieval pipeline.

/// One queued file awaiting extraction: the declared name drives format
/// dispatch, the bytes are the raw blob.
#[derive(Debug, Clone)]
pub struct QueuedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Input for a single ingestion action. The mode is caller-selected and
/// mutually exclusive: pasted text never mixes with queued files.
#[derive(Debug, Clone)]
pub enum IngestSource {
    Files(Vec<QueuedFile>),
    Pasted(String),
}

/// One similarity-search hit as shown to the user. Lives only in
/// current-page state and is replaced wholesale on every new search or
/// page change.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub document_id: u64,
    /// Similarity in [0, 1]; displayed as a percentage.
    pub similarity: f32,
    pub text: String,
}

/// Per-hit AI summary lifecycle, owned by the hit's presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SummaryState {
    #[default]
    NotRequested,
    Loading,
    Loaded(String),
}
