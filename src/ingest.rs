//! Ingestion assembly and upload.
//!
//! Turns one ingestion action — queued files or a pasted text block — into a
//! uniform document batch: dispatch each file to its extractor, truncate
//! every resulting text to the configured character budget, and submit the
//! full ordered list in a single upload call. An extractor failure is scoped
//! to its file; the rest of the queue still processes.

use anyhow::Result;
use std::path::PathBuf;

use crate::api::{ApiClient, DocumentUpload, UploadRequest};
use crate::config::Config;
use crate::extract::{extract_text, ExtractError};
use crate::models::{IngestSource, QueuedFile};
use crate::owner;

/// One input that failed extraction, reported but never fatal.
#[derive(Debug)]
pub struct FailedInput {
    pub name: String,
    pub error: ExtractError,
}

/// Result of assembling one ingestion action.
#[derive(Debug)]
pub struct Assembled {
    /// Truncated document texts in input order.
    pub documents: Vec<String>,
    pub failures: Vec<FailedInput>,
}

/// Assembles a document batch from one ingestion source.
///
/// Pasted mode: a non-blank block is the sole document. File mode: each file
/// is extracted per its suffix and appended in input order; a failing file is
/// recorded and excluded without aborting the rest. Every document is cut to
/// the first `max_chars` characters (character count, no word-boundary
/// effort). Identical contents are not deduplicated.
pub fn assemble(source: &IngestSource, max_chars: usize) -> Assembled {
    let mut documents = Vec::new();
    let mut failures = Vec::new();

    match source {
        IngestSource::Pasted(text) => {
            if !text.trim().is_empty() {
                documents.push(truncate_chars(text, max_chars));
            }
        }
        IngestSource::Files(files) => {
            for file in files {
                match extract_text(&file.name, &file.bytes) {
                    Ok(text) => documents.push(truncate_chars(&text, max_chars)),
                    Err(error) => failures.push(FailedInput {
                        name: file.name.clone(),
                        error,
                    }),
                }
            }
        }
    }

    Assembled {
        documents,
        failures,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// What one `submit` call did.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The batch was uploaded; the pending queue is now empty.
    Uploaded {
        document_ids: Vec<u64>,
        failures: Vec<FailedInput>,
    },
    /// The batch came out empty, so the upload call was skipped entirely.
    NothingToUpload { failures: Vec<FailedInput> },
    /// The upload call degraded to nothing; the queue is retained so the
    /// action can be re-triggered.
    TransportFailed { failures: Vec<FailedInput> },
}

/// Holds the pending input queue for the next ingestion action.
///
/// Queueing replaces any prior source — files and pasted text are mutually
/// exclusive modes. The queue clears after a successful submission (or when
/// the action consumed all inputs without producing a batch), so the next
/// action starts from empty state.
pub struct Ingestor {
    pending: Option<IngestSource>,
    max_chars: usize,
}

impl Ingestor {
    pub fn new(max_chars: usize) -> Self {
        Self {
            pending: None,
            max_chars,
        }
    }

    pub fn queue_files(&mut self, files: Vec<QueuedFile>) {
        self.pending = Some(IngestSource::Files(files));
    }

    pub fn queue_text(&mut self, text: String) {
        self.pending = Some(IngestSource::Pasted(text));
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub async fn submit(&mut self, api: &ApiClient, owner: &str, category: &str) -> SubmitOutcome {
        let source = match &self.pending {
            Some(source) => source,
            None => {
                return SubmitOutcome::NothingToUpload {
                    failures: Vec::new(),
                }
            }
        };

        let Assembled {
            documents,
            failures,
        } = assemble(source, self.max_chars);

        if documents.is_empty() {
            self.pending = None;
            return SubmitOutcome::NothingToUpload { failures };
        }

        let request = UploadRequest {
            owner: owner.to_string(),
            category: category.to_string(),
            name: None,
            external_id: None,
            documents: documents
                .into_iter()
                .map(|document| DocumentUpload {
                    external_id: None,
                    document,
                })
                .collect(),
            no_update: None,
        };

        match api.upload(&request).await {
            Some(response) => {
                self.pending = None;
                SubmitOutcome::Uploaded {
                    document_ids: response.document_ids,
                    failures,
                }
            }
            None => SubmitOutcome::TransportFailed { failures },
        }
    }
}

pub async fn run_upload(
    config: &Config,
    category: &str,
    files: Vec<PathBuf>,
    text: Option<String>,
) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let owner = owner::load_or_create(&config.state.dir)?;

    let mut ingestor = Ingestor::new(config.ingest.max_document_chars);
    if let Some(text) = text {
        ingestor.queue_text(text);
    } else {
        let mut queued = Vec::with_capacity(files.len());
        for path in &files {
            let bytes = std::fs::read(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            queued.push(QueuedFile { name, bytes });
        }
        ingestor.queue_files(queued);
    }

    println!("upload {}", category);
    match ingestor.submit(&api, &owner, category).await {
        SubmitOutcome::Uploaded {
            document_ids,
            failures,
        } => {
            println!("  documents: {}", document_ids.len());
            report_failures(&failures);
            let ids = document_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  document ids: {}", ids);
            println!("ok");
        }
        SubmitOutcome::NothingToUpload { failures } => {
            report_failures(&failures);
            println!("nothing to upload.");
        }
        SubmitOutcome::TransportFailed { failures } => {
            report_failures(&failures);
            println!("upload failed; nothing was ingested.");
        }
    }

    Ok(())
}

fn report_failures(failures: &[FailedInput]) {
    if failures.is_empty() {
        return;
    }
    println!("  skipped: {}", failures.len());
    for failure in failures {
        println!("    {}: {}", failure.name, failure.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pasted_text_is_sole_document() {
        let source = IngestSource::Pasted("some pasted text".to_string());
        let assembled = assemble(&source, 5000);
        assert_eq!(assembled.documents, vec!["some pasted text"]);
        assert!(assembled.failures.is_empty());
    }

    #[test]
    fn pasted_text_of_6000_chars_truncated_to_5000() {
        let source = IngestSource::Pasted("x".repeat(6000));
        let assembled = assemble(&source, 5000);
        assert_eq!(assembled.documents.len(), 1);
        assert_eq!(assembled.documents[0].chars().count(), 5000);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let source = IngestSource::Pasted("é".repeat(6000));
        let assembled = assemble(&source, 5000);
        assert_eq!(assembled.documents[0].chars().count(), 5000);
    }

    #[test]
    fn blank_pasted_text_yields_empty_batch() {
        let source = IngestSource::Pasted("   \n\t".to_string());
        let assembled = assemble(&source, 5000);
        assert!(assembled.documents.is_empty());
    }

    #[test]
    fn corrupt_file_reported_without_aborting_the_rest() {
        let source = IngestSource::Files(vec![
            QueuedFile {
                name: "good.txt".to_string(),
                bytes: b"plain contents".to_vec(),
            },
            QueuedFile {
                name: "bad.pdf".to_string(),
                bytes: b"not a valid pdf".to_vec(),
            },
            QueuedFile {
                name: "tail.txt".to_string(),
                bytes: b"still processed".to_vec(),
            },
        ]);
        let assembled = assemble(&source, 5000);
        assert_eq!(assembled.documents, vec!["plain contents", "still processed"]);
        assert_eq!(assembled.failures.len(), 1);
        assert_eq!(assembled.failures[0].name, "bad.pdf");
    }

    #[test]
    fn files_appended_in_input_order() {
        let files = (0..5)
            .map(|i| QueuedFile {
                name: format!("f{}.txt", i),
                bytes: format!("doc {}", i).into_bytes(),
            })
            .collect();
        let assembled = assemble(&IngestSource::Files(files), 5000);
        let expected: Vec<String> = (0..5).map(|i| format!("doc {}", i)).collect();
        assert_eq!(assembled.documents, expected);
    }

    #[test]
    fn identical_documents_not_deduplicated() {
        let files = vec![
            QueuedFile {
                name: "a.txt".to_string(),
                bytes: b"same".to_vec(),
            },
            QueuedFile {
                name: "b.txt".to_string(),
                bytes: b"same".to_vec(),
            },
        ];
        let assembled = assemble(&IngestSource::Files(files), 5000);
        assert_eq!(assembled.documents, vec!["same", "same"]);
    }

    #[test]
    fn file_extraction_truncated_too() {
        let files = vec![QueuedFile {
            name: "big.txt".to_string(),
            bytes: "y".repeat(7000).into_bytes(),
        }];
        let assembled = assemble(&IngestSource::Files(files), 5000);
        assert_eq!(assembled.documents[0].chars().count(), 5000);
    }
}
