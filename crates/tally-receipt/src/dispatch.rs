//! # Print Dispatch
//!
//! Hands a finished document to whatever prints it.
//!
//! ## System Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SystemPrintSurface::dispatch(doc)                                      │
//! │                                                                         │
//! │   open_viewer?                                                          │
//! │     yes ─► write spool_dir/<stem>.pdf ─► webbrowser::open ─► Displayed  │
//! │                 │ write/open failed                                     │
//! │                 ▼                                                       │
//! │     no ──► write downloads_dir/<stem>.pdf ───────────────► Downloaded   │
//! │                 │ write failed                                          │
//! │                 ▼                                                       │
//! │             Failed { reason }                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dispatch never panics and never returns an error; the outcome says what
//! happened.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::ReceiptDocument;
use crate::error::{RenderError, RenderResult};

/// What happened to a print request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrintOutcome {
    /// Shown in the system viewer / print dialog.
    Displayed { path: PathBuf },
    /// Saved for the operator to print later.
    Downloaded { path: PathBuf },
    Failed { reason: String },
}

impl PrintOutcome {
    pub fn failed(reason: impl ToString) -> Self {
        PrintOutcome::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PrintOutcome::Failed { .. })
    }
}

/// Something that can take a finished document.
///
/// Implementations may block (file writes, spawning a viewer); the pipeline
/// calls them from a blocking task.
pub trait PrintSurface: Send + Sync {
    fn dispatch(&self, document: &ReceiptDocument) -> PrintOutcome;
}

// =============================================================================
// System Print Surface
// =============================================================================

/// Spools to disk and opens the system viewer, falling back to downloads.
#[derive(Debug, Clone)]
pub struct SystemPrintSurface {
    spool_dir: PathBuf,
    downloads_dir: PathBuf,
    open_viewer: bool,
}

impl SystemPrintSurface {
    pub fn new(spool_dir: impl Into<PathBuf>, downloads_dir: impl Into<PathBuf>) -> Self {
        SystemPrintSurface {
            spool_dir: spool_dir.into(),
            downloads_dir: downloads_dir.into(),
            open_viewer: true,
        }
    }

    /// When false, every document goes straight to the downloads directory.
    pub fn open_viewer(mut self, open: bool) -> Self {
        self.open_viewer = open;
        self
    }

    fn display(&self, document: &ReceiptDocument) -> RenderResult<PathBuf> {
        let path = write_document(&self.spool_dir, document)?;
        webbrowser::open(&path.to_string_lossy())
            .map_err(|e| RenderError::Dispatch(format!("viewer: {}", e)))?;
        Ok(path)
    }
}

impl PrintSurface for SystemPrintSurface {
    fn dispatch(&self, document: &ReceiptDocument) -> PrintOutcome {
        if self.open_viewer {
            match self.display(document) {
                Ok(path) => {
                    info!(path = %path.display(), "Document opened in system viewer");
                    return PrintOutcome::Displayed { path };
                }
                Err(err) => {
                    warn!(error = %err, "System viewer unavailable, saving to downloads");
                }
            }
        }

        match write_document(&self.downloads_dir, document) {
            Ok(path) => {
                info!(path = %path.display(), "Document saved to downloads");
                PrintOutcome::Downloaded { path }
            }
            Err(err) => {
                warn!(error = %err, "Document could not be saved");
                PrintOutcome::failed(err)
            }
        }
    }
}

fn write_document(dir: &Path, document: &ReceiptDocument) -> RenderResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(document.file_name());
    fs::write(&path, &document.bytes)?;
    Ok(path)
}

// =============================================================================
// Recording Surface
// =============================================================================

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingSurface;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use std::sync::Mutex;

    use super::{PrintOutcome, PrintSurface};
    use crate::document::ReceiptDocument;

    /// Keeps every dispatched document in memory.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        documents: Mutex<Vec<ReceiptDocument>>,
        fail: bool,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self::default()
        }

        /// A surface that records but reports every dispatch as failed.
        pub fn failing() -> Self {
            RecordingSurface {
                documents: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn documents(&self) -> Vec<ReceiptDocument> {
            self.documents
                .lock()
                .map(|docs| docs.clone())
                .unwrap_or_default()
        }

        pub fn count(&self) -> usize {
            self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
        }
    }

    impl PrintSurface for RecordingSurface {
        fn dispatch(&self, document: &ReceiptDocument) -> PrintOutcome {
            if let Ok(mut docs) = self.documents.lock() {
                docs.push(document.clone());
            }

            if self.fail {
                PrintOutcome::failed("printer offline")
            } else {
                PrintOutcome::Displayed {
                    path: document.file_name().into(),
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
