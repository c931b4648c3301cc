//! Render and print errors.
//!
//! None of these escape the pipeline: [`ReceiptPipeline`](crate::ReceiptPipeline)
//! logs them and reports [`PrintOutcome::Failed`](crate::PrintOutcome::Failed).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The blocking render task panicked or was cancelled.
    #[error("Capture failed: {0}")]
    Capture(String),

    /// The bitmap would exceed the rasterizer's size limit.
    #[error("Receipt bitmap too large: {width}x{height} px")]
    TooLarge { width: u32, height: u32 },

    /// The bitmap could not be assembled into a document.
    #[error("Document assembly failed: {0}")]
    Assembly(String),

    /// The print surface could not take the document.
    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
