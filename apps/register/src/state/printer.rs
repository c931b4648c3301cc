//! # Printer State
//!
//! The receipt pipeline, built once at startup from `ConfigState`.

use std::sync::Arc;

use tally_receipt::{PrintSurface, ReceiptPipeline, SystemPrintSurface};

use super::ConfigState;

#[derive(Debug, Clone)]
pub struct PrinterState {
    pipeline: ReceiptPipeline,
}

impl PrinterState {
    /// Spools to `config.spool_dir` and opens the system viewer, unless
    /// `config.open_viewer` is off.
    pub fn from_config(config: &ConfigState) -> Self {
        let surface = SystemPrintSurface::new(&config.spool_dir, &config.downloads_dir)
            .open_viewer(config.open_viewer);
        Self::with_surface(Arc::new(surface), config.render_scale)
    }

    pub fn with_surface(surface: Arc<dyn PrintSurface>, scale: u32) -> Self {
        PrinterState {
            pipeline: ReceiptPipeline::new(surface, scale),
        }
    }

    pub fn pipeline(&self) -> &ReceiptPipeline {
        &self.pipeline
    }
}
