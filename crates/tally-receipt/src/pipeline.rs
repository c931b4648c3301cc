//! # Receipt Pipeline
//!
//! Runs layout → capture → assembly → dispatch for one print request.
//!
//! ```text
//! print_receipt(order, settings)
//!   1. layout::receipt_layout      sync, owns copies of everything it needs
//!   2. raster::capture             async (blocking task), awaited
//!   3. document::assemble          sync, strictly after 2
//!   4. PrintSurface::dispatch      blocking task
//!   └─► PrintOutcome               any RenderError → warn! + Failed
//! ```
//!
//! The layout copies the order's data before the first await, so a print
//! in flight never sees later edits to the session. Several prints may run
//! at once; they share nothing but the surface.

use std::sync::Arc;

use tally_core::{DailyReport, Order, Settings};
use tracing::{info, warn};

use crate::dispatch::{PrintOutcome, PrintSurface};
use crate::document::{assemble, ReceiptDocument};
use crate::error::{RenderError, RenderResult};
use crate::layout::{receipt_layout, report_layout, ReceiptLayout};
use crate::raster::{capture, MIN_RENDER_SCALE};

#[derive(Clone)]
pub struct ReceiptPipeline {
    surface: Arc<dyn PrintSurface>,
    scale: u32,
}

impl std::fmt::Debug for ReceiptPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptPipeline")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl ReceiptPipeline {
    /// `scale` is clamped to at least [`MIN_RENDER_SCALE`].
    pub fn new(surface: Arc<dyn PrintSurface>, scale: u32) -> Self {
        ReceiptPipeline {
            surface,
            scale: scale.max(MIN_RENDER_SCALE),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Prints a customer receipt.
    pub async fn print_receipt(&self, order: &Order, settings: &Settings) -> PrintOutcome {
        let layout = receipt_layout(order, settings);
        let outcome = self.print_layout(layout).await;
        log_outcome(&order.id, &outcome);
        outcome
    }

    /// Prints the per-staff sales report.
    pub async fn print_report(&self, report: &DailyReport, settings: &Settings) -> PrintOutcome {
        let layout = report_layout(report, settings);
        let outcome = self.print_layout(layout).await;
        log_outcome("report", &outcome);
        outcome
    }

    /// Renders a receipt without dispatching it.
    pub async fn render_receipt(&self, order: &Order, settings: &Settings) -> RenderResult<ReceiptDocument> {
        self.render(receipt_layout(order, settings)).await
    }

    async fn render(&self, layout: ReceiptLayout) -> RenderResult<ReceiptDocument> {
        let raster = capture(layout, self.scale).await?;
        assemble(&raster)
    }

    async fn print_layout(&self, layout: ReceiptLayout) -> PrintOutcome {
        let document = match self.render(layout).await {
            Ok(document) => document,
            Err(err) => {
                warn!(error = %err, "Receipt render failed");
                return PrintOutcome::failed(err);
            }
        };

        let surface = Arc::clone(&self.surface);
        tokio::task::spawn_blocking(move || surface.dispatch(&document))
            .await
            .unwrap_or_else(|e| {
                let err = RenderError::Dispatch(e.to_string());
                warn!(error = %err, "Print dispatch task failed");
                PrintOutcome::failed(err)
            })
    }
}

fn log_outcome(subject: &str, outcome: &PrintOutcome) {
    match outcome {
        PrintOutcome::Displayed { path } => {
            info!(subject, path = %path.display(), "Printed (viewer)")
        }
        PrintOutcome::Downloaded { path } => {
            info!(subject, path = %path.display(), "Printed (saved)")
        }
        PrintOutcome::Failed { reason } => warn!(subject, reason = %reason, "Print failed"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
