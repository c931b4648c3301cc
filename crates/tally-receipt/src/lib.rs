//! # tally-receipt: Receipt Rendering & Print Pipeline
//!
//! Turns an order (or the sales report) into an 80 mm document and hands it
//! to a print surface.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Order + Settings                                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌──────────────┐   │
//! │  │  layout    │──►│  raster    │──►│  document  │──►│  dispatch    │   │
//! │  │ text runs  │   │ font8x8 →  │   │ printpdf   │   │ PrintSurface │   │
//! │  │ logical px │   │ GrayImage  │   │ 80 mm page │   │ viewer/save  │   │
//! │  └────────────┘   └────────────┘   └────────────┘   └──────────────┘   │
//! │      sync          async capture        sync          blocking task     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally_receipt::{ReceiptPipeline, SystemPrintSurface};
//!
//! let surface = SystemPrintSurface::new(spool_dir, downloads_dir);
//! let pipeline = ReceiptPipeline::new(Arc::new(surface), 2);
//! let outcome = pipeline.print_receipt(&order, &settings).await;
//! ```

pub mod dispatch;
pub mod document;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod raster;

pub use dispatch::{PrintOutcome, PrintSurface, SystemPrintSurface};
pub use document::{ReceiptDocument, RECEIPT_WIDTH_MM};
pub use error::{RenderError, RenderResult};
pub use layout::{receipt_layout, report_layout, ReceiptLayout};
pub use pipeline::ReceiptPipeline;
pub use raster::{RasterImage, MIN_RENDER_SCALE};

#[cfg(any(test, feature = "test-support"))]
pub use dispatch::RecordingSurface;
