//! # Document Assembly
//!
//! Places a captured bitmap on a single PDF page sized for 80 mm paper.
//!
//! ```text
//! px_to_mm  = 80 mm / logical_width_px
//! height_mm = logical_height_px × px_to_mm        (= 80 × h / w)
//!
//! ┌──────── 80 mm ────────┐
//! │ bitmap at (0, 0),     │
//! │ full page, no margins │  height_mm
//! └───────────────────────┘
//! ```
//!
//! Assembly is synchronous and only ever runs on a finished [`RasterImage`].

use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::raster::RasterImage;

/// Paper width of the target roll.
pub const RECEIPT_WIDTH_MM: f32 = 80.0;

const MM_PER_INCH: f32 = 25.4;

/// A finished, printable document.
#[derive(Debug, Clone)]
pub struct ReceiptDocument {
    /// File name without extension (`receipt-1718000000000`).
    pub file_stem: String,
    pub width_mm: f32,
    pub height_mm: f32,
    /// PDF bytes.
    pub bytes: Vec<u8>,
}

impl ReceiptDocument {
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.file_stem)
    }
}

/// Page size for a bitmap: fixed width, height preserving the aspect ratio.
pub fn page_size_mm(raster: &RasterImage) -> (f32, f32) {
    let px_to_mm = RECEIPT_WIDTH_MM / raster.logical_width().max(1) as f32;
    (RECEIPT_WIDTH_MM, raster.logical_height() as f32 * px_to_mm)
}

/// Builds the single-page PDF for `raster`.
pub fn assemble(raster: &RasterImage) -> RenderResult<ReceiptDocument> {
    let (width_mm, height_mm) = page_size_mm(raster);

    let (doc, page, layer) = PdfDocument::new(
        raster.title(),
        Mm(width_mm),
        Mm(height_mm),
        "Receipt",
    );
    let current_layer = doc.get_page(page).get_layer(layer);

    let image = Image::from(ImageXObject {
        width: Px(raster.width() as usize),
        height: Px(raster.height() as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: raster.to_rgb_bytes(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI = pixels / (mm / 25.4) makes the bitmap span the page exactly.
    let dpi = raster.width() as f32 / (width_mm / MM_PER_INCH);

    image.add_to_layer(
        current_layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| RenderError::Assembly(e.to_string()))?;

    debug!(
        title = raster.title(),
        width_mm,
        height_mm,
        bytes = bytes.len(),
        "Receipt document assembled"
    );

    Ok(ReceiptDocument {
        file_stem: raster.title().to_string(),
        width_mm,
        height_mm,
        bytes,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutElement, ReceiptLayout, TextRun};
    use crate::raster::rasterize;

    fn raster(width_px: u32, height_px: u32) -> RasterImage {
        let layout = ReceiptLayout {
            width_px,
            height_px,
            elements: vec![LayoutElement::Text(TextRun {
                x: 8,
                y: 8,
                size: 1,
                text: "Total".to_string(),
            })],
            title: "receipt-42".to_string(),
        };
        rasterize(&layout, 2).unwrap()
    }

    #[test]
    fn test_page_height_follows_aspect_ratio() {
        let (w, h) = page_size_mm(&raster(300, 450));
        assert_eq!(w, 80.0);
        assert!((h - 120.0).abs() < 1e-3);

        let (_, h) = page_size_mm(&raster(200, 100));
        assert!((h - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_assemble_produces_pdf() {
        let doc = assemble(&raster(300, 450)).unwrap();

        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.file_name(), "receipt-42.pdf");
        assert_eq!(doc.width_mm, 80.0);
        assert!((doc.height_mm - 120.0).abs() < 1e-3);
    }
}
