//! # Raster Capture
//!
//! Paints a [`ReceiptLayout`] into a grayscale bitmap.
//!
//! ```text
//! capture(layout, scale).await
//!     │
//!     │  layout moved into tokio::task::spawn_blocking
//!     ▼
//! rasterize(): white canvas (width×scale, height×scale)
//!     ├── TextRun  → font8x8 glyphs, each bit a (size×scale)² black block
//!     └── Rule     → dashed line, `scale` pixels thick
//!     │
//!     ▼
//! RasterImage (immutable)  ──► document::assemble
//! ```
//!
//! Scale never drops below [`MIN_RENDER_SCALE`]; thermal printers upscale
//! anything coarser into mush.

use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, LATIN_FONTS};
use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::layout::{LayoutElement, ReceiptLayout, TextRun, GLYPH_PX, MARGIN_PX};

/// Smallest supported device-pixel ratio.
pub const MIN_RENDER_SCALE: u32 = 2;

/// Largest bitmap edge the rasterizer will allocate.
pub const MAX_RASTER_EDGE_PX: u32 = 16_384;

const INK: Luma<u8> = Luma([0]);
const PAPER: Luma<u8> = Luma([255]);

const DASH_PX: u32 = 4;
const DASH_GAP_PX: u32 = 2;

/// A captured receipt bitmap. Cannot be modified once produced.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: GrayImage,
    scale: u32,
    title: String,
}

impl RasterImage {
    /// Device pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Device pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn logical_width(&self) -> u32 {
        self.width() / self.scale
    }

    pub fn logical_height(&self) -> u32 {
        self.height() / self.scale
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Packed 8-bit RGB, row-major, as the document assembler embeds it.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        DynamicImage::ImageLuma8(self.pixels.clone())
            .to_rgb8()
            .into_raw()
    }

    /// Number of inked pixels; handy for sanity checks.
    pub fn ink_pixels(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[0] < 128).count()
    }
}

/// Renders `layout` off the async runtime and waits for the bitmap.
pub async fn capture(layout: ReceiptLayout, scale: u32) -> RenderResult<RasterImage> {
    tokio::task::spawn_blocking(move || rasterize(&layout, scale))
        .await
        .map_err(|e| RenderError::Capture(e.to_string()))?
}

/// Synchronous rasterizer behind [`capture`].
pub fn rasterize(layout: &ReceiptLayout, scale: u32) -> RenderResult<RasterImage> {
    let scale = scale.max(MIN_RENDER_SCALE);
    let width = layout.width_px.saturating_mul(scale);
    let height = layout.height_px.saturating_mul(scale);

    if width == 0 || height == 0 || width > MAX_RASTER_EDGE_PX || height > MAX_RASTER_EDGE_PX {
        return Err(RenderError::TooLarge { width, height });
    }

    let mut canvas = GrayImage::from_pixel(width, height, PAPER);

    for element in &layout.elements {
        match element {
            LayoutElement::Text(run) => draw_text(&mut canvas, run, scale),
            LayoutElement::Rule { y } => draw_rule(&mut canvas, layout.width_px, *y, scale),
        }
    }

    debug!(width, height, scale, title = %layout.title, "Receipt rasterized");

    Ok(RasterImage {
        pixels: canvas,
        scale,
        title: layout.title.clone(),
    })
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(canvas: &mut GrayImage, run: &TextRun, scale: u32) {
    let cell = GLYPH_PX * run.size;
    let dot = run.size * scale;

    for (i, c) in run.text.chars().enumerate() {
        let origin_x = (run.x + i as u32 * cell) * scale;
        let origin_y = run.y * scale;

        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..8u32 {
                // font8x8 stores the leftmost pixel in the low bit.
                if bits & (1 << col) != 0 {
                    fill(
                        canvas,
                        origin_x + col * dot,
                        origin_y + row as u32 * dot,
                        dot,
                        dot,
                    );
                }
            }
        }
    }
}

fn draw_rule(canvas: &mut GrayImage, width_px: u32, y: u32, scale: u32) {
    let end = width_px.saturating_sub(MARGIN_PX);
    let mut x = MARGIN_PX;
    while x < end {
        let dash = DASH_PX.min(end - x);
        fill(canvas, x * scale, y * scale, dash * scale, scale);
        x += DASH_PX + DASH_GAP_PX;
    }
}

/// Fills a rectangle, clipped to the canvas.
fn fill(canvas: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, INK);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
