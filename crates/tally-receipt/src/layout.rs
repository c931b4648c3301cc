//! # Receipt Layout
//!
//! Turns an order (or a report) plus settings into positioned text runs in
//! logical pixels. Nothing here touches pixels; see [`raster`](crate::raster).
//!
//! ## Receipt Structure
//! ```text
//! ┌──────────────────────────────┐  ◄── receipt_width_px (logical)
//! │          DYAD CAFE           │  shop name, double size
//! │        Order Receipt         │  header message
//! │ Order #        1718000000000 │
//! │ Staff                  Ahmed │
//! │ Date        10/06/2024 09:13 │
//! │ - - - - - - - - - - - - - -  │
//! │ Latte              x2  54.00 │
//! │   + Size: Large (+5.00)      │  addon sub-line
//! │ - - - - - - - - - - - - - -  │
//! │ TOTAL              54.00 SAR │
//! │ - - - - - - - - - - - - - -  │
//! │  Thank you for your visit!   │
//! │    WiFi: DyadCafe_Guest      │
//! └──────────────────────────────┘
//! ```
//!
//! Glyphs are 8×8 logical pixels per size step, so a 300 px receipt holds
//! 35 body characters per line. Long names wrap.

use chrono::{DateTime, Local, Utc};
use tally_core::{DailyReport, Money, Order, Settings};

/// Logical size of one glyph cell at text size 1.
pub const GLYPH_PX: u32 = 8;

/// Horizontal margin on both sides.
pub const MARGIN_PX: u32 = 8;

/// Narrowest receipt the layout will produce.
pub const MIN_RECEIPT_WIDTH_PX: u32 = 160;

/// Widest receipt the layout will produce.
pub const MAX_RECEIPT_WIDTH_PX: u32 = 1200;

const LINE_GAP_PX: u32 = 4;
const ADDON_INDENT_PX: u32 = 16;

// =============================================================================
// Layout Types
// =============================================================================

/// A run of text at a logical position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub x: u32,
    pub y: u32,
    /// Glyph scale: 1 = 8 px cells, 2 = 16 px cells.
    pub size: u32,
    pub text: String,
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutElement {
    Text(TextRun),
    /// Dashed separator across the printable width.
    Rule { y: u32 },
}

/// A fully positioned receipt, ready to rasterize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLayout {
    pub width_px: u32,
    pub height_px: u32,
    pub elements: Vec<LayoutElement>,
    /// Used for the document title and file name.
    pub title: String,
}

impl ReceiptLayout {
    /// Text runs in drawing order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            LayoutElement::Text(run) => Some(run),
            LayoutElement::Rule { .. } => None,
        })
    }

    /// Visible lines, with runs on the same baseline joined by a single space.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<(u32, String)> = Vec::new();
        for run in self.text_runs() {
            match lines.last_mut() {
                Some((y, line)) if *y == run.y => {
                    line.push(' ');
                    line.push_str(&run.text);
                }
                _ => lines.push((run.y, run.text.clone())),
            }
        }
        lines.into_iter().map(|(_, line)| line).collect()
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Lays out a customer receipt.
pub fn receipt_layout(order: &Order, settings: &Settings) -> ReceiptLayout {
    let symbol = settings.currency_symbol.as_str();
    let mut b = LayoutBuilder::new(settings.receipt_width_px);

    b.centered(&settings.shop_name, 2);
    if !settings.header_message.trim().is_empty() {
        b.centered(&settings.header_message, 1);
    }
    b.gap(GLYPH_PX);

    b.left_right("Order #", order.number(), 1);
    b.left_right("Staff", &order.staff_name, 1);
    b.left_right("Date", &format_timestamp(order.timestamp), 1);
    b.rule();

    for item in &order.items {
        let right = format!("x{}  {}", item.quantity, item.total_price);
        b.left_right(&item.product_name, &right, 1);
        for addon in &item.selected_addons {
            let line = if addon.price_adjustment.is_zero() {
                format!("+ {}: {}", addon.category_name, addon.option_name)
            } else {
                format!(
                    "+ {}: {} ({})",
                    addon.category_name,
                    addon.option_name,
                    signed(addon.price_adjustment)
                )
            };
            b.left(&line, 1, ADDON_INDENT_PX);
        }
    }
    b.rule();

    b.left_right("TOTAL", &order.total_amount.format_with_symbol(symbol), 1);
    b.rule();

    if !settings.footer_message.trim().is_empty() {
        b.centered(&settings.footer_message, 1);
    }
    if !settings.wifi_ssid.trim().is_empty() {
        b.gap(LINE_GAP_PX);
        b.centered(&format!("WiFi: {}", settings.wifi_ssid), 1);
        if !settings.wifi_password.is_empty() {
            b.centered(&format!("Password: {}", settings.wifi_password), 1);
        }
    }

    b.finish(format!("receipt-{}", order.number()))
}

/// Lays out the per-staff sales report.
pub fn report_layout(report: &DailyReport, settings: &Settings) -> ReceiptLayout {
    let symbol = settings.currency_symbol.as_str();
    let mut b = LayoutBuilder::new(settings.receipt_width_px);

    b.centered(&settings.shop_name, 2);
    b.centered("Sales Report", 1);
    b.centered(&format_timestamp(report.generated_at), 1);
    b.rule();

    if report.is_empty() {
        b.centered("No orders yet", 1);
    } else {
        for sales in &report.staff_sales {
            b.left_right(
                &sales.staff_name,
                &sales.total_amount.format_with_symbol(symbol),
                1,
            );
            b.left(&format!("{} orders", sales.order_count), 1, ADDON_INDENT_PX);
        }
    }
    b.rule();

    b.left_right("TOTAL", &report.total_amount.format_with_symbol(symbol), 1);
    b.left_right("Orders", &report.order_count.to_string(), 1);

    b.finish(format!(
        "report-{}",
        report.generated_at.with_timezone(&Local).format("%Y%m%d-%H%M%S")
    ))
}

/// Receipt date format: `dd/mm/yyyy HH:MM` in local time.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

fn signed(amount: Money) -> String {
    if amount.is_negative() {
        amount.to_string()
    } else {
        format!("+{}", amount)
    }
}

// =============================================================================
// Layout Builder
// =============================================================================

struct LayoutBuilder {
    width: u32,
    cursor_y: u32,
    elements: Vec<LayoutElement>,
}

impl LayoutBuilder {
    fn new(width_px: u32) -> Self {
        LayoutBuilder {
            width: width_px.clamp(MIN_RECEIPT_WIDTH_PX, MAX_RECEIPT_WIDTH_PX),
            cursor_y: MARGIN_PX,
            elements: Vec::new(),
        }
    }

    fn columns(&self, size: u32, indent: u32) -> usize {
        let usable = self.width.saturating_sub(2 * MARGIN_PX + indent);
        ((usable / (GLYPH_PX * size)) as usize).max(1)
    }

    fn text_width(text: &str, size: u32) -> u32 {
        text.chars().count() as u32 * GLYPH_PX * size
    }

    fn push_text(&mut self, x: u32, size: u32, text: String) {
        self.elements.push(LayoutElement::Text(TextRun {
            x,
            y: self.cursor_y,
            size,
            text,
        }));
    }

    fn advance(&mut self, size: u32) {
        self.cursor_y += GLYPH_PX * size + LINE_GAP_PX;
    }

    fn centered(&mut self, text: &str, size: u32) {
        for line in wrap(text, self.columns(size, 0)) {
            let x = self.width.saturating_sub(Self::text_width(&line, size)) / 2;
            self.push_text(x, size, line);
            self.advance(size);
        }
    }

    fn left(&mut self, text: &str, size: u32, indent: u32) {
        for line in wrap(text, self.columns(size, indent)) {
            self.push_text(MARGIN_PX + indent, size, line);
            self.advance(size);
        }
    }

    /// Left text wraps in the space the right text leaves free; the right
    /// text sits on the first line, flush with the right margin.
    fn left_right(&mut self, left: &str, right: &str, size: u32) {
        let right_cols = right.chars().count();
        let left_cols = self.columns(size, 0).saturating_sub(right_cols + 1).max(1);
        let right_x = self
            .width
            .saturating_sub(MARGIN_PX + Self::text_width(right, size));

        for (i, line) in wrap(left, left_cols).into_iter().enumerate() {
            self.push_text(MARGIN_PX, size, line);
            if i == 0 {
                self.push_text(right_x, size, right.to_string());
            }
            self.advance(size);
        }
    }

    fn rule(&mut self) {
        self.elements.push(LayoutElement::Rule {
            y: self.cursor_y + GLYPH_PX / 2,
        });
        self.advance(1);
    }

    fn gap(&mut self, px: u32) {
        self.cursor_y += px;
    }

    fn finish(self, title: String) -> ReceiptLayout {
        ReceiptLayout {
            width_px: self.width,
            height_px: self.cursor_y + MARGIN_PX,
            elements: self.elements,
            title,
        }
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut line = String::new();

    for token in text.split_whitespace() {
        let mut token: Vec<char> = token.chars().collect();

        while token.len() > width {
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            out.push(token.drain(..width).collect());
        }
        let token: String = token.into_iter().collect();
        if token.is_empty() {
            continue;
        }

        if line.is_empty() {
            line = token;
        } else if line.chars().count() + 1 + token.chars().count() > width {
            out.push(std::mem::replace(&mut line, token));
        } else {
            line.push(' ');
            line.push_str(&token);
        }
    }

    if !line.is_empty() {
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
