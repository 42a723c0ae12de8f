//! Human-readable text sizing and the combined symbol footprint.
//!
//! Linear symbols shrink their font from the configured size until the text fits the
//! bars. EAN/UPC symbols grow it from near zero until the left-hand digits fill the
//! space between the guards, then back off one step.

use crate::consts::{GUARD_CHARACTER_ELEMENTS, GUARD_FIT_STEP, MIN_FONT_SIZE, SHRINK_STEP};
use crate::geometry::{measure_symbol, SymbolGeometry};
use crate::options::{DisplayOptions, TextPosition};
use crate::surface::{FontMetrics, TextMeasurer};
use crate::symbol::{GuardText, Symbol};

// Upper bound for the guard-fit search when a measurer reports no width.
const MAX_GUARD_FONT_SIZE: f32 = 500.0;

/// Fitted text: string, size and extent in mm.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    pub text: String,
    pub font_size: f32,
    pub width: f32,
    pub height: f32,
    pub ascent: f32,
    /// Width of the EAN/UPC leading character; zero otherwise.
    pub left_character_width: f32,
}

impl TextLayout {
    fn measured<M: TextMeasurer + ?Sized>(text: String, font_size: f32, measurer: &M) -> Self {
        let width = measurer.measure_text(&text, font_size);
        let metrics: FontMetrics = measurer.font_metrics(font_size);
        Self {
            text,
            font_size,
            width,
            height: metrics.height(),
            ascent: metrics.ascent,
            left_character_width: 0.0,
        }
    }
}

/// Display string for a linear symbol.
pub fn human_readable_text(symbol: &Symbol, options: &DisplayOptions) -> String {
    let mut text = symbol.barcode_text.clone();
    if options.show_check_digit && !symbol.check_digit_text.is_empty() {
        text.push_str(&symbol.check_digit_text);
    }
    if symbol.symbology.has_text_delimiters() {
        text = format!("*{text}*");
    }
    text
}

/// Shrink-fit the linear text to `symbol_width`.
pub fn fit_linear_text<M: TextMeasurer + ?Sized>(
    text: String,
    font_size: f32,
    symbol_width: f32,
    measurer: &M,
) -> TextLayout {
    let mut layout = TextLayout::measured(text, font_size, measurer);
    while layout.width > symbol_width && layout.font_size > MIN_FONT_SIZE {
        let size = (layout.font_size - SHRINK_STEP).max(MIN_FONT_SIZE);
        layout = TextLayout::measured(layout.text, size, measurer);
    }
    log::debug!(
        "linear text {:?} fitted at {:.1} ({:.3} mm wide, bars {:.3} mm)",
        layout.text,
        layout.font_size,
        layout.width,
        symbol_width
    );
    layout
}

/// Grow-fit the EAN/UPC left-hand digits between the guard bars.
pub fn fit_guard_text<M: TextMeasurer + ?Sized>(
    guard: &GuardText,
    options: &DisplayOptions,
    measurer: &M,
) -> TextLayout {
    let start = options.multiplier();
    let max_width = GUARD_CHARACTER_ELEMENTS
        * options.element_width()
        * guard.left_text.chars().count() as f32;

    let mut size = start;
    loop {
        size += GUARD_FIT_STEP;
        let width = measurer.measure_text(&guard.left_text, size);
        if width >= max_width || size >= MAX_GUARD_FONT_SIZE {
            break;
        }
    }
    size -= GUARD_FIT_STEP;

    let mut layout = TextLayout::measured(guard.left_text.clone(), size, measurer);
    if !guard.left_character.is_empty() {
        layout.left_character_width = measurer.measure_text(&guard.left_character, size);
    }
    log::debug!(
        "guard text {:?} fitted at {:.1} ({:.3} mm of {:.3} mm)",
        guard.left_text,
        size,
        layout.width,
        max_width
    );
    layout
}

/// Complete footprint of a symbol and its text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub geometry: SymbolGeometry,
    /// Fitted text, when any is laid out.
    pub text: Option<TextLayout>,
    pub width: f32,
    pub height: f32,
    /// Left edge of the structural box (bars, binders, bearers).
    pub structure_x: f32,
    /// Top edge of the structural box; non-zero when linear text sits above.
    pub structure_y: f32,
    /// X of the first module column.
    pub bars_x: f32,
}

impl Layout {
    pub fn text_height(&self) -> f32 {
        self.text.as_ref().map_or(0.0, |t| t.height)
    }
}

/// Lay out `symbol`: structure first, then text around it.
pub fn layout_symbol<M: TextMeasurer + ?Sized>(
    symbol: &Symbol,
    options: &DisplayOptions,
    measurer: &M,
) -> Layout {
    let geometry = measure_symbol(symbol, options);
    let mut layout = Layout {
        geometry,
        width: geometry.width,
        height: geometry.height,
        bars_x: geometry.first_bar_x,
        ..Layout::default()
    };

    match &symbol.guard_text {
        Some(guard) if symbol.symbology.is_guard_bar() => {
            let text = fit_guard_text(guard, options, measurer);
            let lcw = text.left_character_width;
            layout.height += text.height;
            if lcw > 0.0 {
                layout.bars_x = lcw - geometry.linear_shift();
                layout.structure_x = layout.bars_x;
                layout.width += lcw - geometry.linear_shift();
            }
            // Room for a trailing character right of the symbol.
            layout.width += lcw;
            layout.text = Some(text);
        }
        _ if options.text_visible && !symbol.barcode_text.is_empty() => {
            let text = fit_linear_text(
                human_readable_text(symbol, options),
                options.font_size(),
                geometry.width,
                measurer,
            );
            layout.height += options.text_margin() + text.height;
            if text.width > geometry.width {
                let offset = (text.width - geometry.width) / 2.0;
                layout.structure_x = offset;
                layout.bars_x += offset;
                layout.width = text.width;
            }
            if options.text_position == TextPosition::Above {
                layout.structure_y = text.height + options.text_margin();
            }
            layout.text = Some(text);
        }
        _ => {}
    }

    log::debug!(
        "{} total size {:.3} x {:.3} mm, bars at x {:.3}",
        symbol.symbology,
        layout.width,
        layout.height,
        layout.bars_x
    );
    layout
}
