//! Paints a laid-out symbol onto a [`DrawingSurface`].
//!
//! One pass, in order: transform, modules (bars, dots or hexagons), structural
//! decoration, text. The transform is scoped by a [`TransformGuard`], so it is restored
//! whether the pass completes or a primitive fails.

use crate::consts::{
    CENTER_GUARD_ELEMENTS, HEX_EVEN_ROW_OFFSET, HEX_ODD_ROW_OFFSET, HEX_PITCH_X, HEX_PITCH_Y,
    LEFT_GUARD_ELEMENTS, MAXICODE_CENTER, MAXICODE_RING_RADII, MAXICODE_RING_STROKE,
    QUIET_SPACE_GLYPH, RIGHT_GUARD_ELEMENTS, SUPPLEMENT_GAP_ELEMENTS, UPCA_GUARD_ELEMENTS,
    UPCE_RIGHT_GUARD_ELEMENTS,
};
use crate::error::SurfaceError;
use crate::geometry::row_height;
use crate::options::{BearerStyle, DisplayOptions, TextAlignment, TextPosition};
use crate::surface::{Color, DrawingSurface, Point, Rect, TransformGuard};
use crate::symbol::{BarHeight, Decoration, Element, GuardText, ModuleColor, Symbol, Symbology};
use crate::text::{Layout, TextLayout};

type DrawResult = Result<(), SurfaceError>;

pub fn module_color(color: ModuleColor) -> Color {
    match color {
        ModuleColor::White => Color::WHITE,
        ModuleColor::Cyan => Color::CYAN,
        ModuleColor::Blue => Color::BLUE,
        ModuleColor::Magenta => Color::MAGENTA,
        ModuleColor::Red => Color::RED,
        ModuleColor::Yellow => Color::YELLOW,
        ModuleColor::Green => Color::LIME,
        ModuleColor::Black => Color::BLACK,
    }
}

/// Draw `symbol` with its top-left corner at `origin` (mm).
pub fn render_symbol<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    symbol: &Symbol,
    options: &DisplayOptions,
    layout: &Layout,
    origin: Point,
) -> DrawResult {
    let mut surface = TransformGuard::new(surface);
    let (half_w, half_h) = (layout.width / 2.0, layout.height / 2.0);
    surface.translate(origin.x + half_w, origin.y + half_h);
    surface.rotate(options.rotation.degrees() as f32);
    surface.translate(-half_w, -half_h);

    log::debug!(
        "rendering {} ({} rows) at ({:.3}, {:.3}) mm, rotation {}",
        symbol.symbology,
        symbol.rows.len(),
        origin.x,
        origin.y,
        options.rotation.degrees()
    );

    let painter = Painter {
        symbol,
        options,
        layout,
        element_width: options.element_width(),
    };
    painter.paint(&mut *surface)
}

struct Painter<'a> {
    symbol: &'a Symbol,
    options: &'a DisplayOptions,
    layout: &'a Layout,
    element_width: f32,
}

impl Painter<'_> {
    fn paint<S: DrawingSurface + ?Sized>(&self, surface: &mut S) -> DrawResult {
        let row_bottoms = if self.symbol.symbology.is_fixed_footprint() {
            self.draw_hex_grid(surface)?;
            Vec::new()
        } else {
            self.draw_rows(surface)?
        };

        match self.symbol.symbology.decoration() {
            Decoration::Binder | Decoration::SideBinder => self.draw_binders(surface, &row_bottoms)?,
            Decoration::Bearer => self.draw_bearers(surface, &row_bottoms)?,
            Decoration::None => {}
        }

        if !self.options.text_visible {
            return Ok(());
        }
        match (&self.layout.text, &self.symbol.guard_text) {
            (Some(text), Some(guard)) if self.symbol.symbology.is_guard_bar() => {
                self.draw_guard_text(surface, text, guard)
            }
            (Some(text), _) => self.draw_linear_text(surface, text),
            (None, _) => Ok(()),
        }
    }

    /// MaxiCode: bullseye rings plus one hexagon per dark module.
    fn draw_hex_grid<S: DrawingSurface + ?Sized>(&self, surface: &mut S) -> DrawResult {
        let m = self.options.multiplier();
        let (ox, oy) = (self.layout.structure_x, self.layout.structure_y);
        let color = self.options.bar_color;
        let (cx, cy) = (ox + MAXICODE_CENTER.0 * m, oy + MAXICODE_CENTER.1 * m);
        for radius in MAXICODE_RING_RADII {
            let r = radius * m;
            surface.stroke_oval(
                Rect::new(cx - r, cy - r, cx + r, cy + r),
                MAXICODE_RING_STROKE * m,
                color,
            )?;
        }

        for (row_index, row) in self.symbol.rows.iter().enumerate() {
            let row_offset = if row_index % 2 == 1 {
                HEX_ODD_ROW_OFFSET
            } else {
                HEX_EVEN_ROW_OFFSET
            };
            for (column, _) in row.data().iter().enumerate().filter(|&(_, &b)| b == 1) {
                let cell = Rect::from_xywh(
                    ox + (column as f32 * HEX_PITCH_X + row_offset) * m,
                    oy + (row_index as f32 * HEX_PITCH_Y + HEX_PITCH_Y) * m,
                    HEX_PITCH_Y * m,
                    HEX_PITCH_X * m,
                );
                surface.fill_polygon(&hexagon(cell), color)?;
            }
        }
        Ok(())
    }

    /// Module rows, top to bottom. Returns the bottom edge of each row.
    fn draw_rows<S: DrawingSurface + ?Sized>(&self, surface: &mut S) -> Result<Vec<f32>, SurfaceError> {
        let ew = self.element_width;
        let half_text = self.layout.text_height() / 2.0;
        let scheme = self.symbol.marker_scheme();
        let is_dot = self.symbol.symbology.is_dot();
        let mut color = self.options.bar_color;
        let mut row_top = self.layout.structure_y;
        let mut bottoms = Vec::with_capacity(self.symbol.rows.len());

        for (index, row) in self.symbol.rows.iter().enumerate() {
            let height = row_height(row, self.options);
            let (mut bar_top, mut bar_height) = (row_top, height);
            let mut x = self.layout.bars_x;
            log::trace!("row {index}: {} elements, {:.3} mm high", row.count(), height);

            for element in row.elements(scheme) {
                match element {
                    Element::Height(variant) => {
                        (bar_top, bar_height) = match variant {
                            BarHeight::Normal => (row_top, height),
                            BarHeight::Guard => (row_top, height + half_text),
                            BarHeight::Short => (row_top + half_text, height - half_text),
                        };
                        continue;
                    }
                    Element::Color(module) => {
                        color = module_color(module);
                        self.draw_module(surface, is_dot, x, bar_top, bar_height, color)?;
                    }
                    Element::Mark => {
                        self.draw_module(surface, is_dot, x, bar_top, bar_height, color)?;
                    }
                    Element::Space => {}
                }
                x += ew;
            }
            row_top += height;
            bottoms.push(row_top);
        }
        Ok(bottoms)
    }

    fn draw_module<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        is_dot: bool,
        x: f32,
        top: f32,
        height: f32,
        color: Color,
    ) -> DrawResult {
        let rect = Rect::from_xywh(x, top, self.element_width, height);
        if is_dot {
            surface.fill_oval(rect, color)
        } else {
            surface.fill_rect(rect, color)
        }
    }

    /// Codablock-F, Code 16K and Code 49 binders with a separator between rows.
    fn draw_binders<S: DrawingSurface + ?Sized>(&self, surface: &mut S, row_bottoms: &[f32]) -> DrawResult {
        let ew = self.element_width;
        let color = self.options.bar_color;
        let left = self.layout.structure_x;
        let right = left + self.layout.geometry.width;
        let top = self.layout.structure_y;
        let bottom = row_bottoms.last().copied().unwrap_or(top);

        let (sep_left, sep_right) = match self.symbol.symbology.decoration() {
            Decoration::SideBinder => (self.layout.bars_x, right - 2.0 * ew),
            _ => {
                let inset = self.symbol.elements_per_character as f32 * ew;
                (left + inset, right - inset - 3.0 * ew)
            }
        };

        surface.stroke_line(
            Point::new(left, top + ew / 2.0),
            Point::new(right, top + ew / 2.0),
            ew,
            color,
        )?;
        if let Some((_, inner)) = row_bottoms.split_last() {
            for &y in inner {
                surface.stroke_line(Point::new(sep_left, y), Point::new(sep_right, y), ew, color)?;
            }
        }
        surface.stroke_line(
            Point::new(left, bottom + ew / 2.0),
            Point::new(right, bottom + ew / 2.0),
            ew,
            color,
        )
    }

    /// ITF-14 bearer bars or bearer box.
    fn draw_bearers<S: DrawingSurface + ?Sized>(&self, surface: &mut S, row_bottoms: &[f32]) -> DrawResult {
        let bw = self.layout.geometry.bearer_width;
        if self.options.bearer_style == BearerStyle::None || bw <= 0.0 {
            return Ok(());
        }
        let color = self.options.bar_color;
        let left = self.layout.structure_x;
        let right = left + self.layout.geometry.width;
        let top = self.layout.structure_y + bw / 2.0;
        let bottom = row_bottoms.last().copied().unwrap_or(self.layout.structure_y) + bw / 2.0;

        if self.options.bearer_style == BearerStyle::Rectangle {
            let outline = [
                Point::new(left + bw / 2.0, top),
                Point::new(right - bw / 2.0, top),
                Point::new(right - bw / 2.0, bottom),
                Point::new(left + bw / 2.0, bottom),
            ];
            surface.stroke_polygon(&outline, bw, color)
        } else {
            surface.stroke_line(Point::new(left, top), Point::new(right, top), bw, color)?;
            surface.stroke_line(Point::new(left, bottom), Point::new(right, bottom), bw, color)
        }
    }

    /// EAN/UPC digits: leading character, digits centred in their cells, trailing
    /// character, then any add-on text above the add-on bars.
    fn draw_guard_text<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &TextLayout,
        guard: &GuardText,
    ) -> DrawResult {
        let ew = self.element_width;
        let size = text.font_size;
        let color = self.options.text_color;
        let composite = self.options.composite;
        let symbology = self.symbol.symbology;
        let segment = guard.elements_per_character as f32 * ew;
        let text_top = self.layout.structure_y + self.layout.geometry.height;
        let baseline = text_top + text.ascent;

        let left_guard = if symbology == Symbology::UpcA {
            UPCA_GUARD_ELEMENTS
        } else {
            LEFT_GUARD_ELEMENTS
        };
        let left_text_x = (self.layout.geometry.linear_shift_count + left_guard) as f32 * ew
            + self.layout.bars_x;

        if !guard.left_character.is_empty() {
            let x = if composite { ew } else { 0.0 };
            surface.draw_text(&guard.left_character, Point::new(x, baseline), size, color)?;
        }

        let mut x = self.draw_cells(surface, &guard.left_text, left_text_x, segment, baseline, size)?;
        if !guard.right_text.is_empty() {
            let start = left_text_x
                + segment * guard.left_text.chars().count() as f32
                + CENTER_GUARD_ELEMENTS as f32 * ew;
            x = self.draw_cells(surface, &guard.right_text, start, segment, baseline, size)?;
        }

        let right_guard = match symbology {
            Symbology::UpcA => UPCA_GUARD_ELEMENTS,
            Symbology::UpcE => UPCE_RIGHT_GUARD_ELEMENTS,
            _ => RIGHT_GUARD_ELEMENTS,
        };
        x += right_guard as f32 * ew;
        if composite {
            x -= ew;
        }
        if !guard.right_character.is_empty() {
            surface.draw_text(&guard.right_character, Point::new(x, baseline), size, color)?;
        }

        if !guard.supplement_text.is_empty() {
            let width = surface.measure_text(&guard.supplement_text, size);
            x += SUPPLEMENT_GAP_ELEMENTS as f32 * ew
                + (guard.supplement_width as f32 * ew - width) / 2.0;
            // Top of the add-on bars, not the main text line.
            let top = text_top - self.options.bar_height();
            let baseline = top + text.ascent;
            surface.draw_text(&guard.supplement_text, Point::new(x, baseline), size, color)?;

            let mut quiet_x = self.layout.width - text.left_character_width + ew;
            if composite {
                quiet_x -= ew;
            }
            surface.draw_text(QUIET_SPACE_GLYPH, Point::new(quiet_x, baseline), size, color)?;
        }
        Ok(())
    }

    /// Draw each character centred in its own `segment`-wide cell. Returns the x after the
    /// last cell.
    fn draw_cells<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        mut x: f32,
        segment: f32,
        baseline: f32,
        size: f32,
    ) -> Result<f32, SurfaceError> {
        let color = self.options.text_color;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let ch = ch.encode_utf8(&mut buf);
            let width = surface.measure_text(ch, size);
            surface.draw_text(ch, Point::new(x + (segment - width) / 2.0, baseline), size, color)?;
            x += segment;
        }
        Ok(x)
    }

    fn draw_linear_text<S: DrawingSurface + ?Sized>(&self, surface: &mut S, text: &TextLayout) -> DrawResult {
        let layout = self.layout;
        let top = match self.options.text_position {
            TextPosition::Above => 0.0,
            TextPosition::Below => layout.geometry.height + self.options.text_margin(),
        };
        let baseline = top + text.ascent;

        let mut alignment = self.options.text_alignment;
        if alignment == TextAlignment::Stretched && text.width > layout.geometry.width {
            alignment = TextAlignment::Center;
        }

        let x = match alignment {
            TextAlignment::Left => 0.0,
            TextAlignment::Right => layout.width - text.width,
            TextAlignment::Center => (layout.width - text.width) / 2.0,
            TextAlignment::Stretched => {
                let count = text.text.chars().count();
                if count > 0 {
                    let segment = layout.width / count as f32;
                    self.draw_cells(surface, &text.text, 0.0, segment, baseline, text.font_size)?;
                }
                return Ok(());
            }
        };
        surface.draw_text(&text.text, Point::new(x, baseline), text.font_size, self.options.text_color)
    }
}

/// Six points of a pointy-top hexagon inscribed in `cell`.
fn hexagon(cell: Rect) -> [Point; 6] {
    let (w, h) = (cell.width(), cell.height());
    let mid_x = cell.left + w * 0.5;
    [
        Point::new(mid_x, cell.top),
        Point::new(cell.right, cell.top + h * 0.25),
        Point::new(cell.right, cell.top + h * 0.75),
        Point::new(mid_x, cell.bottom),
        Point::new(cell.left, cell.top + h * 0.75),
        Point::new(cell.left, cell.top + h * 0.25),
    ]
}
