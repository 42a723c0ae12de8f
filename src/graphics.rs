//! Raster output: a tiny-skia [`Pixmap`] behind the [`DrawingSurface`] trait, with
//! rusttype glyph outlines for text.
//!
//! Drawing happens in millimetres; the base transform scales to pixels at the surface
//! DPI. Text is put in visual order first (bidi runs, Arabic runs reshaped) so
//! mixed-direction labels come out readable.

use ar_reshaper::{ArabicReshaper, ReshaperConfig};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use rusttype::{point, Font, OutlineBuilder, Scale};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};
use unicode_bidi::BidiInfo;

use crate::consts::MM_PER_INCH;
use crate::error::SurfaceError;
use crate::surface::{Color, DrawingSurface, FontMetrics, Point, Rect, TextMeasurer};

// Transform terms below this count as zero when deciding whether a rect stays axis-aligned.
const AXIS_EPSILON: f32 = 1e-4;

/// Visual-order string: bidi runs in display order, RTL runs reshaped and reversed.
pub fn bidi_then_shape(text: &str, reshaper: &ArabicReshaper) -> String {
    let info = BidiInfo::new(text, None);
    let Some(para) = info.paragraphs.first() else {
        return text.to_string();
    };
    let (levels, runs) = info.visual_runs(para, para.range.clone());

    let mut out = String::with_capacity(text.len());
    for (level, range) in levels.into_iter().zip(runs) {
        let slice = &text[range];
        if level.is_rtl() {
            out.extend(reshaper.reshape(slice).chars().rev());
        } else {
            out.push_str(slice);
        }
    }
    out
}

/// A TrueType/OpenType font used for measuring and drawing text.
pub struct TextFont {
    font: Font<'static>,
    reshaper: ArabicReshaper,
}

impl TextFont {
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, SurfaceError> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| SurfaceError::new("font data could not be parsed"))?;
        Ok(Self {
            font,
            reshaper: ArabicReshaper::new(ReshaperConfig::default()),
        })
    }

    pub fn visual(&self, text: &str) -> String {
        bidi_then_shape(text, &self.reshaper)
    }

    /// Advance width of the already-shaped `visual` string, kerning included.
    fn advance(&self, visual: &str, scale: Scale) -> f32 {
        let mut width = 0.0;
        let mut previous = None;
        for glyph in self.font.glyphs_for(visual.chars()) {
            let glyph = glyph.scaled(scale);
            if let Some(previous) = previous {
                width += self.font.pair_kerning(scale, previous, glyph.id());
            }
            width += glyph.h_metrics().advance_width;
            previous = Some(glyph.id());
        }
        width
    }
}

impl TextMeasurer for TextFont {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.advance(&self.visual(text), Scale::uniform(size))
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        let vm = self.font.v_metrics(Scale::uniform(size));
        FontMetrics {
            ascent: vm.ascent,
            descent: -vm.descent,
        }
    }
}

/// Feeds rusttype glyph outlines (already y-down) into a tiny-skia path, offset to the
/// glyph's pen position.
struct GlyphOutline<'a> {
    builder: &'a mut PathBuilder,
    dx: f32,
    dy: f32,
}

impl OutlineBuilder for GlyphOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x + self.dx, y + self.dy);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x + self.dx, y + self.dy);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(x1 + self.dx, y1 + self.dy, x + self.dx, y + self.dy);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 + self.dx,
            y1 + self.dy,
            x2 + self.dx,
            y2 + self.dy,
            x + self.dx,
            y + self.dy,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = anti_alias;
    paint
}

fn polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(
        rect.left.min(rect.right),
        rect.top.min(rect.bottom),
        rect.left.max(rect.right),
        rect.top.max(rect.bottom),
    )
}

/// Whole-pixel span `[lo, hi)` covering `a..b`, never narrower than one pixel.
fn snap_span(a: f32, b: f32) -> (f32, f32) {
    let lo = a.min(b).round();
    let hi = a.max(b).round();
    if hi <= lo {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}

/// RGBA canvas addressed in millimetres.
pub struct RasterSurface {
    pixmap: Pixmap,
    px_per_mm: f32,
    transform: Transform,
    stack: Vec<Transform>,
    font: Option<TextFont>,
}

impl RasterSurface {
    /// White canvas of `width` x `height` pixels at `dpi`.
    pub fn new(width: u32, height: u32, dpi: f32) -> Result<Self, SurfaceError> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            SurfaceError::new(format!("cannot allocate a {width}x{height} canvas"))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        let px_per_mm = dpi / MM_PER_INCH;
        Ok(Self {
            pixmap,
            px_per_mm,
            transform: Transform::from_scale(px_per_mm, px_per_mm),
            stack: Vec::new(),
            font: None,
        })
    }

    pub fn with_font(mut self, font: TextFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.pixmap.width(), self.pixmap.height(), |x, y| {
            let c = self
                .pixmap
                .pixel(x, y)
                .map(|p| p.demultiply())
                .unwrap_or(tiny_skia::ColorU8::from_rgba(255, 255, 255, 255));
            Rgba([c.red(), c.green(), c.blue(), c.alpha()])
        })
    }

    pub fn into_image(self) -> RgbaImage {
        self.to_rgba_image()
    }

    /// Hard-threshold to black and white: 0 = ink, 255 = paper.
    pub fn to_gray_1bit(&self) -> GrayImage {
        let image = self.to_rgba_image();
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let luma = image.get_pixel(x, y).to_luma().0[0];
            Luma([if luma < 128 { 0 } else { 255 }])
        })
    }

    fn axis_aligned(&self) -> bool {
        let t = self.transform;
        (t.kx.abs() < AXIS_EPSILON && t.ky.abs() < AXIS_EPSILON)
            || (t.sx.abs() < AXIS_EPSILON && t.sy.abs() < AXIS_EPSILON)
    }

    fn to_device(&self, p: Point) -> (f32, f32) {
        let t = self.transform;
        (
            t.sx * p.x + t.kx * p.y + t.tx,
            t.ky * p.x + t.sy * p.y + t.ty,
        )
    }

    fn stroke(&mut self, path: &Path, width: f32, cap: LineCap, color: Color) {
        if width <= 0.0 {
            return;
        }
        let stroke = Stroke {
            width,
            line_cap: cap,
            line_join: LineJoin::Miter,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint(color, true), &stroke, self.transform, None);
    }
}

impl TextMeasurer for RasterSurface {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.font
            .as_ref()
            .map_or(0.0, |font| font.measure_text(text, size))
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        self.font
            .as_ref()
            .map_or_else(FontMetrics::default, |font| font.font_metrics(size))
    }
}

impl DrawingSurface for RasterSurface {
    /// Axis-aligned rects snap to whole device pixels and keep at least one pixel of
    /// width and height, so narrow bars never drop out of the 1-bit output.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        if !self.axis_aligned() {
            if let Some(r) = skia_rect(rect) {
                let path = PathBuilder::from_rect(r);
                self.pixmap.fill_path(
                    &path,
                    &paint(color, true),
                    FillRule::Winding,
                    self.transform,
                    None,
                );
            }
            return Ok(());
        }
        let (x0, y0) = self.to_device(Point::new(rect.left, rect.top));
        let (x1, y1) = self.to_device(Point::new(rect.right, rect.bottom));
        let (left, right) = snap_span(x0, x1);
        let (top, bottom) = snap_span(y0, y1);
        if let Some(r) = tiny_skia::Rect::from_ltrb(left, top, right, bottom) {
            self.pixmap
                .fill_rect(r, &paint(color, false), Transform::identity(), None);
        }
        Ok(())
    }

    fn fill_oval(&mut self, bounds: Rect, color: Color) -> Result<(), SurfaceError> {
        if let Some(path) = skia_rect(bounds).and_then(PathBuilder::from_oval) {
            self.pixmap.fill_path(
                &path,
                &paint(color, true),
                FillRule::Winding,
                self.transform,
                None,
            );
        }
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), SurfaceError> {
        if points.len() < 3 {
            return Ok(());
        }
        if let Some(path) = polygon_path(points) {
            self.pixmap.fill_path(
                &path,
                &paint(color, true),
                FillRule::EvenOdd,
                self.transform,
                None,
            );
        }
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        if let Some(path) = pb.finish() {
            self.stroke(&path, width, LineCap::Butt, color);
        }
        Ok(())
    }

    fn stroke_polygon(
        &mut self,
        points: &[Point],
        width: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        if let Some(path) = polygon_path(points) {
            self.stroke(&path, width, LineCap::Butt, color);
        }
        Ok(())
    }

    fn stroke_oval(&mut self, bounds: Rect, width: f32, color: Color) -> Result<(), SurfaceError> {
        if let Some(path) = skia_rect(bounds).and_then(PathBuilder::from_oval) {
            self.stroke(&path, width, LineCap::Butt, color);
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let Some(font) = self.font.as_ref() else {
            return Err(SurfaceError::new(format!("no font loaded to draw {text:?}")));
        };
        let visual = font.visual(text);

        // Outlines are built in millimetres and go through the same transform as bars.
        let mut pb = PathBuilder::new();
        for glyph in font
            .font
            .layout(&visual, Scale::uniform(size), point(origin.x, origin.y))
        {
            let pen = glyph.position();
            glyph.unpositioned().build_outline(&mut GlyphOutline {
                builder: &mut pb,
                dx: pen.x,
                dy: pen.y,
            });
        }
        let Some(path) = pb.finish() else {
            return Ok(());
        };
        self.pixmap.fill_path(
            &path,
            &paint(color, true),
            FillRule::Winding,
            self.transform,
            None,
        );
        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(transform) => self.transform = transform,
            None => log::warn!("restore without matching save"),
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pre_translate(dx, dy);
    }

    fn rotate(&mut self, degrees: f32) {
        self.transform = self.transform.pre_rotate(degrees);
    }
}
