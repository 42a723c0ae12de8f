//! Host-facing handle: options plus the last encoded symbol.

use crate::consts::MM_PER_INCH;
use crate::error::{Error, Result};
use crate::options::DisplayOptions;
use crate::render::render_symbol;
use crate::surface::{DrawingSurface, Point, TextMeasurer};
use crate::symbol::{Encoder, Symbol};
use crate::text::{layout_symbol, Layout};

pub fn mm_to_px(mm: f32, dpi: f32) -> f32 {
    mm * dpi / MM_PER_INCH
}

pub fn px_to_mm(px: f32, dpi: f32) -> f32 {
    px * MM_PER_INCH / dpi
}

/// A barcode as the host sees it.
///
/// Holds no drawing resources; sizing and rendering take the surface or measurer as
/// an argument.
#[derive(Debug, Clone, Default)]
pub struct Barcode {
    pub options: DisplayOptions,
    symbol: Option<Symbol>,
}

impl Barcode {
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            options,
            symbol: None,
        }
    }

    /// Encode `message`, replacing the current symbol. On failure the barcode is left
    /// without a symbol.
    pub fn create(&mut self, encoder: &dyn Encoder, message: &str) -> Result<()> {
        self.symbol = None;
        if message.is_empty() {
            return Err(Error::encode(encoder.symbology(), "empty message"));
        }
        let symbol = encoder.encode(message)?;
        log::debug!(
            "encoded {} ({} rows) from {} byte message",
            symbol.symbology,
            symbol.rows.len(),
            message.len()
        );
        self.symbol = Some(symbol);
        Ok(())
    }

    /// Use an already-encoded symbol.
    pub fn set_symbol(&mut self, symbol: Symbol) {
        self.symbol = Some(symbol);
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    pub fn clear(&mut self) {
        self.symbol = None;
    }

    pub fn is_valid(&self) -> bool {
        self.valid_symbol().is_some()
    }

    fn valid_symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref().filter(|s| !s.is_empty())
    }

    /// Full footprint in millimetres, text included.
    pub fn layout(&self, measurer: &dyn TextMeasurer) -> Option<Layout> {
        let symbol = self.valid_symbol()?;
        Some(layout_symbol(symbol, &self.options, measurer))
    }

    /// Pixel size at the given resolution, rounded up. `(0, 0)` without a symbol.
    ///
    /// The size is that of the unrotated symbol; rotation pivots on its centre.
    pub fn compute_size(&self, measurer: &dyn TextMeasurer, dpi_x: f32, dpi_y: f32) -> (u32, u32) {
        let Some(layout) = self.layout(measurer) else {
            return (0, 0);
        };
        (
            mm_to_px(layout.width, dpi_x).ceil() as u32,
            mm_to_px(layout.height, dpi_y).ceil() as u32,
        )
    }

    /// Draw onto `surface` with the top-left corner at `origin_px`. Without a symbol
    /// nothing is drawn.
    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        origin_px: (f32, f32),
        dpi_x: f32,
        dpi_y: f32,
    ) -> Result<()> {
        let Some(symbol) = self.valid_symbol() else {
            log::debug!("render skipped: no symbol");
            return Ok(());
        };
        let layout = layout_symbol(symbol, &self.options, &*surface);
        let origin = Point::new(px_to_mm(origin_px.0, dpi_x), px_to_mm(origin_px.1, dpi_y));
        render_symbol(surface, symbol, &self.options, &layout, origin).map_err(|source| {
            log::error!("rendering {} failed: {}", symbol.symbology, source);
            Error::from(source)
        })
    }
}
