//! Barcode symbol geometry and rendering.
//! - Sizes encoded symbols (bars, dots, MaxiCode hexagons) in millimetres
//! - Fits human-readable text: shrink-to-fit for linear codes, guard-fit for EAN/UPC
//! - Draws through any `DrawingSurface`, with rotation about the symbol centre
//! - Binders for stacked codes, bearer bars for ITF-14
//! - Raster output via tiny-skia and rusttype outlines, bidi-aware text, and EPL2 jobs for label printers

pub mod barcode;
pub mod consts;
pub mod ean;
pub mod epl;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod options;
pub mod render;
pub mod surface;
pub mod symbol;
pub mod text;

pub use barcode::Barcode;
pub use ean::Ean13Encoder;
pub use error::{Error, Result, SurfaceError};
pub use geometry::{measure_symbol, SymbolGeometry};
pub use graphics::{RasterSurface, TextFont};
pub use options::{BearerStyle, DisplayOptions, Rotation, TextAlignment, TextPosition};
pub use render::render_symbol;
pub use surface::{Color, DrawingSurface, Point, Rect, RecordingSurface, TextMeasurer};
pub use symbol::{Encoder, GuardText, Row, Symbol, Symbology};
pub use text::{layout_symbol, Layout, TextLayout};
