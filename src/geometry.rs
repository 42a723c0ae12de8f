//! Structural symbol size: modules plus bearers and binders, no text.

use crate::consts::{BEARER_ELEMENTS, MAXICODE_HEIGHT, MAXICODE_WIDTH, QUIET_ZONE_ELEMENTS};
use crate::options::{BearerStyle, DisplayOptions};
use crate::symbol::{Decoration, Row, Symbol};

/// Size and offsets of the bare symbol, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SymbolGeometry {
    pub width: f32,
    pub height: f32,
    pub element_width: f32,
    /// Where the first module column starts, left of which sits a quiet zone or bearer.
    pub first_bar_x: f32,
    /// Leading spaces of a composite's linear row.
    pub linear_shift_count: usize,
    /// ITF-14 bearer stroke width; zero when no bearer is drawn.
    pub bearer_width: f32,
    pub quiet_zone: f32,
}

impl SymbolGeometry {
    /// Horizontal shift of a composite's linear component.
    pub fn linear_shift(&self) -> f32 {
        self.linear_shift_count as f32 * self.element_width
    }
}

/// Height of one row in mm.
pub fn row_height(row: &Row, options: &DisplayOptions) -> f32 {
    if row.height() == 0.0 {
        options.bar_height()
    } else {
        row.height() * options.element_width()
    }
}

/// Compute the structural size of `symbol`.
pub fn measure_symbol(symbol: &Symbol, options: &DisplayOptions) -> SymbolGeometry {
    let element_width = options.element_width();
    let mut geometry = SymbolGeometry {
        element_width,
        ..SymbolGeometry::default()
    };

    if symbol.symbology.is_fixed_footprint() {
        geometry.width = MAXICODE_WIDTH * options.multiplier();
        geometry.height = MAXICODE_HEIGHT * options.multiplier();
        log::debug!("{} fixed footprint {:?}", symbol.symbology, geometry);
        return geometry;
    }

    let scheme = symbol.marker_scheme();
    let max_row_width = symbol
        .rows
        .iter()
        .map(|row| row.width(scheme))
        .max()
        .unwrap_or(0);
    geometry.width = max_row_width as f32 * element_width;
    geometry.height = symbol.rows.iter().map(|row| row_height(row, options)).sum();

    if options.composite {
        geometry.linear_shift_count = symbol.rows.first().map_or(0, Row::leading_spaces);
    }

    match symbol.symbology.decoration() {
        Decoration::Binder => {
            geometry.height += element_width;
        }
        Decoration::SideBinder => {
            let quiet_zone = QUIET_ZONE_ELEMENTS * element_width;
            geometry.height += element_width;
            geometry.width += quiet_zone + 2.0 * element_width;
            geometry.quiet_zone = quiet_zone;
            geometry.first_bar_x = quiet_zone;
        }
        Decoration::Bearer if options.bearer_style != BearerStyle::None => {
            let quiet_zone = QUIET_ZONE_ELEMENTS * element_width;
            let bearer_width = BEARER_ELEMENTS * element_width;
            geometry.width += 2.0 * quiet_zone;
            geometry.first_bar_x = quiet_zone;
            if options.bearer_style == BearerStyle::Rectangle {
                geometry.width += bearer_width;
                geometry.first_bar_x += bearer_width / 2.0;
            }
            geometry.height += bearer_width;
            geometry.quiet_zone = quiet_zone;
            geometry.bearer_width = bearer_width;
        }
        Decoration::Bearer | Decoration::None => {}
    }

    log::debug!(
        "{} structural size {:.3} x {:.3} mm ({} rows, {} elements wide)",
        symbol.symbology,
        geometry.width,
        geometry.height,
        symbol.rows.len(),
        max_row_width
    );
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Row, Symbology};
    use approx::assert_relative_eq;

    fn options() -> DisplayOptions {
        DisplayOptions::new().multiplier_of(2.0).bar_height_of(10.0)
    }

    #[test]
    fn linear_size_is_widest_row_times_element() {
        let symbol = Symbol::new(
            Symbology::Code128,
            vec![Row::from_pattern("11010010000"), Row::from_pattern("1101")],
        );
        let options = options();
        let g = measure_symbol(&symbol, &options);
        assert_relative_eq!(g.width, 11.0 * options.element_width());
        assert_relative_eq!(g.height, 20.0);
        assert_eq!(g.first_bar_x, 0.0);
    }

    #[test]
    fn explicit_row_height_scales_with_element_width() {
        let symbol = Symbol::new(
            Symbology::Pdf417,
            vec![Row::with_height(vec![1, 0, 1], 3.0), Row::new(vec![1, 1, 1])],
        );
        let options = options();
        let g = measure_symbol(&symbol, &options);
        assert_relative_eq!(g.height, 3.0 * options.element_width() + 10.0);
    }

    #[test]
    fn guard_markers_excluded_from_width() {
        let symbol = Symbol::new(Symbology::Ean8, vec![Row::from_pattern("G101N1100G101")]);
        let options = options();
        let g = measure_symbol(&symbol, &options);
        assert_relative_eq!(g.width, 10.0 * options.element_width());
    }

    #[test]
    fn maxicode_is_fixed() {
        let symbol = Symbol::new(Symbology::MaxiCode, vec![Row::from_pattern("1")]);
        let g = measure_symbol(&symbol, &options());
        assert_relative_eq!(g.width, 56.32);
        assert_relative_eq!(g.height, 53.72);
    }

    #[test]
    fn codablock_adds_one_binder_height() {
        let symbol = Symbol::new(Symbology::CodablockF, vec![Row::from_pattern("1010"); 3]);
        let options = options();
        let g = measure_symbol(&symbol, &options);
        assert_relative_eq!(g.height, 30.0 + options.element_width());
        assert_relative_eq!(g.width, 4.0 * options.element_width());
    }

    #[test]
    fn side_binder_adds_quiet_zone() {
        let symbol = Symbol::new(Symbology::Code16K, vec![Row::from_pattern("1010"); 2]);
        let options = options();
        let ew = options.element_width();
        let g = measure_symbol(&symbol, &options);
        assert_relative_eq!(g.width, 4.0 * ew + 10.16 * ew + 2.0 * ew, epsilon = 1e-5);
        assert_relative_eq!(g.height, 20.0 + ew);
        assert_relative_eq!(g.first_bar_x, 10.16 * ew);
    }

    #[test]
    fn itf14_bearer_styles() {
        let symbol = Symbol::new(Symbology::Itf14, vec![Row::from_pattern("1010")]);
        let mut options = options();
        let ew = options.element_width();

        options.bearer_style = BearerStyle::None;
        let plain = measure_symbol(&symbol, &options);
        assert_relative_eq!(plain.width, 4.0 * ew);
        assert_eq!(plain.bearer_width, 0.0);

        options.bearer_style = BearerStyle::Horizontal;
        let bars = measure_symbol(&symbol, &options);
        assert_relative_eq!(bars.width, 4.0 * ew + 2.0 * 10.16 * ew, epsilon = 1e-5);
        assert_relative_eq!(bars.height, 10.0 + 4.7 * ew, epsilon = 1e-5);
        assert_relative_eq!(bars.first_bar_x, 10.16 * ew);

        options.bearer_style = BearerStyle::Rectangle;
        let boxed = measure_symbol(&symbol, &options);
        assert_relative_eq!(boxed.width, bars.width + 4.7 * ew, epsilon = 1e-5);
        assert_relative_eq!(boxed.first_bar_x, 10.16 * ew + 4.7 * ew / 2.0, epsilon = 1e-5);
    }

    #[test]
    fn composite_shift_counts_leading_spaces_of_first_row() {
        let symbol = Symbol::new(
            Symbology::Code128,
            vec![Row::from_pattern("0001101"), Row::from_pattern("1101")],
        );
        let mut options = options();
        assert_eq!(measure_symbol(&symbol, &options).linear_shift_count, 0);
        options.composite = true;
        let g = measure_symbol(&symbol, &options);
        assert_eq!(g.linear_shift_count, 3);
        assert_relative_eq!(g.linear_shift(), 3.0 * options.element_width());
    }
}
