use approx::assert_relative_eq;
use barcode_render::consts::DEFAULT_X_DIMENSION;
use barcode_render::epl::{label_job, EplSettings};
use barcode_render::surface::{DrawOp, FixedPitch};
use barcode_render::barcode::mm_to_px;
use barcode_render::{
    layout_symbol, measure_symbol, Barcode, DisplayOptions, Ean13Encoder, Error, GuardText,
    RasterSurface, RecordingSurface, Rotation, Row, Symbol, Symbology, TextFont, TextMeasurer,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture_font() -> TextFont {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSansMono.ttf");
    TextFont::from_vec(std::fs::read(path).unwrap()).unwrap()
}

fn first_text_x(ops: &[DrawOp]) -> f32 {
    ops.iter()
        .find_map(|op| match op {
            DrawOp::Text { origin, .. } => Some(origin.x),
            _ => None,
        })
        .unwrap()
}

fn first_rect_x(ops: &[DrawOp]) -> f32 {
    ops.iter()
        .find_map(|op| match op {
            DrawOp::FillRect { rect, .. } => Some(rect.left),
            _ => None,
        })
        .unwrap()
}

#[test]
fn guard_text_fits_between_guards() {
    init_logging();
    let guard = GuardText {
        left_text: "123456".into(),
        elements_per_character: 7,
        ..GuardText::default()
    };
    let symbol = Symbol::new(Symbology::Ean13, vec![Row::new(vec![1; 95])]).with_guard_text(guard);
    let options = DisplayOptions::new().multiplier_of(2.0);
    let ew = DEFAULT_X_DIMENSION * 2.0;

    let geometry = measure_symbol(&symbol, &options);
    assert_relative_eq!(geometry.width, 95.0 * ew, epsilon = 1e-4);

    let layout = layout_symbol(&symbol, &options, &FixedPitch::default());
    let text = layout.text.unwrap();
    assert!(text.width < 7.0 * ew * 6.0);
}

#[test]
fn rotation_snaps_to_quarter_turns() {
    assert_eq!(Rotation::from_degrees(135), Rotation::Cw90);
    assert_eq!(Rotation::from_degrees(0), Rotation::None);

    let mut barcode = Barcode::new(DisplayOptions::new().rotated(135));
    barcode.set_symbol(Symbol::new(Symbology::Code128, vec![Row::from_pattern("101")]));
    let mut surface = RecordingSurface::new();
    barcode.render(&mut surface, (0.0, 0.0), 96.0, 96.0).unwrap();
    assert!(surface.ops().contains(&DrawOp::Rotate { degrees: 90.0 }));
}

#[test]
fn three_binder_rows_draw_four_rules() {
    let symbol = Symbol::new(Symbology::CodablockF, vec![Row::from_pattern("11010011"); 3])
        .with_elements_per_character(2);
    let mut barcode = Barcode::new(DisplayOptions::new());
    barcode.set_symbol(symbol);
    let mut surface = RecordingSurface::new();
    barcode.render(&mut surface, (0.0, 0.0), 96.0, 96.0).unwrap();

    let lines: Vec<&DrawOp> = surface
        .paint_ops()
        .filter(|op| matches!(op, DrawOp::StrokeLine { .. }))
        .collect();
    assert_eq!(lines.len(), 4);
    for line in lines {
        if let DrawOp::StrokeLine { from, to, .. } = line {
            assert_relative_eq!(from.y, to.y);
        }
    }
}

#[test]
fn nothing_loaded_means_nothing_drawn() {
    let barcode = Barcode::default();
    assert_eq!(barcode.compute_size(&FixedPitch::default(), 203.0, 203.0), (0, 0));
    let mut surface = RecordingSurface::new();
    barcode.render(&mut surface, (5.0, 5.0), 203.0, 203.0).unwrap();
    assert!(surface.ops().is_empty());
}

#[test]
fn composite_shift_follows_leading_spaces() {
    let guard = GuardText {
        left_text: "1234".into(),
        right_text: "5670".into(),
        elements_per_character: 7,
        ..GuardText::default()
    };
    let symbol = Symbol::new(Symbology::Ean8, vec![Row::from_pattern("0001010110")])
        .with_guard_text(guard);
    let plain = DisplayOptions::new();
    let mut composite = plain.clone();
    composite.composite = true;
    let ew = plain.element_width();

    assert_eq!(measure_symbol(&symbol, &plain).linear_shift_count, 0);
    assert_eq!(measure_symbol(&symbol, &composite).linear_shift_count, 3);

    let render = |options: DisplayOptions| {
        let mut barcode = Barcode::new(options);
        barcode.set_symbol(symbol.clone());
        let mut surface = RecordingSurface::new();
        barcode.render(&mut surface, (0.0, 0.0), 96.0, 96.0).unwrap();
        surface.into_ops()
    };
    let plain_ops = render(plain);
    let composite_ops = render(composite);

    assert_relative_eq!(first_rect_x(&composite_ops), 3.0 * ew, epsilon = 1e-5);
    assert_relative_eq!(
        first_text_x(&composite_ops) - first_text_x(&plain_ops),
        3.0 * ew,
        epsilon = 1e-5
    );
}

#[test]
fn failed_render_restores_surface_state() {
    let mut barcode = Barcode::default();
    barcode.create(&Ean13Encoder, "590123412345").unwrap();
    let mut surface = RecordingSurface::new().failing_at(10);
    let err = barcode.render(&mut surface, (0.0, 0.0), 300.0, 300.0).unwrap_err();
    assert!(matches!(err, Error::Render { .. }));
    assert_eq!(surface.depth(), 0);
    assert_eq!(surface.ops().last(), Some(&DrawOp::Restore));
}

#[test]
fn ean13_digits_land_under_the_bars() {
    init_logging();
    let mut barcode = Barcode::default();
    barcode.create(&Ean13Encoder, "9780201379624").unwrap();
    let mut surface = RecordingSurface::new();
    barcode.render(&mut surface, (0.0, 0.0), 300.0, 300.0).unwrap();

    let texts: Vec<(String, f32)> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, origin, .. } => Some((text.clone(), origin.y)),
            _ => None,
        })
        .collect();
    let drawn: String = texts.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(drawn, "9780201379624");

    let options = &barcode.options;
    let baseline = texts[0].1;
    assert!(baseline > options.bar_height());
    assert!(texts.iter().all(|(_, y)| (*y - baseline).abs() < 1e-5));
}

#[test]
fn raster_output_to_epl() {
    init_logging();
    let mut options = DisplayOptions::new();
    options.text_visible = false;
    let mut barcode = Barcode::new(options);
    barcode.create(&Ean13Encoder, "400638133393").unwrap();

    let surface = RasterSurface::new(1, 1, 203.0).unwrap();
    let (w, h) = barcode.compute_size(&surface, 203.0, 203.0);
    assert!(w > 0 && h > 0);

    let mut surface = RasterSurface::new(w, h, 203.0).unwrap();
    barcode.render(&mut surface, (0.0, 0.0), 203.0, 203.0).unwrap();
    let bitmap = surface.to_gray_1bit();
    assert!(bitmap.pixels().any(|p| p.0[0] == 0));

    let job = label_job(&bitmap, 0, 0, &EplSettings::default());
    assert!(job.starts_with(b"N\r\n"));
    assert!(job.ends_with(b"P1\r\n"));
}

#[test]
fn raster_rotation_is_modulo_360() {
    let symbol = Symbol::new(Symbology::Code128, vec![Row::from_pattern("1101001100")]);
    let render = |degrees: i32| {
        let mut options = DisplayOptions::new().multiplier_of(4.0).rotated(degrees);
        options.text_visible = false;
        let mut barcode = Barcode::new(options);
        barcode.set_symbol(symbol.clone());
        let mut surface = RasterSurface::new(200, 200, 96.0).unwrap();
        barcode.render(&mut surface, (40.0, 40.0), 96.0, 96.0).unwrap();
        surface.into_image()
    };
    assert_eq!(render(90), render(450));
    assert_eq!(render(-90), render(270));
}

#[test]
fn raster_text_without_font_fails_cleanly() {
    let symbol = Symbol::new(Symbology::Code128, vec![Row::from_pattern("1101")]).with_text("AB");
    let mut barcode = Barcode::default();
    barcode.set_symbol(symbol);
    let mut surface = RasterSurface::new(100, 100, 96.0).unwrap();
    assert_eq!(surface.measure_text("AB", 10.0), 0.0);
    let err = barcode.render(&mut surface, (0.0, 0.0), 96.0, 96.0).unwrap_err();
    assert!(matches!(err, Error::Render { .. }));
}

#[test]
fn narrowest_bars_survive_rasterising() {
    let mut options = DisplayOptions::new().multiplier_of(0.8);
    options.text_visible = false;
    let mut barcode = Barcode::new(options);
    barcode.set_symbol(Symbol::new(Symbology::Code128, vec![Row::from_pattern("10101")]));

    let (w, h) = barcode.compute_size(&FixedPitch::default(), 96.0, 96.0);
    let mut surface = RasterSurface::new(w + 2, h, 96.0).unwrap();
    barcode.render(&mut surface, (0.0, 0.0), 96.0, 96.0).unwrap();
    let bitmap = surface.to_gray_1bit();
    let row: Vec<bool> = (0..4).map(|x| bitmap.get_pixel(x, h / 2).0[0] == 0).collect();
    // Three 0.8 px bars in four pixels: each keeps its own column.
    assert_eq!(row, vec![true, false, true, true]);
}

#[test]
fn raster_text_with_font_draws_under_the_bars() {
    init_logging();
    let symbol = Symbol::new(Symbology::Code128, vec![Row::new(vec![1; 120])]).with_text("AB");
    let mut barcode = Barcode::default();
    barcode.set_symbol(symbol);

    let sizing = RasterSurface::new(1, 1, 203.0).unwrap().with_font(fixture_font());
    let (w, h) = barcode.compute_size(&sizing, 203.0, 203.0);
    let bar_bottom = mm_to_px(barcode.options.bar_height(), 203.0).ceil() as u32;
    assert!(h > bar_bottom);

    let mut surface = RasterSurface::new(w, h, 203.0).unwrap().with_font(fixture_font());
    barcode.render(&mut surface, (0.0, 0.0), 203.0, 203.0).unwrap();
    let bitmap = surface.to_gray_1bit();
    let text_ink = bitmap
        .enumerate_pixels()
        .filter(|(_, y, p)| *y > bar_bottom + 1 && p.0[0] == 0)
        .count();
    assert!(text_ink > 0);
}
