// Layout constants. Lengths are millimetres, or element widths where noted.

pub const MM_PER_INCH: f32 = 25.4;

// Option defaults
pub const DEFAULT_X_DIMENSION: f32 = 0.264583; // one pixel at 96 dpi
pub const DEFAULT_BAR_HEIGHT: f32 = 20.0;
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

// Option ranges
pub const MIN_MULTIPLIER: f32 = 0.8;
pub const MAX_MULTIPLIER: f32 = 15.0;
pub const MAX_TEXT_MARGIN: f32 = 5.0;

// Text fitting
pub const MIN_FONT_SIZE: f32 = 4.0;
pub const SHRINK_STEP: f32 = 1.0;
pub const GUARD_FIT_STEP: f32 = 0.5;
pub const GUARD_CHARACTER_ELEMENTS: f32 = 7.0; // modules per EAN/UPC digit

// Quiet zone and ITF-14 bearer, in element widths
pub const QUIET_ZONE_ELEMENTS: f32 = 10.16;
pub const BEARER_ELEMENTS: f32 = 4.7;

// EAN/UPC text placement, in element widths
pub const LEFT_GUARD_ELEMENTS: usize = 4;
pub const CENTER_GUARD_ELEMENTS: usize = 4;
pub const RIGHT_GUARD_ELEMENTS: usize = 4;
pub const UPCA_GUARD_ELEMENTS: usize = 11;
pub const UPCE_RIGHT_GUARD_ELEMENTS: usize = 6;
pub const SUPPLEMENT_GAP_ELEMENTS: usize = 9;
pub const QUIET_SPACE_GLYPH: &str = ">";

// MaxiCode, in multiples of the multiplier
pub const MAXICODE_WIDTH: f32 = 28.16;
pub const MAXICODE_HEIGHT: f32 = 26.86;
pub const MAXICODE_CENTER: (f32, f32) = (13.64, 13.43);
pub const MAXICODE_RING_RADII: [f32; 3] = [0.85, 2.20, 3.54];
pub const MAXICODE_RING_STROKE: f32 = 0.67;
pub const HEX_PITCH_X: f32 = 0.88;
pub const HEX_PITCH_Y: f32 = 0.76;
pub const HEX_EVEN_ROW_OFFSET: f32 = 0.88;
pub const HEX_ODD_ROW_OFFSET: f32 = 1.32;

// EPL2 label defaults
pub const DARKNESS: u8 = 8; // D0..D15
pub const SPEED: u8 = 2; // S1..S6
pub const LABEL_GAP: u32 = 24;
pub const INVERT_BITS: bool = true; // flip GW bits for black-on-white
