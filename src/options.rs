//! Caller-owned display options.
//!
//! Numeric options are clamped silently to their valid range; nothing here is an error.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BAR_HEIGHT, DEFAULT_FONT_SIZE, DEFAULT_X_DIMENSION, MAX_MULTIPLIER, MAX_TEXT_MARGIN,
    MIN_FONT_SIZE, MIN_MULTIPLIER,
};
use crate::error::Result;
use crate::surface::Color;

/// Rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Snap any angle to the quarter turn whose band contains it, modulo 360.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            0..=89 => Rotation::None,
            90..=179 => Rotation::Cw90,
            180..=269 => Rotation::Cw180,
            _ => Rotation::Cw270,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextPosition {
    Above,
    #[default]
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
    /// One character per equal slot across the symbol width.
    Stretched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BearerStyle {
    None,
    /// Horizontal bars above and below the symbol.
    Horizontal,
    /// A closed box around the symbol and its quiet zones.
    #[default]
    Rectangle,
}

/// How a symbol is sized and drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Element (X-dimension) width in mm.
    pub x_dimension: f32,
    multiplier: f32,
    /// Default row height in mm, used by rows without an explicit height.
    bar_height: f32,
    font_size: f32,
    /// Gap between the bars and linear text, in mm.
    text_margin: f32,
    pub rotation: Rotation,
    pub text_visible: bool,
    pub text_position: TextPosition,
    pub text_alignment: TextAlignment,
    pub show_check_digit: bool,
    pub bar_color: Color,
    pub text_color: Color,
    pub bearer_style: BearerStyle,
    /// The symbol is the linear part of a composite.
    pub composite: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            x_dimension: DEFAULT_X_DIMENSION,
            multiplier: 1.0,
            bar_height: DEFAULT_BAR_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
            text_margin: 0.0,
            rotation: Rotation::None,
            text_visible: true,
            text_position: TextPosition::Below,
            text_alignment: TextAlignment::Center,
            show_check_digit: false,
            bar_color: Color::BLACK,
            text_color: Color::BLACK,
            bearer_style: BearerStyle::Rectangle,
            composite: false,
        }
    }
}

impl DisplayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an option document, clamping every numeric field.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: DisplayOptions = serde_json::from_str(json)?;
        Ok(options.sanitized())
    }

    /// Re-apply every clamp, e.g. after deserialising.
    pub fn sanitized(mut self) -> Self {
        self.set_multiplier(self.multiplier);
        self.set_bar_height(self.bar_height);
        self.set_font_size(self.font_size);
        self.set_text_margin(self.text_margin);
        self.x_dimension = self.x_dimension.max(0.0);
        self
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, value: f32) {
        self.multiplier = round2(value).clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);
    }

    pub fn bar_height(&self) -> f32 {
        self.bar_height
    }

    pub fn set_bar_height(&mut self, value: f32) {
        self.bar_height = round2(value).max(0.0);
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, value: f32) {
        self.font_size = value.max(MIN_FONT_SIZE);
    }

    pub fn text_margin(&self) -> f32 {
        self.text_margin
    }

    pub fn set_text_margin(&mut self, value: f32) {
        self.text_margin = round2(value.clamp(0.0, MAX_TEXT_MARGIN));
    }

    pub fn set_rotation(&mut self, degrees: i32) {
        self.rotation = Rotation::from_degrees(degrees);
    }

    /// Width of one element in mm: X-dimension times multiplier.
    pub fn element_width(&self) -> f32 {
        self.x_dimension * self.multiplier
    }

    pub fn multiplier_of(mut self, value: f32) -> Self {
        self.set_multiplier(value);
        self
    }

    pub fn bar_height_of(mut self, value: f32) -> Self {
        self.set_bar_height(value);
        self
    }

    pub fn font_size_of(mut self, value: f32) -> Self {
        self.set_font_size(value);
        self
    }

    pub fn text_margin_of(mut self, value: f32) -> Self {
        self.set_text_margin(value);
        self
    }

    pub fn rotated(mut self, degrees: i32) -> Self {
        self.set_rotation(degrees);
        self
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
