//! Encoded symbol data: rows of elements plus the human-readable text fields.
//!
//! Encoders produce a [`Symbol`] once per message. Everything downstream (geometry,
//! text layout, rendering) reads it immutably.

use std::fmt;

use crate::error::Result;

/// Symbologies known to the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    AusPostStandard,
    AusPostReplyPaid,
    AusPostRedirect,
    AusPostRouting,
    RoyalMailMailmark,
    Usps,
    PostNet,
    Planet,
    KoreaPost,
    Fim,
    RoyalMail,
    KixCode,
    DaftCode,
    Flattermarken,
    JapanPost,
    Code32,
    PharmaZentralNummer,
    Code39,
    Code39Extended,
    Logmars,
    VinCode,
    ChannelCode,
    Telepen,
    TelepenNumeric,
    Pharmacode,
    Pharmacode2Track,
    Ean14,
    Sscc18,
    Code128,
    Code93,
    Standard2of5,
    Interleaved2of5,
    Matrix2of5,
    Iata2of5,
    DataLogic2of5,
    Itf14,
    DeutschePostIdentCode,
    DeutschePostLeitCode,
    Codabar,
    MsiPlessey,
    UkPlessey,
    Code11,
    Isbn,
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    DatabarOmni,
    DatabarOmniStacked,
    DatabarTruncated,
    DatabarStacked,
    DatabarLimited,
    DatabarExpanded,
    DatabarExpandedStacked,
    QrCode,
    MicroQrCode,
    UpnQr,
    RectangularMicroQrCode,
    DataMatrix,
    CodeOne,
    Aztec,
    AztecRunes,
    MaxiCode,
    Pdf417,
    Pdf417Truncated,
    MicroPdf417,
    CodablockF,
    Code16K,
    DotCode,
    GridMatrix,
    Code49,
    HanXin,
    Ultracode,
}

/// Structural decoration a symbology draws around its module grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    None,
    /// Top and bottom binder lines with inset row separators (Codablock-F).
    Binder,
    /// Binders plus a leading quiet zone (Code 16K, Code 49).
    SideBinder,
    /// ITF-14 bearer bars or bearer box.
    Bearer,
}

impl Symbology {
    /// EAN/UPC family: bar-height markers and guard-fitted text.
    pub fn is_guard_bar(self) -> bool {
        matches!(
            self,
            Symbology::Ean13 | Symbology::Ean8 | Symbology::UpcA | Symbology::UpcE | Symbology::Isbn
        )
    }

    /// Fixed-footprint hexagonal grid.
    pub fn is_fixed_footprint(self) -> bool {
        self == Symbology::MaxiCode
    }

    pub fn is_dot(self) -> bool {
        self == Symbology::DotCode
    }

    /// Letter markers select the colour of the following module.
    pub fn is_multicolor(self) -> bool {
        self == Symbology::Ultracode
    }

    /// Human-readable text is wrapped in start/stop asterisks.
    pub fn has_text_delimiters(self) -> bool {
        matches!(self, Symbology::Code39 | Symbology::Code39Extended)
    }

    pub fn decoration(self) -> Decoration {
        match self {
            Symbology::CodablockF => Decoration::Binder,
            Symbology::Code16K | Symbology::Code49 => Decoration::SideBinder,
            Symbology::Itf14 => Decoration::Bearer,
            _ => Decoration::None,
        }
    }

    /// Marker alphabet used by this symbology's rows.
    pub fn marker_scheme(self) -> MarkerScheme {
        if self.is_guard_bar() {
            MarkerScheme::BarHeight
        } else if self.is_multicolor() {
            MarkerScheme::Color
        } else {
            MarkerScheme::Plain
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::AusPostStandard => "Aus Post Standard",
            Symbology::AusPostReplyPaid => "Aus Post Reply Paid",
            Symbology::AusPostRedirect => "Aus Post Redirect",
            Symbology::AusPostRouting => "Aus Post Routing",
            Symbology::RoyalMailMailmark => "Royal Mail Mailmark",
            Symbology::Usps => "USPS Intelligent Mail",
            Symbology::PostNet => "PostNet",
            Symbology::Planet => "Planet",
            Symbology::KoreaPost => "Korean Postal",
            Symbology::Fim => "FIM",
            Symbology::RoyalMail => "Royal Mail 4 State",
            Symbology::KixCode => "Dutch Post KIX",
            Symbology::DaftCode => "DAFT Code",
            Symbology::Flattermarken => "Flattermarken",
            Symbology::JapanPost => "Japanese Postal",
            Symbology::Code32 => "Code 32",
            Symbology::PharmaZentralNummer => "Pharmazentral Nummer",
            Symbology::Code39 => "Code 39",
            Symbology::Code39Extended => "Code 39 Extended",
            Symbology::Logmars => "LOGMARS",
            Symbology::VinCode => "VIN Code",
            Symbology::ChannelCode => "Channel Code",
            Symbology::Telepen => "Telepen",
            Symbology::TelepenNumeric => "Telepen Numeric",
            Symbology::Pharmacode => "Pharmacode",
            Symbology::Pharmacode2Track => "Pharmacode 2-Track",
            Symbology::Ean14 => "EAN-14",
            Symbology::Sscc18 => "SSCC-18",
            Symbology::Code128 => "Code 128",
            Symbology::Code93 => "Code 93",
            Symbology::Standard2of5 => "Code 2 of 5 Standard",
            Symbology::Interleaved2of5 => "Code 2 of 5 Interleaved",
            Symbology::Matrix2of5 => "Code 2 of 5 Matrix",
            Symbology::Iata2of5 => "Code 2 of 5 IATA",
            Symbology::DataLogic2of5 => "Code 2 of 5 Data Logic",
            Symbology::Itf14 => "ITF-14",
            Symbology::DeutschePostIdentCode => "Deutsche Post Identcode",
            Symbology::DeutschePostLeitCode => "Deutsche Post Leitcode",
            Symbology::Codabar => "Codabar",
            Symbology::MsiPlessey => "MSI Plessey",
            Symbology::UkPlessey => "UK Plessey",
            Symbology::Code11 => "Code 11",
            Symbology::Isbn => "ISBN",
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::DatabarOmni => "Databar Omnidirectional",
            Symbology::DatabarOmniStacked => "Databar Omnidirectional Stacked",
            Symbology::DatabarTruncated => "Databar Truncated",
            Symbology::DatabarStacked => "Databar Stacked",
            Symbology::DatabarLimited => "Databar Limited",
            Symbology::DatabarExpanded => "Databar Expanded",
            Symbology::DatabarExpandedStacked => "Databar Expanded Stacked",
            Symbology::QrCode => "QR Code",
            Symbology::MicroQrCode => "Micro QR Code",
            Symbology::UpnQr => "UPN QR",
            Symbology::RectangularMicroQrCode => "Rectangular Micro QR Code",
            Symbology::DataMatrix => "Data Matrix",
            Symbology::CodeOne => "Code One",
            Symbology::Aztec => "Aztec Code",
            Symbology::AztecRunes => "Aztec Runes",
            Symbology::MaxiCode => "MaxiCode",
            Symbology::Pdf417 => "PDF417",
            Symbology::Pdf417Truncated => "PDF417 Truncated",
            Symbology::MicroPdf417 => "Micro PDF417",
            Symbology::CodablockF => "Codablock-F",
            Symbology::Code16K => "Code 16K",
            Symbology::DotCode => "DotCode",
            Symbology::GridMatrix => "Grid Matrix",
            Symbology::Code49 => "Code 49",
            Symbology::HanXin => "Han Xin Code",
            Symbology::Ultracode => "Ultracode",
        };
        f.write_str(name)
    }
}

/// How bytes above `1` in a row are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerScheme {
    Plain,
    BarHeight,
    Color,
}

/// Bar placement selected by an EAN/UPC height marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarHeight {
    /// `N`: full row height from the row top.
    Normal,
    /// `G`: guard bar extended down into the text band.
    Guard,
    /// `S`: add-on bar shortened at the top to leave room for its text.
    Short,
}

/// Module colours of the multi-colour symbology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleColor {
    White,
    Cyan,
    Blue,
    Magenta,
    Red,
    Yellow,
    Green,
    Black,
}

impl ModuleColor {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            b'W' => ModuleColor::White,
            b'C' => ModuleColor::Cyan,
            b'B' => ModuleColor::Blue,
            b'M' => ModuleColor::Magenta,
            b'R' => ModuleColor::Red,
            b'Y' => ModuleColor::Yellow,
            b'G' => ModuleColor::Green,
            b'K' => ModuleColor::Black,
            _ => return None,
        })
    }
}

/// One decoded element of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Space,
    Mark,
    /// Layout directive for the bars that follow; occupies no width.
    Height(BarHeight),
    /// Colour for this and the following marks.
    Color(ModuleColor),
}

impl Element {
    /// Decode a raw element byte. Unknown markers decode as [`Element::Mark`].
    pub fn decode(byte: u8, scheme: MarkerScheme) -> Self {
        match byte {
            0 => Element::Space,
            1 => Element::Mark,
            _ => match scheme {
                MarkerScheme::BarHeight => match byte {
                    b'N' => Element::Height(BarHeight::Normal),
                    b'G' => Element::Height(BarHeight::Guard),
                    b'S' => Element::Height(BarHeight::Short),
                    _ => unknown_marker(byte),
                },
                MarkerScheme::Color => match ModuleColor::from_code(byte) {
                    Some(color) => Element::Color(color),
                    None => unknown_marker(byte),
                },
                MarkerScheme::Plain => unknown_marker(byte),
            },
        }
    }

    /// Whether the element takes up one element width.
    pub fn occupies_width(self) -> bool {
        !matches!(self, Element::Height(_))
    }
}

fn unknown_marker(byte: u8) -> Element {
    log::warn!("unrecognised marker byte {byte:#04x}, drawing it as a mark");
    Element::Mark
}

/// One row of encoded elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    data: Vec<u8>,
    /// Height in element widths; `0.0` means "use the configured bar height".
    height: f32,
}

impl Row {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, height: 0.0 }
    }

    pub fn with_height(data: Vec<u8>, height: f32) -> Self {
        Self {
            data,
            height: height.max(0.0),
        }
    }

    /// Build a row from a `'0'`/`'1'` pattern; any other character is kept as a marker byte.
    pub fn from_pattern(pattern: &str) -> Self {
        let data = pattern
            .bytes()
            .map(|b| match b {
                b'0' => 0,
                b'1' => 1,
                other => other,
            })
            .collect();
        Self::new(data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn elements(&self, scheme: MarkerScheme) -> impl Iterator<Item = Element> + '_ {
        self.data.iter().map(move |&b| Element::decode(b, scheme))
    }

    /// Number of elements that occupy width.
    pub fn width(&self, scheme: MarkerScheme) -> usize {
        self.elements(scheme).filter(|e| e.occupies_width()).count()
    }

    pub fn leading_spaces(&self) -> usize {
        self.data.iter().take_while(|&&b| b == 0).count()
    }
}

/// Text fields of an EAN/UPC symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuardText {
    /// Digit printed left of the left guard (EAN-13 number system, UPC-A first digit).
    pub left_character: String,
    pub left_text: String,
    pub right_text: String,
    /// Digit printed right of the right guard (UPC-A/UPC-E check digit).
    pub right_character: String,
    pub supplement_text: String,
    /// Add-on width in elements.
    pub supplement_width: usize,
    pub elements_per_character: usize,
}

/// An encoded symbol, ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub symbology: Symbology,
    /// Drawing order, top row first.
    pub rows: Vec<Row>,
    pub barcode_text: String,
    pub check_digit_text: String,
    /// Only for the EAN/UPC family.
    pub guard_text: Option<GuardText>,
    /// Elements per character, used to inset Codablock-F row separators.
    pub elements_per_character: usize,
}

impl Symbol {
    pub fn new(symbology: Symbology, rows: Vec<Row>) -> Self {
        Self {
            symbology,
            rows,
            barcode_text: String::new(),
            check_digit_text: String::new(),
            guard_text: None,
            elements_per_character: 0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.barcode_text = text.into();
        self
    }

    pub fn with_check_digit(mut self, text: impl Into<String>) -> Self {
        self.check_digit_text = text.into();
        self
    }

    pub fn with_guard_text(mut self, guard: GuardText) -> Self {
        self.elements_per_character = guard.elements_per_character;
        self.guard_text = Some(guard);
        self
    }

    pub fn with_elements_per_character(mut self, count: usize) -> Self {
        self.elements_per_character = count;
        self
    }

    pub fn marker_scheme(&self) -> MarkerScheme {
        self.symbology.marker_scheme()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Turns a message into a [`Symbol`]. Symbology options live in the implementor.
pub trait Encoder {
    fn symbology(&self) -> Symbology;

    fn encode(&self, message: &str) -> Result<Symbol>;
}
