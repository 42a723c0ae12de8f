//! EAN-13 encoder.

use crate::error::{Error, Result};
use crate::symbol::{Encoder, GuardText, Row, Symbol, Symbology};

// Odd-parity (set A) digit patterns; set C is the complement, set B is C reversed.
const SET_A: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

// Set A/B choice for digits 2..7, selected by the leading digit. `true` is set B.
const PARITY: [[bool; 6]; 10] = [
    [false, false, false, false, false, false],
    [false, false, true, false, true, true],
    [false, false, true, true, false, true],
    [false, false, true, true, true, false],
    [false, true, false, false, true, true],
    [false, true, true, false, false, true],
    [false, true, true, true, false, true],
    [false, true, false, true, false, true],
    [false, true, false, true, true, false],
    [false, true, true, false, true, false],
];

const EDGE_GUARD: &str = "101";
const CENTRE_GUARD: &str = "01010";

/// EAN-13 with full-height guard bars and digits under the symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ean13Encoder;

impl Encoder for Ean13Encoder {
    fn symbology(&self) -> Symbology {
        Symbology::Ean13
    }

    fn encode(&self, message: &str) -> Result<Symbol> {
        let code = normalize_ean13(message)?;
        let digits: Vec<usize> = code.bytes().map(|b| (b - b'0') as usize).collect();
        let parity = PARITY[digits[0]];

        let mut pattern = String::with_capacity(100);
        pattern.push('G');
        pattern.push_str(EDGE_GUARD);
        pattern.push('N');
        for (i, &d) in digits[1..7].iter().enumerate() {
            if parity[i] {
                pattern.extend(complement(SET_A[d]).chars().rev());
            } else {
                pattern.push_str(SET_A[d]);
            }
        }
        pattern.push('G');
        pattern.push_str(CENTRE_GUARD);
        pattern.push('N');
        for &d in &digits[7..] {
            pattern.push_str(&complement(SET_A[d]));
        }
        pattern.push('G');
        pattern.push_str(EDGE_GUARD);

        let guard = GuardText {
            left_character: code[..1].to_string(),
            left_text: code[1..7].to_string(),
            right_text: code[7..].to_string(),
            elements_per_character: 7,
            ..GuardText::default()
        };
        Ok(Symbol::new(Symbology::Ean13, vec![Row::from_pattern(&pattern)])
            .with_text(&code[..12])
            .with_check_digit(&code[12..])
            .with_guard_text(guard))
    }
}

fn complement(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| if c == '0' { '1' } else { '0' })
        .collect()
}

/// Strip non-digits, then append the check digit to 12 digits or validate it on 13.
pub fn normalize_ean13(code: &str) -> Result<String> {
    let mut code: String = code.chars().filter(char::is_ascii_digit).collect();
    match code.len() {
        12 => {
            let check = ean13_check_digit(&code)?;
            code.push(char::from(b'0' + check));
            Ok(code)
        }
        13 => {
            let expected = ean13_check_digit(&code[..12])?;
            let last = code.as_bytes()[12] - b'0';
            if expected == last {
                Ok(code)
            } else {
                Err(Error::encode(
                    Symbology::Ean13,
                    format!("invalid check digit {last}, expected {expected}"),
                ))
            }
        }
        n => Err(Error::encode(
            Symbology::Ean13,
            format!("expected 12 or 13 digits, got {n}"),
        )),
    }
}

/// Modulo-10 check digit over 12 data digits, weights 1 and 3 alternating.
pub fn ean13_check_digit(digits: &str) -> Result<u8> {
    if digits.len() != 12 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::encode(
            Symbology::Ean13,
            "check digit needs exactly 12 digits",
        ));
    }
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 {
                d
            } else {
                d * 3
            }
        })
        .sum();
    Ok(((10 - sum % 10) % 10) as u8)
}
