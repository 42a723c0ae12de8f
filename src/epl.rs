//! EPL2 print jobs for direct thermal label printers.
//!
//! A rendered symbol goes out as a single `GW` bitmap: packed 1-bit rows, MSB first,
//! 0 = black before optional inversion.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::consts::{DARKNESS, INVERT_BITS, LABEL_GAP, SPEED};

/// Printer-side job settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EplSettings {
    /// `D0`..`D15`.
    pub darkness: u8,
    /// `S1`..`S6`.
    pub speed: u8,
    /// Gap between labels in dots.
    pub gap: u32,
    /// Flip every `GW` bit; some firmware expects 1 = white.
    pub invert: bool,
}

impl Default for EplSettings {
    fn default() -> Self {
        Self {
            darkness: DARKNESS,
            speed: SPEED,
            gap: LABEL_GAP,
            invert: INVERT_BITS,
        }
    }
}

/// Append one EPL command, CRLF-terminated.
pub fn epl_line(buf: &mut Vec<u8>, command: impl AsRef<[u8]>) {
    buf.extend(command.as_ref().iter().chain(b"\r\n"));
}

/// Pack a 1-bit image (luma < 128 is ink) into row bytes.
pub fn image_to_row_bytes(img: &GrayImage, invert: bool) -> Vec<u8> {
    let bpr = bytes_per_row(img.width());
    let mut out = vec![0u8; bpr * img.height() as usize];

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel.0[0] < 128 {
            let (x, y) = (x as usize, y as usize);
            out[y * bpr + x / 8] |= 1 << (7 - x % 8);
        }
    }
    if invert {
        out.iter_mut().for_each(|b| *b = !*b);
    }
    out
}

/// Append a `GW` header, the raw rows and the closing CRLF.
pub fn gw_bytes(buf: &mut Vec<u8>, x: u32, y: u32, w: u32, h: u32, rows: &[u8]) {
    epl_line(buf, format!("GW{},{},{},{}", x, y, bytes_per_row(w), h));
    buf.extend_from_slice(rows);
    buf.extend_from_slice(b"\r\n");
}

/// One-label job printing `image` at dot position (`x`, `y`). The label is sized to fit.
pub fn label_job(image: &GrayImage, x: u32, y: u32, settings: &EplSettings) -> Vec<u8> {
    let (w, h) = image.dimensions();
    let rows = image_to_row_bytes(image, settings.invert);
    log::debug!(
        "EPL job: {}x{} dots at ({}, {}), {} bitmap bytes",
        w,
        h,
        x,
        y,
        rows.len()
    );

    let mut buf = Vec::with_capacity(rows.len() + 64);
    epl_line(&mut buf, "N");
    epl_line(&mut buf, format!("q{}", x + w));
    epl_line(&mut buf, format!("Q{},{}", y + h, settings.gap));
    epl_line(&mut buf, format!("D{}", settings.darkness.min(15)));
    epl_line(&mut buf, format!("S{}", settings.speed.clamp(1, 6)));
    gw_bytes(&mut buf, x, y, w, h, &rows);
    epl_line(&mut buf, "P1");
    buf
}

fn bytes_per_row(width: u32) -> usize {
    width.div_ceil(8) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn checker(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| Luma([if (x + y) % 2 == 0 { 0 } else { 255 }]))
    }

    #[test]
    fn commands_end_in_crlf() {
        let mut buf = Vec::new();
        epl_line(&mut buf, "N");
        epl_line(&mut buf, format!("q{}", 812));
        epl_line(&mut buf, [0x41u8, 0x42]);
        assert_eq!(buf, b"N\r\nq812\r\nAB\r\n");
    }

    #[test]
    fn rows_pack_msb_first_and_pad() {
        let img = checker(10, 2);
        let rows = image_to_row_bytes(&img, false);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], 0b1010_1010);
        assert_eq!(rows[1], 0b1000_0000);
        assert_eq!(rows[2], 0b0101_0101);
        assert_eq!(rows[3], 0b0100_0000);
    }

    #[test]
    fn inversion_flips_every_bit() {
        let img = checker(8, 1);
        assert_eq!(image_to_row_bytes(&img, true), vec![0b0101_0101]);
    }

    #[test]
    fn job_layout() {
        let img = checker(16, 3);
        let settings = EplSettings {
            invert: false,
            ..EplSettings::default()
        };
        let job = label_job(&img, 4, 2, &settings);
        let header = b"N\r\nq20\r\nQ5,24\r\nD8\r\nS2\r\nGW4,2,2,3\r\n";
        assert!(job.starts_with(header));
        assert_eq!(job.len(), header.len() + 6 + 2 + 4);
        assert!(job.ends_with(b"\r\nP1\r\n"));
    }

    #[test]
    fn settings_are_clamped_on_output() {
        let img = checker(8, 1);
        let settings = EplSettings {
            darkness: 40,
            speed: 0,
            ..EplSettings::default()
        };
        let job = String::from_utf8_lossy(&label_job(&img, 0, 0, &settings)).into_owned();
        assert!(job.contains("D15\r\n"));
        assert!(job.contains("S1\r\n"));
    }
}
