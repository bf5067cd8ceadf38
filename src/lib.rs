/* Copyright (C) 2021 Casper Meijn <casper@meijn.net>
 * SPDX-License-Identifier: GPL-3.0-or-later
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! QR code generator that renders data modules as round dots.
//!
//! ```
//! use dotted_qr::{generate_png, ErrorCorrectionLevel};
//!
//! let png = generate_png("HELLO", ErrorCorrectionLevel::Medium, 500, 0.85).unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

mod array_2d;
mod blocks;
pub mod buffer;
mod config;
mod draw_iterator;
mod encoding;
mod error;
mod error_correction;
mod export;
mod format;
mod mask;
mod matrix;
mod qr_version;
mod qrcode;
mod render;

pub use config::GeneratorConfig;
pub use draw_iterator::{CoordinatedModule, DrawIterator};
pub use encoding::ByteProfile;
pub use error::{Error, ErrorKind, Result};
pub use error_correction::ErrorCorrectionLevel;
pub use export::to_png;
pub use mask::MaskPattern;
pub use matrix::{Category, Color};
pub use qr_version::Version;
pub use qrcode::{QrCode, QrCodeGenerator};
pub use render::{AlignmentStyle, PixelBuffer, RenderOptions, Renderer};

fn generator_config(
    error_correction: ErrorCorrectionLevel,
    resolution: u32,
    dot_ratio: f64,
) -> GeneratorConfig {
    GeneratorConfig {
        error_correction,
        render: RenderOptions {
            resolution,
            dot_ratio,
            ..RenderOptions::default()
        },
        ..GeneratorConfig::default()
    }
}

/// Encodes `text` in the smallest symbol that holds it and renders it on a
/// `resolution` x `resolution` canvas with a quiet zone of four modules.
pub fn generate(
    text: &str,
    error_correction: ErrorCorrectionLevel,
    resolution: u32,
    dot_ratio: f64,
) -> Result<PixelBuffer> {
    generator_config(error_correction, resolution, dot_ratio).generate(text)
}

/// Like [`generate`], encoded as PNG
pub fn generate_png(
    text: &str,
    error_correction: ErrorCorrectionLevel,
    resolution: u32,
    dot_ratio: f64,
) -> Result<Vec<u8>> {
    generator_config(error_correction, resolution, dot_ratio).generate_png(text)
}

#[cfg(test)]
mod tests {
    use crate::{
        generate, generate_png, Color, ErrorCorrectionLevel, ErrorKind, PixelBuffer, QrCode,
    };

    const LEVELS: [ErrorCorrectionLevel; 4] = [
        ErrorCorrectionLevel::Low,
        ErrorCorrectionLevel::Medium,
        ErrorCorrectionLevel::Quartile,
        ErrorCorrectionLevel::High,
    ];

    fn payload(len: usize) -> String {
        "The quick brown fox jumps over the lazy dog 0123456789 HTTPS://EXAMPLE.COM/ "
            .chars()
            .cycle()
            .take(len)
            .collect()
    }

    fn build(text: &str, level: ErrorCorrectionLevel) -> QrCode {
        QrCode::generator()
            .with_text(text)
            .with_error_correction_level(level)
            .build()
            .unwrap()
    }

    /// Decodes the module grid, drawn with square modules of 4 px
    fn decode_modules(qrcode: &QrCode) -> String {
        const SCALE: usize = 4;
        const QUIET_ZONE: usize = 4;
        let size = (qrcode.width() + 2 * QUIET_ZONE) * SCALE;

        let mut image = rqrr::PreparedImage::prepare_from_greyscale(size, size, |x, y| {
            let (row, column) = (y / SCALE, x / SCALE);
            let dark = row >= QUIET_ZONE
                && column >= QUIET_ZONE
                && qrcode.color(row - QUIET_ZONE, column - QUIET_ZONE) == Some(Color::Dark);
            if dark {
                0
            } else {
                255
            }
        });
        let grids = image.detect_grids();
        assert_eq!(grids.len(), 1);
        let (meta, content) = grids[0].decode().unwrap();
        assert_eq!(meta.version.0, qrcode.version().number() as usize);
        assert_eq!(meta.mask as u8, qrcode.mask_pattern().reference());
        content
    }

    fn decode_pixels(buffer: &PixelBuffer) -> String {
        let mut image = rqrr::PreparedImage::prepare_from_greyscale(
            buffer.width() as usize,
            buffer.height() as usize,
            |x, y| buffer.get(x as u32, y as u32).unwrap_or(255),
        );
        let grids = image.detect_grids();
        assert_eq!(grids.len(), 1);
        grids[0].decode().unwrap().1
    }

    #[test]
    fn round_trip_short_and_medium() {
        for level in LEVELS {
            for len in [10, 200] {
                let text = payload(len);
                assert_eq!(decode_modules(&build(&text, level)), text, "{level:?} {len}");
            }
        }
    }

    #[test]
    fn round_trip_large() {
        // 2000 bytes exceed the version 40 capacity at Q and H
        for (level, len) in [
            (ErrorCorrectionLevel::Low, 2000),
            (ErrorCorrectionLevel::Medium, 2000),
            (ErrorCorrectionLevel::Quartile, 1600),
            (ErrorCorrectionLevel::High, 1200),
        ] {
            let text = payload(len);
            let qrcode = build(&text, level);
            assert!(qrcode.version().number() >= 27);
            assert_eq!(decode_modules(&qrcode), text, "{level:?}");
        }
    }

    #[test]
    fn round_trip_unicode() {
        let text = "Gr\u{fc}\u{df}e aus K\u{f6}ln \u{2615}";
        assert_eq!(decode_modules(&build(text, ErrorCorrectionLevel::Medium)), text);
    }

    #[test]
    fn round_trip_dots() {
        let text = "https://example.com/dotted";
        let buffer = generate(text, ErrorCorrectionLevel::High, 600, 0.85).unwrap();
        assert_eq!(decode_pixels(&buffer), text);
    }

    #[test]
    fn capacity_boundary() {
        let bytes = "a".repeat(2953);
        assert_eq!(build(&bytes, ErrorCorrectionLevel::Low).version().number(), 40);
        let error = QrCode::generator()
            .with_text(&"a".repeat(2954))
            .with_error_correction_level(ErrorCorrectionLevel::Low)
            .build()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(error.code(), "capacity.exceeded");

        let digits = "7".repeat(7089);
        assert_eq!(build(&digits, ErrorCorrectionLevel::Low).version().number(), 40);
        let error = generate(&"7".repeat(7090), ErrorCorrectionLevel::Low, 1000, 0.85).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::CapacityExceeded);
    }

    #[test]
    fn png_is_deterministic() {
        let first = generate_png("HELLO", ErrorCorrectionLevel::Medium, 1000, 0.85).unwrap();
        let second = generate_png("HELLO", ErrorCorrectionLevel::Medium, 1000, 0.85).unwrap();
        assert_eq!(first, second);

        let decoded = image::load_from_memory(&first).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (1000, 1000));
        assert_eq!(decoded.get_pixel(155, 155).0, [0]);
        assert_eq!(decoded.get_pixel(10, 10).0, [255]);
    }

    #[test]
    fn invalid_dot_ratio() {
        let error = generate("HELLO", ErrorCorrectionLevel::Medium, 1000, 1.5).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn public_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QrCode>();
        assert_send_sync::<PixelBuffer>();
        assert_send_sync::<crate::Renderer>();
        assert_send_sync::<crate::Error>();
    }
}
