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

use crate::array_2d::Coordinate;
use crate::draw_iterator::DrawIterator;
use crate::encoding::{encode_text, ByteProfile};
use crate::error::Result;
use crate::error_correction::{ErrorCorrectionEncoder, ErrorCorrectionLevel};
use crate::mask::MaskPattern;
use crate::matrix::{Category, Color, Matrix};
use crate::qr_version::Version;
use core::fmt;
use tracing::debug;

/// A finished QR symbol: masked, with format and version information written
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QrCode {
    matrix: Matrix,
    error_correction: ErrorCorrectionLevel,
    mask: MaskPattern,
}

impl QrCode {
    pub fn generator<'a>() -> QrCodeGenerator<'a> {
        QrCodeGenerator::default()
    }

    pub fn version(&self) -> Version {
        self.matrix.version()
    }

    /// Number of modules along one side, without quiet zone
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    pub fn error_correction_level(&self) -> ErrorCorrectionLevel {
        self.error_correction
    }

    pub fn mask_pattern(&self) -> MaskPattern {
        self.mask
    }

    /// Color of the module, or `None` outside the symbol
    pub fn color(&self, row: usize, column: usize) -> Option<Color> {
        self.matrix
            .module(Coordinate::new(row, column))
            .map(Color::from)
    }

    /// Category of the module, or `None` outside the symbol
    pub fn category(&self, row: usize, column: usize) -> Option<Category> {
        self.matrix
            .module(Coordinate::new(row, column))
            .and_then(|module| module.category())
    }

    /// Iterates every module row by row, surrounded by `quiet_zone` light modules
    pub fn draw_iter(&self, quiet_zone: usize) -> DrawIterator<'_> {
        DrawIterator::new(&self.matrix, quiet_zone)
    }
}

impl fmt::Display for QrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}

/// Builder for [`QrCode`]
#[derive(Clone, Debug)]
pub struct QrCodeGenerator<'a> {
    text: &'a str,
    error_correction: ErrorCorrectionLevel,
    byte_profile: ByteProfile,
    mask: Option<MaskPattern>,
}

impl Default for QrCodeGenerator<'_> {
    fn default() -> Self {
        QrCodeGenerator {
            text: "",
            error_correction: ErrorCorrectionLevel::Medium,
            byte_profile: ByteProfile::default(),
            mask: None,
        }
    }
}

impl<'a> QrCodeGenerator<'a> {
    pub fn with_text(mut self, text: &'a str) -> Self {
        self.text = text;
        self
    }

    pub fn with_error_correction_level(mut self, error_correction: ErrorCorrectionLevel) -> Self {
        self.error_correction = error_correction;
        self
    }

    pub fn with_byte_profile(mut self, byte_profile: ByteProfile) -> Self {
        self.byte_profile = byte_profile;
        self
    }

    /// Commits this mask instead of the one with the lowest penalty
    pub fn with_mask_pattern(mut self, mask: MaskPattern) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn build(&self) -> Result<QrCode> {
        let encoded = encode_text(self.text, self.error_correction, self.byte_profile)?;
        let version = encoded.version();

        let error_corrected = ErrorCorrectionEncoder {
            version,
            error_correction: self.error_correction,
        }
        .encode(&encoded.codewords());

        let mut matrix = Matrix::with_function_patterns(version);
        matrix.place_data(&error_corrected.codewords);

        let (mask, matrix) = match self.mask {
            Some(mask) => (mask, matrix.finish(self.error_correction, mask)),
            None => matrix.finish_with_best_mask(self.error_correction),
        };

        debug!(
            version = version.number(),
            error_correction = ?self.error_correction,
            segments = encoded.segments().len(),
            mask = mask.reference(),
            "built qr code"
        );

        Ok(QrCode {
            matrix,
            error_correction: self.error_correction,
            mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::QrCode;
    use crate::encoding::ByteProfile;
    use crate::error::ErrorKind;
    use crate::error_correction::ErrorCorrectionLevel;
    use crate::mask::MaskPattern;
    use crate::matrix::{Category, Color};

    fn build(text: &str, level: ErrorCorrectionLevel) -> QrCode {
        QrCode::generator()
            .with_text(text)
            .with_error_correction_level(level)
            .build()
            .unwrap()
    }

    #[test]
    fn hello_medium() {
        let qrcode = build("HELLO", ErrorCorrectionLevel::Medium);

        assert_eq!(qrcode.version().number(), 1);
        assert_eq!(qrcode.width(), 21);
        assert_eq!(qrcode.error_correction_level(), ErrorCorrectionLevel::Medium);
        assert_eq!(qrcode.mask_pattern(), MaskPattern::new(2).unwrap());
        assert_eq!(qrcode.color(0, 0), Some(Color::Dark));
        assert_eq!(qrcode.category(0, 0), Some(Category::Finder));
        assert_eq!(qrcode.category(7, 7), Some(Category::Separator));
        assert_eq!(qrcode.category(6, 10), Some(Category::Timing));
        assert_eq!(qrcode.category(20, 20), Some(Category::Data));
        assert_eq!(qrcode.category(13, 8), Some(Category::FormatInfo));
        assert_eq!(qrcode.color(13, 8), Some(Color::Dark));
        assert_eq!(qrcode.color(21, 0), None);
        assert_eq!(qrcode.category(0, 21), None);
    }

    #[test]
    fn selected_masks() {
        let numbers = build("01234567", ErrorCorrectionLevel::Medium);
        assert_eq!(numbers.mask_pattern().reference(), 0);

        let hello = build("HELLO WORLD", ErrorCorrectionLevel::Quartile);
        assert_eq!(hello.version().number(), 1);
        assert_eq!(hello.mask_pattern().reference(), 6);

        let hello = build("HELLO WORLD", ErrorCorrectionLevel::High);
        assert_eq!(hello.version().number(), 2);
        assert_eq!(hello.mask_pattern().reference(), 5);
    }

    #[test]
    fn committed_mask_has_lowest_penalty() {
        let text = "https://example.com/dots";
        let level = ErrorCorrectionLevel::Low;
        let selected = build(text, level);

        let penalties: Vec<(usize, u8)> = MaskPattern::all()
            .map(|mask| {
                let forced = QrCode::generator()
                    .with_text(text)
                    .with_error_correction_level(level)
                    .with_mask_pattern(mask)
                    .build()
                    .unwrap();
                (forced.matrix.score(), mask.reference())
            })
            .collect();

        let minimum = penalties.iter().min().unwrap();
        assert_eq!(selected.mask_pattern().reference(), minimum.1);
        assert_eq!(minimum, &(436, 6));
    }

    #[test]
    fn forced_mask() {
        let mask = MaskPattern::new(3).unwrap();
        let forced = QrCode::generator()
            .with_text("HELLO")
            .with_mask_pattern(mask)
            .build()
            .unwrap();

        assert_eq!(forced.mask_pattern(), mask);
        assert_ne!(forced, build("HELLO", ErrorCorrectionLevel::Medium));
    }

    #[test]
    fn deterministic() {
        let text = "Deterministic output for identical input";
        assert_eq!(
            build(text, ErrorCorrectionLevel::High),
            build(text, ErrorCorrectionLevel::High)
        );
    }

    #[test]
    fn version_information_from_version_7() {
        let text = "a".repeat(150);
        let qrcode = build(&text, ErrorCorrectionLevel::Low);
        let width = qrcode.width();

        assert!(qrcode.version().number() >= 7);
        assert_eq!(qrcode.category(0, width - 11), Some(Category::VersionInfo));
        assert_eq!(qrcode.category(width - 11, 0), Some(Category::VersionInfo));
        for row in 0..6 {
            for column in width - 11..width - 8 {
                assert_eq!(qrcode.color(row, column), qrcode.color(column, row));
            }
        }

        let small = build("HELLO", ErrorCorrectionLevel::Low);
        assert_eq!(small.category(0, 10), Some(Category::Data));
    }

    #[test]
    fn empty_text() {
        let qrcode = build("", ErrorCorrectionLevel::High);
        assert_eq!(qrcode.version().number(), 1);
    }

    #[test]
    fn errors_propagate() {
        let error = QrCode::generator()
            .with_text("caf\u{e9} \u{2615}")
            .with_byte_profile(ByteProfile::Iso8859_1)
            .build()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Encoding);
        assert_eq!(error.code(), "encoding.unsupported_character");

        let text = "1".repeat(7090);
        let error = QrCode::generator()
            .with_text(&text)
            .with_error_correction_level(ErrorCorrectionLevel::Low)
            .build()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::CapacityExceeded);
    }

    #[test]
    fn terminal_preview() {
        let qrcode = build("HELLO", ErrorCorrectionLevel::Medium);
        let preview = qrcode.to_string();
        assert_eq!(preview.lines().count(), 11);
        assert!(preview.starts_with("█▀▀▀▀▀█ "));
    }
}
