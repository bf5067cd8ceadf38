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

use crate::error_correction::ErrorCorrectionLevel;
use crate::mask::MaskPattern;
use crate::qr_version::Version;

pub struct FormatEncoder {
    pub(crate) error_correction_level: ErrorCorrectionLevel,
    pub(crate) mask: MaskPattern,
}

impl FormatEncoder {
    /// BCH(15,5) code words of all 32 format values, already XORed with 0x5412
    fn masked_sequence(data_bits: u8) -> u16 {
        const SEQUENCES: [u16; 32] = [
            0x5412, 0x5125, 0x5e7c, 0x5b4b, 0x45f9, 0x40ce, 0x4f97, 0x4aa0, 0x77c4, 0x72f3,
            0x7daa, 0x789d, 0x662f, 0x6318, 0x6c41, 0x6976, 0x1689, 0x13be, 0x1ce7, 0x19d0,
            0x0762, 0x0255, 0x0d0c, 0x083b, 0x355f, 0x3068, 0x3f31, 0x3a06, 0x24b4, 0x2183,
            0x2eda, 0x2bed,
        ];
        SEQUENCES[usize::from(data_bits & 0b11111)]
    }

    pub fn encode(&self) -> u16 {
        let data = (self.error_correction_level.format_bits() << 3) | self.mask.reference();
        Self::masked_sequence(data)
    }
}

pub struct VersionEncoder {
    pub(crate) version: Version,
}

impl VersionEncoder {
    const GENERATOR: u32 = 0x1f25;

    /// 6 version bits followed by the 12 bit BCH(18,6) remainder
    pub fn encode(&self) -> u32 {
        let data = u32::from(self.version.number());
        let remainder = (0..12).fold(data, |rem, _| (rem << 1) ^ ((rem >> 11) * Self::GENERATOR));
        data << 12 | remainder
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatEncoder, VersionEncoder};
    use crate::error_correction::ErrorCorrectionLevel;
    use crate::mask::MaskPattern;
    use crate::qr_version::Version;

    fn bch_format(data: u16) -> u16 {
        let mut rem = data;
        for _ in 0..10 {
            rem = (rem << 1) ^ ((rem >> 9) * 0x537);
        }
        ((data << 10) | rem) ^ 0x5412
    }

    #[test]
    fn table_matches_bch_code() {
        for data in 0..32u16 {
            assert_eq!(FormatEncoder::masked_sequence(data as u8), bch_format(data));
        }
    }

    #[test]
    fn format_information() {
        let encoder = FormatEncoder {
            error_correction_level: ErrorCorrectionLevel::Medium,
            mask: MaskPattern::new(0b010).unwrap(),
        };
        assert_eq!(encoder.encode(), 0b101_1110_0111_1100);

        let encoder = FormatEncoder {
            error_correction_level: ErrorCorrectionLevel::Low,
            mask: MaskPattern::new(4).unwrap(),
        };
        assert_eq!(encoder.encode(), 0b110_0110_0010_1111);
    }

    #[test]
    fn version_information() {
        let encode = |version| {
            VersionEncoder {
                version: Version::new(version).unwrap(),
            }
            .encode()
        };
        assert_eq!(encode(7), 0x07c94);
        assert_eq!(encode(21), 0x15683);
        assert_eq!(encode(40), 0x28c69);
    }
}
