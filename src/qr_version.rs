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

use crate::encoding::EncodingMode;
use crate::error_correction::ErrorCorrectionLevel;

pub const fn version_to_size(version: u8) -> usize {
    version as usize * 4 + 17
}

// Indexed by [level][version]; version 0 is unused. ISO/IEC 18004 table 9.
const ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    // Low
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    // Medium
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    // Quartile
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    // High
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

const ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    // Low
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    // Medium
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    // Quartile
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    // High
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

/// Symbol version, 1 (21x21 modules) up to 40 (177x177 modules).
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Version {
    pub(crate) version: u8,
}

impl Version {
    pub const MIN: Version = Version { version: 1 };
    pub const MAX: Version = Version { version: 40 };

    pub fn new(version: u8) -> Option<Self> {
        if (Self::MIN.version..=Self::MAX.version).contains(&version) {
            Some(Self { version })
        } else {
            None
        }
    }

    /// All versions, smallest first
    pub fn all() -> impl Iterator<Item = Version> {
        (Self::MIN.version..=Self::MAX.version).map(|version| Version { version })
    }

    pub const fn number(&self) -> u8 {
        self.version
    }

    pub const fn width(&self) -> usize {
        version_to_size(self.version)
    }

    pub fn has_version_information(&self) -> bool {
        self.version >= 7
    }

    /// Versions sharing the same character count indicator lengths: 1-9, 10-26
    /// and 27-40
    pub(crate) fn character_count_range(&self) -> usize {
        match self.version {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        }
    }

    pub fn character_count_indicator_bit_length(&self, encoding: EncodingMode) -> usize {
        let range = self.character_count_range();
        match encoding {
            EncodingMode::Numeric => [10, 12, 14][range],
            EncodingMode::Alphanumeric => [9, 11, 13][range],
            EncodingMode::Byte => [8, 16, 16][range],
        }
    }

    /// Number of modules available for data and error correction codewords,
    /// including the remainder bits.
    pub fn raw_data_module_count(&self) -> usize {
        let version = self.version as usize;
        let mut count = (16 * version + 128) * version + 64;
        if version >= 2 {
            let alignment_count = version / 7 + 2;
            count -= (25 * alignment_count - 10) * alignment_count - 55;
            if version >= 7 {
                count -= 36;
            }
        }
        count
    }

    pub fn total_codeword_count(&self) -> usize {
        self.raw_data_module_count() / 8
    }

    pub fn remainder_bit_count(&self) -> usize {
        self.raw_data_module_count() % 8
    }

    pub fn data_codeword_count(&self, error_correction: ErrorCorrectionLevel) -> usize {
        let (ecc_per_block, blocks) = self.error_correction_blocks(error_correction);
        self.total_codeword_count() - ecc_per_block * blocks
    }

    pub fn data_codeword_bit_len(&self, error_correction: ErrorCorrectionLevel) -> usize {
        self.data_codeword_count(error_correction) * 8
    }

    /// Returns the error correction codewords per block and the number of blocks.
    pub fn error_correction_blocks(&self, error_correction: ErrorCorrectionLevel) -> (usize, usize) {
        let level = error_correction.table_index();
        let version = self.version as usize;
        (
            ECC_CODEWORDS_PER_BLOCK[level][version] as usize,
            ERROR_CORRECTION_BLOCKS[level][version] as usize,
        )
    }

    /// Row/column coordinates of the alignment pattern centers, ascending.
    pub fn alignment_pattern_positions(&self) -> Vec<usize> {
        let version = self.version as usize;
        if version == 1 {
            return Vec::new();
        }
        let count = version / 7 + 2;
        let step = (version * 8 + count * 3 + 5) / (count * 4 - 4) * 2;
        let last = self.width() - 7;
        let mut positions: Vec<usize> = (0..count - 1).map(|i| last - i * step).collect();
        positions.push(6);
        positions.reverse();
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::Version;
    use crate::encoding::EncodingMode;
    use crate::error_correction::ErrorCorrectionLevel::{self, High, Low, Medium, Quartile};

    fn version(version: u8) -> Version {
        Version::new(version).unwrap()
    }

    #[test]
    fn bounds() {
        assert_eq!(Version::new(0), None);
        assert_eq!(Version::new(41), None);
        assert_eq!(Version::all().count(), 40);
        assert_eq!(Version::MIN.width(), 21);
        assert_eq!(Version::MAX.width(), 177);
    }

    #[test]
    fn total_codewords() {
        let expected = [
            26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901,
            991, 1085, 1156, 1258, 1364, 1474, 1588,
        ];
        for (index, count) in expected.iter().enumerate() {
            assert_eq!(version(index as u8 + 1).total_codeword_count(), *count);
        }
        assert_eq!(version(40).total_codeword_count(), 3706);
    }

    #[test]
    fn remainder_bits() {
        assert_eq!(version(1).remainder_bit_count(), 0);
        assert_eq!(version(2).remainder_bit_count(), 7);
        assert_eq!(version(14).remainder_bit_count(), 3);
        assert_eq!(version(21).remainder_bit_count(), 4);
        assert_eq!(version(40).remainder_bit_count(), 0);
    }

    #[test]
    fn data_capacity() {
        let cases: [(u8, ErrorCorrectionLevel, usize); 8] = [
            (1, Low, 19),
            (1, Medium, 16),
            (1, Quartile, 13),
            (1, High, 9),
            (5, Quartile, 62),
            (40, Low, 2956),
            (40, Medium, 2334),
            (40, High, 1276),
        ];
        for (number, level, count) in cases {
            assert_eq!(version(number).data_codeword_count(level), count);
        }
    }

    #[test]
    fn block_layout() {
        assert_eq!(version(5).error_correction_blocks(Quartile), (18, 4));
        assert_eq!(version(4).error_correction_blocks(High), (16, 4));
        assert_eq!(version(40).error_correction_blocks(High), (30, 81));
    }

    #[test]
    fn character_count_bits() {
        assert_eq!(
            version(9).character_count_indicator_bit_length(EncodingMode::Byte),
            8
        );
        assert_eq!(
            version(10).character_count_indicator_bit_length(EncodingMode::Byte),
            16
        );
        assert_eq!(
            version(26).character_count_indicator_bit_length(EncodingMode::Alphanumeric),
            11
        );
        assert_eq!(
            version(27).character_count_indicator_bit_length(EncodingMode::Numeric),
            14
        );
    }

    #[test]
    fn alignment_positions() {
        assert!(version(1).alignment_pattern_positions().is_empty());
        assert_eq!(version(2).alignment_pattern_positions(), [6, 18]);
        assert_eq!(version(7).alignment_pattern_positions(), [6, 22, 38]);
        assert_eq!(
            version(32).alignment_pattern_positions(),
            [6, 34, 60, 86, 112, 138]
        );
        assert_eq!(
            version(40).alignment_pattern_positions(),
            [6, 30, 58, 86, 114, 142, 170]
        );
    }
}
