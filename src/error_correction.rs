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

use crate::blocks::{interleave, Block, BlockLengthIterator};
use crate::qr_version::Version;
use serde::{Deserialize, Serialize};

/// Qr codes use Reed–Solomon error correction
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    /// Allows recovery of 7% of missing data
    #[serde(alias = "L")]
    Low,
    /// Allows recovery of 15% of missing data
    #[serde(alias = "M")]
    Medium,
    /// Allows recovery of 25% of missing data
    #[serde(alias = "Q")]
    Quartile,
    /// Allows recovery of 30% of missing data
    #[serde(alias = "H")]
    High,
}

impl ErrorCorrectionLevel {
    pub(crate) fn table_index(self) -> usize {
        match self {
            ErrorCorrectionLevel::Low => 0,
            ErrorCorrectionLevel::Medium => 1,
            ErrorCorrectionLevel::Quartile => 2,
            ErrorCorrectionLevel::High => 3,
        }
    }

    /// The two bits identifying this level in the format information
    pub(crate) fn format_bits(self) -> u8 {
        match self {
            ErrorCorrectionLevel::Low => 0b01,
            ErrorCorrectionLevel::Medium => 0b00,
            ErrorCorrectionLevel::Quartile => 0b11,
            ErrorCorrectionLevel::High => 0b10,
        }
    }
}

/// Interleaved data and error correction codewords, ready for placement
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorCorrectedData {
    pub(crate) version: Version,
    pub(crate) error_correction: ErrorCorrectionLevel,
    pub(crate) codewords: Vec<u8>,
}

pub struct ErrorCorrectionEncoder {
    pub(crate) version: Version,
    pub(crate) error_correction: ErrorCorrectionLevel,
}

impl ErrorCorrectionEncoder {
    /// Splits the data codewords into blocks, appends the Reed–Solomon
    /// remainder of every block and interleaves the result.
    ///
    /// `data` must hold exactly the data codeword capacity of the version.
    pub fn encode(&self, data: &[u8]) -> ErrorCorrectedData {
        debug_assert_eq!(
            data.len(),
            self.version.data_codeword_count(self.error_correction)
        );
        let (ecc_len, _) = self.version.error_correction_blocks(self.error_correction);
        let encoder = reed_solomon::Encoder::new(ecc_len);

        let blocks: Vec<Block> = BlockLengthIterator::new(self.version, self.error_correction)
            .map(|length| {
                let block_data = &data[length.data_pos..length.data_pos + length.data_len];
                let encoded = encoder.encode(block_data);
                Block {
                    data: block_data,
                    ecc: encoded.ecc().to_vec(),
                }
            })
            .collect();

        ErrorCorrectedData {
            version: self.version,
            error_correction: self.error_correction,
            codewords: interleave(&blocks),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error_correction::{ErrorCorrectionEncoder, ErrorCorrectionLevel};
    use crate::qr_version::Version;

    #[test]
    fn error_correction_encoding() {
        // Version 1-M with text "01234567"
        let data = [
            0b00010000, 0b00100000, 0b00001100, 0b01010110, 0b01100001, 0b10000000, 0b11101100,
            0b00010001, 0b11101100, 0b00010001, 0b11101100, 0b00010001, 0b11101100, 0b00010001,
            0b11101100, 0b00010001,
        ];

        let encoder = ErrorCorrectionEncoder {
            version: Version { version: 1 },
            error_correction: ErrorCorrectionLevel::Medium,
        };

        let encoded = encoder.encode(&data);
        assert_eq!(
            encoded.codewords,
            [
                0b00010000, 0b00100000, 0b00001100, 0b01010110, 0b01100001, 0b10000000, 0b11101100,
                0b00010001, 0b11101100, 0b00010001, 0b11101100, 0b00010001, 0b11101100, 0b00010001,
                0b11101100, 0b00010001, 0b10100101, 0b00100100, 0b11010100, 0b11000001, 0b11101101,
                0b00110110, 0b11000111, 0b10000111, 0b00101100, 0b01010101
            ]
        )
    }

    #[test]
    fn codeword_count_matches_version() {
        for version in [1, 7, 21, 40] {
            let version = Version::new(version).unwrap();
            let level = ErrorCorrectionLevel::High;
            let data = vec![0xA5; version.data_codeword_count(level)];
            let encoded = ErrorCorrectionEncoder {
                version,
                error_correction: level,
            }
            .encode(&data);
            assert_eq!(encoded.codewords.len(), version.total_codeword_count());
        }
    }

    #[test]
    fn level_from_short_name() {
        let level: ErrorCorrectionLevel = serde_json::from_str("\"Q\"").unwrap();
        assert_eq!(level, ErrorCorrectionLevel::Quartile);
        let level: ErrorCorrectionLevel = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(level, ErrorCorrectionLevel::High);
    }
}
