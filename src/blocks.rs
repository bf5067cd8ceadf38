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
use crate::qr_version::Version;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub struct BlockLength {
    pub block_number: usize,
    pub block_count: usize,
    pub data_pos: usize,
    pub data_len: usize,
    pub ecc_len: usize,
}

/// Walks the block structure of a version and error correction level. When the
/// data codewords do not divide evenly, the first blocks are one codeword
/// shorter than the remaining ones.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub struct BlockLengthIterator {
    block_count: usize,
    short_block_count: usize,
    short_data_len: usize,
    ecc_len: usize,
    next_block: usize,
    data_pos: usize,
}

impl BlockLengthIterator {
    pub fn new(version: Version, error_correction: ErrorCorrectionLevel) -> BlockLengthIterator {
        let data_len = version.data_codeword_count(error_correction);
        let (ecc_len, block_count) = version.error_correction_blocks(error_correction);
        BlockLengthIterator {
            block_count,
            short_block_count: block_count - data_len % block_count,
            short_data_len: data_len / block_count,
            ecc_len,
            next_block: 0,
            data_pos: 0,
        }
    }
}

impl Iterator for BlockLengthIterator {
    type Item = BlockLength;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_block >= self.block_count {
            return None;
        }
        let data_len = if self.next_block < self.short_block_count {
            self.short_data_len
        } else {
            self.short_data_len + 1
        };
        let block = BlockLength {
            block_number: self.next_block,
            block_count: self.block_count,
            data_pos: self.data_pos,
            data_len,
            ecc_len: self.ecc_len,
        };
        self.next_block += 1;
        self.data_pos += data_len;
        Some(block)
    }
}

pub struct Block<'a> {
    pub data: &'a [u8],
    pub ecc: Vec<u8>,
}

/// Reads the data codewords column by column across all blocks (shorter blocks
/// drop out once exhausted), followed by the error correction codewords in the
/// same order.
pub fn interleave(blocks: &[Block]) -> Vec<u8> {
    let max_data_len = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
    let max_ecc_len = blocks.iter().map(|b| b.ecc.len()).max().unwrap_or(0);
    let total = blocks.iter().map(|b| b.data.len() + b.ecc.len()).sum();

    let mut codewords = Vec::with_capacity(total);
    for index in 0..max_data_len {
        codewords.extend(blocks.iter().filter_map(|b| b.data.get(index)));
    }
    for index in 0..max_ecc_len {
        codewords.extend(blocks.iter().filter_map(|b| b.ecc.get(index)));
    }
    codewords
}
