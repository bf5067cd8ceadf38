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

use bitvec::prelude::*;

/// Growable MSB-first bit stream, the unit the data encoder writes into.
#[derive(Clone, Default, Debug, Eq, PartialEq)]
pub struct Buffer {
    bits: BitVec<u8, Msb0>,
}

impl Buffer {
    /// Creates a new empty buffer
    ///
    /// # Example
    ///```
    /// use dotted_qr::buffer::Buffer;
    /// let mut buffer = Buffer::new();
    /// assert!(buffer.to_bytes().is_empty());
    /// buffer.append_bytes(&[1, 2, 3]);
    /// assert_eq!(buffer.to_bytes(), [1, 2, 3]);
    ///```
    pub fn new() -> Buffer {
        Buffer {
            bits: BitVec::new(),
        }
    }

    /// Return the amount of bytes and bits written to the buffer
    ///
    /// # Example
    ///```
    /// use dotted_qr::buffer::Buffer;
    /// let mut buffer = Buffer::new();
    /// buffer.append_bytes(&[1, 2, 3]);
    /// buffer.append_bits(&[true, false, true, false]);
    /// assert_eq!(buffer.byte_bit_len(), (3, 4));
    ///```
    pub fn byte_bit_len(&self) -> (usize, usize) {
        (self.bits.len() / 8, self.bits.len() % 8)
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Adds a single bit to the buffer
    ///
    /// # Example
    ///```
    /// use dotted_qr::buffer::Buffer;
    /// let mut buffer = Buffer::new();
    /// buffer.append_bit(true);
    /// buffer.append_bit(false);
    /// buffer.append_bit(true);
    /// buffer.append_bit(false);
    /// assert_eq!(buffer.to_bytes(), [0b1010_0000]);
    ///```
    pub fn append_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Adds a sequence of bits to the buffer
    ///
    /// # Example
    ///```
    /// use dotted_qr::buffer::Buffer;
    /// let mut buffer = Buffer::new();
    /// buffer.append_bits(&[true, false, true, false]);
    /// assert_eq!(buffer.to_bytes(), [0b1010_0000]);
    ///```
    pub fn append_bits(&mut self, bits: &[bool]) {
        self.bits.extend(bits.iter().copied());
    }

    pub fn append_byte(&mut self, byte: u8) {
        self.bits.extend_from_bitslice(byte.view_bits::<Msb0>());
    }

    /// Adds multiple bytes to the buffer
    ///
    /// # Example
    ///```
    /// use dotted_qr::buffer::Buffer;
    /// let mut buffer = Buffer::new();
    /// buffer.append_bit(true);
    /// buffer.append_bytes(&[1, 2]);
    /// assert_eq!(buffer.to_bytes(), [0b1000_0000, 0b1000_0001, 0b0000_0000]);
    ///```
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.append_byte(*byte)
        }
    }

    /// Adds the lowest `bit_len` bits of a number, most significant first
    ///
    /// # Example
    ///```
    /// use dotted_qr::buffer::Buffer;
    /// let mut buffer = Buffer::new();
    /// buffer.append_number(3, 4);
    /// buffer.append_number(0b111100, 6);
    /// buffer.append_number(2, 2);
    /// assert_eq!(buffer.to_bytes(), [0b0011_1111, 0b0010_0000]);
    ///```
    pub fn append_number(&mut self, number: u32, bit_len: usize) {
        debug_assert!(bit_len <= 32);
        for index in (0..bit_len).rev() {
            self.append_bit((number >> index) & 1 != 0)
        }
    }

    /// Returns the written bits packed into bytes; a trailing partial byte is
    /// padded with zero bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                let value = chunk.iter().by_vals().fold(0u8, |acc, bit| acc << 1 | bit as u8);
                value << (8 - chunk.len())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Buffer;

    #[test]
    fn byte_after_unaligned_bits() {
        let mut buffer = Buffer::new();
        buffer.append_number(0b0100, 4);
        buffer.append_byte(0xA5);
        assert_eq!(buffer.bit_len(), 12);
        assert_eq!(buffer.to_bytes(), [0b0100_1010, 0b0101_0000]);
    }

    #[test]
    fn zero_length_number_is_noop() {
        let mut buffer = Buffer::new();
        buffer.append_number(0xFFFF, 0);
        assert_eq!(buffer.bit_len(), 0);
    }
}
