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

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::error_correction::ErrorCorrectionLevel;
use crate::qr_version::Version;
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

const ECI_MODE_INDICATOR: u32 = 0b0111;
const ECI_UTF8_DESIGNATOR: u32 = 26;
const ECI_HEADER_BIT_LEN: usize = 12;

const PAD_BYTES: [u8; 2] = [0b1110_1100, 0b0001_0001];

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum EncodingMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl EncodingMode {
    /// Evaluation order of the segmentation; byte mode accepts every character.
    const ALL: [EncodingMode; 3] = [
        EncodingMode::Byte,
        EncodingMode::Alphanumeric,
        EncodingMode::Numeric,
    ];

    fn mode_indicator(self) -> u32 {
        match self {
            EncodingMode::Numeric => 0b0001,
            EncodingMode::Alphanumeric => 0b0010,
            EncodingMode::Byte => 0b0100,
        }
    }

    fn can_encode(self, c: char) -> bool {
        match self {
            EncodingMode::Numeric => is_char_numeric(c),
            EncodingMode::Alphanumeric => is_char_alphanumeric(c),
            EncodingMode::Byte => true,
        }
    }

    /// Cost of one character, in sixths of a bit
    fn char_cost(self, c: char, profile: ByteProfile) -> usize {
        match self {
            EncodingMode::Numeric => 20,
            EncodingMode::Alphanumeric => 33,
            EncodingMode::Byte => profile.byte_len(c) * 8 * 6,
        }
    }

    fn data_bit_len(self, count: usize) -> usize {
        match self {
            EncodingMode::Numeric => 10 * (count / 3) + [0, 4, 7][count % 3],
            EncodingMode::Alphanumeric => 11 * (count / 2) + 6 * (count % 2),
            EncodingMode::Byte => 8 * count,
        }
    }
}

/// How characters that need byte mode are turned into bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ByteProfile {
    /// Plain UTF-8 bytes, the way most generators and readers expect them
    #[default]
    Utf8,
    /// UTF-8 bytes announced by an ECI header whenever the text is not ASCII
    Utf8Eci,
    /// One byte per character; anything above U+00FF is rejected
    Iso8859_1,
}

impl ByteProfile {
    fn byte_len(self, c: char) -> usize {
        match self {
            ByteProfile::Iso8859_1 => 1,
            ByteProfile::Utf8 | ByteProfile::Utf8Eci => c.len_utf8(),
        }
    }

    fn encode_char(self, c: char, bytes: &mut Vec<u8>) {
        match self {
            ByteProfile::Iso8859_1 => bytes.push(c as u8),
            ByteProfile::Utf8 | ByteProfile::Utf8Eci => {
                let mut utf8 = [0; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }

    fn validate(self, text: &str) -> Result<()> {
        if self != ByteProfile::Iso8859_1 {
            return Ok(());
        }
        match text.chars().enumerate().find(|(_, c)| !is_char_iso_8859_1(*c)) {
            Some((position, character)) => Err(Error::UnsupportedCharacter {
                character,
                position,
                profile: self,
            }),
            None => Ok(()),
        }
    }

    fn needs_eci(self, text: &str) -> bool {
        self == ByteProfile::Utf8Eci && !text.is_ascii()
    }
}

impl fmt::Display for ByteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ByteProfile::Utf8 => "UTF-8",
            ByteProfile::Utf8Eci => "UTF-8 (ECI)",
            ByteProfile::Iso8859_1 => "ISO-8859-1",
        })
    }
}

fn is_char_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_char_alphanumeric(c: char) -> bool {
    c.is_ascii() && ALPHANUMERIC_CHARSET.contains(&(c as u8))
}

fn is_char_iso_8859_1(c: char) -> bool {
    c as u32 <= 0xff
}

/// A run of characters encoded in a single mode
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    pub(crate) mode: EncodingMode,
    pub(crate) data: Vec<u8>,
}

impl Segment {
    /// Number of characters, which is the number of bytes for every mode
    pub fn character_count(&self) -> usize {
        self.data.len()
    }

    pub fn bit_len(&self, version: Version) -> usize {
        4 + version.character_count_indicator_bit_length(self.mode)
            + self.mode.data_bit_len(self.character_count())
    }

    fn count_fits(&self, version: Version) -> bool {
        let bits = version.character_count_indicator_bit_length(self.mode);
        self.character_count() < 1 << bits
    }
}

/// Splits `text` into segments with a minimal total length for the
/// character count field widths of `version`.
///
/// Every character gets the cheapest path ending in each of the three modes;
/// switching modes costs a new segment header. Costs are tracked in sixths of
/// a bit so numeric and alphanumeric packing stay exact enough to compare.
pub fn segment_text(text: &str, version: Version, profile: ByteProfile) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let head_costs: [usize; 3] = EncodingMode::ALL
        .map(|mode| (4 + version.character_count_indicator_bit_length(mode)) * 6);

    // For every character and every mode the path ends in: the mode the
    // character itself is encoded in.
    let mut char_modes: Vec<[Option<usize>; 3]> = Vec::with_capacity(chars.len());
    let mut prev_costs = head_costs;

    for &c in &chars {
        let mut extended = [None; 3];
        for (index, mode) in EncodingMode::ALL.iter().enumerate() {
            if mode.can_encode(c) {
                extended[index] = Some(prev_costs[index] + mode.char_cost(c, profile));
            }
        }

        let mut costs = [usize::MAX; 3];
        let mut modes = [None; 3];
        for to in 0..3 {
            for from in 0..3 {
                let Some(cost) = extended[from] else { continue };
                let cost = if from == to {
                    cost
                } else {
                    (cost + 5) / 6 * 6 + head_costs[to]
                };
                if cost < costs[to] {
                    costs[to] = cost;
                    modes[to] = Some(from);
                }
            }
        }
        char_modes.push(modes);
        prev_costs = costs;
    }

    let mut current = (0..3).min_by_key(|&index| prev_costs[index]).unwrap_or(0);
    let mut assigned = vec![EncodingMode::Byte; chars.len()];
    for (index, modes) in char_modes.iter().enumerate().rev() {
        current = modes[current].unwrap_or(0);
        assigned[index] = EncodingMode::ALL[current];
    }

    let mut segments: Vec<Segment> = Vec::new();
    for (&c, &mode) in chars.iter().zip(&assigned) {
        if segments.last().map(|segment| segment.mode) != Some(mode) {
            segments.push(Segment {
                mode,
                data: Vec::new(),
            });
        }
        if let Some(segment) = segments.last_mut() {
            match mode {
                EncodingMode::Byte => profile.encode_char(c, &mut segment.data),
                EncodingMode::Numeric | EncodingMode::Alphanumeric => segment.data.push(c as u8),
            }
        }
    }
    segments
}

fn stream_bit_len(segments: &[Segment], version: Version, eci: bool) -> usize {
    let header = if eci { ECI_HEADER_BIT_LEN } else { 0 };
    header
        + segments
            .iter()
            .map(|segment| segment.bit_len(version))
            .sum::<usize>()
}

pub struct DataEncoder {
    pub(crate) version: Version,
    pub(crate) error_correction: ErrorCorrectionLevel,
}

impl DataEncoder {
    fn encode_eci(&self, buffer: &mut Buffer) {
        buffer.append_number(ECI_MODE_INDICATOR, 4);
        buffer.append_number(ECI_UTF8_DESIGNATOR, 8);
    }

    fn encode_mode_indicator(&self, mode: EncodingMode, buffer: &mut Buffer) {
        buffer.append_number(mode.mode_indicator(), 4)
    }

    fn encode_character_count_indicator(&self, segment: &Segment, buffer: &mut Buffer) {
        let bit_len = self
            .version
            .character_count_indicator_bit_length(segment.mode);
        buffer.append_number(segment.character_count() as u32, bit_len);
    }

    fn encode_data(&self, segment: &Segment, buffer: &mut Buffer) {
        match segment.mode {
            EncodingMode::Numeric => {
                for digits in segment.data.chunks(3) {
                    let number = digits
                        .iter()
                        .fold(0, |acc, digit| acc * 10 + u32::from(digit - b'0'));
                    buffer.append_number(number, [0, 4, 7, 10][digits.len()]);
                }
            }
            EncodingMode::Alphanumeric => {
                for pair in segment.data.chunks(2) {
                    match *pair {
                        [first, second] => buffer.append_number(
                            45 * convert_alphanumeric(first) + convert_alphanumeric(second),
                            11,
                        ),
                        [single] => buffer.append_number(convert_alphanumeric(single), 6),
                        _ => {}
                    }
                }
            }
            EncodingMode::Byte => buffer.append_bytes(&segment.data),
        }
    }

    fn encode_terminator(&self, buffer: &mut Buffer) {
        let max_data_bit_len = self.version.data_codeword_bit_len(self.error_correction);

        let buffer_bit_len = buffer.bit_len();
        if max_data_bit_len - buffer_bit_len < 4 {
            buffer.append_number(0, max_data_bit_len - buffer_bit_len)
        } else {
            let alignment = (8 - (buffer_bit_len + 4) % 8) % 8;
            buffer.append_number(0, 4 + alignment)
        }
    }

    fn encode_padding(&self, buffer: &mut Buffer) {
        let pad_len = (self.version.data_codeword_bit_len(self.error_correction)
            - buffer.bit_len())
            / 8;
        for pad in PAD_BYTES.iter().cycle().take(pad_len) {
            buffer.append_byte(*pad);
        }
    }

    /// Writes the complete data codeword sequence. The segments must fit the
    /// capacity of the version.
    pub fn encode(&self, segments: &[Segment], eci: bool) -> Buffer {
        let mut buffer = Buffer::new();
        if eci {
            self.encode_eci(&mut buffer);
        }
        for segment in segments {
            self.encode_mode_indicator(segment.mode, &mut buffer);
            self.encode_character_count_indicator(segment, &mut buffer);
            self.encode_data(segment, &mut buffer);
        }
        self.encode_terminator(&mut buffer);
        self.encode_padding(&mut buffer);
        buffer
    }
}

fn convert_alphanumeric(c: u8) -> u32 {
    debug_assert!(ALPHANUMERIC_CHARSET.contains(&c));
    ALPHANUMERIC_CHARSET
        .iter()
        .position(|&candidate| candidate == c)
        .unwrap_or(0) as u32
}

/// Data codewords of a payload together with the version they were sized for
#[derive(Clone, Debug)]
pub struct EncodedData {
    pub(crate) version: Version,
    pub(crate) segments: Vec<Segment>,
    pub(crate) buffer: Buffer,
}

impl EncodedData {
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn codewords(&self) -> Vec<u8> {
        self.buffer.to_bytes()
    }
}

/// Encodes `text` into the smallest version that holds it at the requested
/// error correction level.
pub fn encode_text(
    text: &str,
    error_correction: ErrorCorrectionLevel,
    profile: ByteProfile,
) -> Result<EncodedData> {
    profile.validate(text)?;
    let eci = profile.needs_eci(text);

    // Segmentation only changes when the character count field widths do.
    let mut segmentation: Option<(usize, Vec<Segment>)> = None;
    let mut required_bits = 0;

    for version in Version::all() {
        let range = version.character_count_range();
        let segments = match segmentation.take() {
            Some((cached_range, segments)) if cached_range == range => segments,
            _ => segment_text(text, version, profile),
        };

        required_bits = stream_bit_len(&segments, version, eci);
        let fits = required_bits <= version.data_codeword_bit_len(error_correction)
            && segments.iter().all(|segment| segment.count_fits(version));

        if fits {
            debug!(
                version = version.number(),
                ?error_correction,
                segments = segments.len(),
                bits = required_bits,
                "selected symbol version"
            );
            let buffer = DataEncoder {
                version,
                error_correction,
            }
            .encode(&segments, eci);
            return Ok(EncodedData {
                version,
                segments,
                buffer,
            });
        }
        segmentation = Some((range, segments));
    }

    Err(Error::CapacityExceeded {
        level: error_correction,
        required_bits,
        capacity_bits: Version::MAX.data_codeword_bit_len(error_correction),
    })
}
