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

use crate::array_2d::{Array2D, Coordinate};
use crate::error_correction::ErrorCorrectionLevel;
use crate::format::{FormatEncoder, VersionEncoder};
use crate::mask::MaskPattern;
use crate::qr_version::Version;
use bitvec::prelude::*;
use core::fmt::{Debug, Display, Formatter, Write};
use tracing::trace;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub(crate) fn inverse(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    fn from_bit(bit: bool) -> Self {
        if bit {
            Color::Dark
        } else {
            Color::Light
        }
    }
}

/// The structural role of a module within the symbol
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Category {
    /// Data and error correction codewords, including remainder bits
    Data,
    Finder,
    /// Light border around each finder pattern
    Separator,
    Timing,
    Alignment,
    /// Format information, including the dark module
    FormatInfo,
    VersionInfo,
}

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub enum Module {
    /// Part of the encoding region, but not yet filled with a color
    #[default]
    Empty,
    /// Kept free for format or version information
    Reserved(Category),
    Filled(Category, Color),
}

impl Module {
    pub fn category(self) -> Option<Category> {
        match self {
            Module::Empty => None,
            Module::Reserved(category) | Module::Filled(category, _) => Some(category),
        }
    }
}

impl From<Module> for Color {
    fn from(module: Module) -> Self {
        match module {
            Module::Filled(_, color) => color,
            Module::Empty | Module::Reserved(_) => Color::Light,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Matrix {
    pub(crate) data: Array2D<Module>,
    version: Version,
}

impl Matrix {
    pub fn new(version: Version) -> Self {
        Self {
            data: Array2D::new(version.width()),
            version,
        }
    }

    /// Creates a matrix with all function patterns drawn and the format and
    /// version areas reserved
    pub fn with_function_patterns(version: Version) -> Self {
        let mut matrix = Self::new(version);
        matrix.fill_symbol();
        matrix
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn module(&self, pos: Coordinate) -> Option<Module> {
        self.data.get(pos).copied()
    }

    #[cfg(test)]
    pub(crate) fn fill_whole(&mut self, data: Module) {
        for (_, module) in self.data.iter_mut() {
            *module = data;
        }
    }

    fn fill_module(&mut self, pos: Coordinate, data: Module) {
        self.data[pos] = data;
    }

    fn fill_finder_pattern(&mut self, top: usize, left: usize) {
        let width = self.width();
        for row in top.saturating_sub(1)..(top + 8).min(width) {
            for column in left.saturating_sub(1)..(left + 8).min(width) {
                let distance = row.abs_diff(top + 3).max(column.abs_diff(left + 3));
                let module = match distance {
                    4 => Module::Filled(Category::Separator, Color::Light),
                    2 => Module::Filled(Category::Finder, Color::Light),
                    _ => Module::Filled(Category::Finder, Color::Dark),
                };
                self.fill_module(Coordinate::new(row, column), module);
            }
        }
    }

    fn fill_finder_patterns(&mut self) {
        let far = self.width() - 7;

        // Left-top
        self.fill_finder_pattern(0, 0);
        // Right-top
        self.fill_finder_pattern(0, far);
        // Left-bottom
        self.fill_finder_pattern(far, 0);
    }

    fn fill_timing_pattern(&mut self) {
        fn module(i: usize) -> Module {
            Module::Filled(Category::Timing, Color::from_bit(i % 2 == 0))
        }

        let width = self.width();
        for i in 8..width - 8 {
            self.fill_module(Coordinate::new(6, i), module(i));
            self.fill_module(Coordinate::new(i, 6), module(i));
        }
    }

    fn fill_alignment_pattern(&mut self, center: Coordinate) {
        for row in center.row - 2..=center.row + 2 {
            for column in center.column - 2..=center.column + 2 {
                let distance = row.abs_diff(center.row).max(column.abs_diff(center.column));
                let color = Color::from_bit(distance != 1);
                self.fill_module(
                    Coordinate::new(row, column),
                    Module::Filled(Category::Alignment, color),
                );
            }
        }
    }

    fn fill_alignment_patterns(&mut self) {
        let positions = self.version.alignment_pattern_positions();
        let Some(&last) = positions.last() else {
            return;
        };
        let overlaps_finder = |row: usize, column: usize| {
            (row, column) == (6, 6) || (row, column) == (6, last) || (row, column) == (last, 6)
        };

        for &row in &positions {
            for &column in &positions {
                if !overlaps_finder(row, column) {
                    self.fill_alignment_pattern(Coordinate::new(row, column));
                }
            }
        }
    }

    fn fill_reserved(&mut self) {
        let format = Module::Reserved(Category::FormatInfo);
        for pos_list in FormatPositionIterator::new(self.width()) {
            for pos in pos_list {
                self.fill_module(pos, format);
            }
        }
        self.fill_module(self.dark_module_position(), format);

        if self.version.has_version_information() {
            let version = Module::Reserved(Category::VersionInfo);
            for pos_list in version_positions(self.width()) {
                for pos in pos_list {
                    self.fill_module(pos, version);
                }
            }
        }
    }

    fn fill_symbol(&mut self) {
        self.fill_finder_patterns();
        self.fill_timing_pattern();
        self.fill_alignment_patterns();
        self.fill_reserved();
    }

    fn dark_module_position(&self) -> Coordinate {
        Coordinate::new(self.width() - 8, 8)
    }

    /// Writes the codewords most significant bit first into the empty modules,
    /// following the two column zig-zag from the bottom-right corner. Modules
    /// left over after the last codeword become light remainder bits.
    pub fn place_data(&mut self, codewords: &[u8]) {
        let mut bits = codewords.view_bits::<Msb0>().iter().by_vals();
        let mut remainder = 0;

        for pos in PositionIterator::new(self.width()) {
            if self.data[pos] == Module::Empty {
                let bit = bits.next().unwrap_or_else(|| {
                    remainder += 1;
                    false
                });
                self.data[pos] = Module::Filled(Category::Data, Color::from_bit(bit));
            }
        }

        trace!(
            version = self.version.number(),
            codewords = codewords.len(),
            remainder,
            expected_remainder = self.version.remainder_bit_count(),
            unplaced = bits.count(),
            "placed data modules"
        );
    }

    pub fn place_format(&mut self, error_correction_level: ErrorCorrectionLevel, mask: MaskPattern) {
        let encoder = FormatEncoder {
            error_correction_level,
            mask,
        };
        let data = encoder.encode();

        for (index, pos_list) in FormatPositionIterator::new(self.width()).enumerate() {
            let color = Color::from_bit(data & (1 << index) != 0);
            for pos in pos_list {
                self.fill_module(pos, Module::Filled(Category::FormatInfo, color));
            }
        }
        self.fill_module(
            self.dark_module_position(),
            Module::Filled(Category::FormatInfo, Color::Dark),
        );
    }

    /// Writes the version information blocks; versions below 7 have none
    pub fn place_version(&mut self) {
        if !self.version.has_version_information() {
            return;
        }
        let data = VersionEncoder {
            version: self.version,
        }
        .encode();

        for (index, pos_list) in version_positions(self.width()).enumerate() {
            let color = Color::from_bit(data & (1 << index) != 0);
            for pos in pos_list {
                self.fill_module(pos, Module::Filled(Category::VersionInfo, color));
            }
        }
    }
}

impl Debug for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.data.rows().try_for_each(|row| {
            row.iter().try_for_each(|module| match module {
                Module::Filled(Category::Data, color) => match color {
                    Color::Light => f.write_char('_'),
                    Color::Dark => f.write_char('\u{2588}'),
                },
                Module::Filled(_, color) => match color {
                    Color::Light => f.write_char('\u{2591}'),
                    Color::Dark => f.write_char('\u{2593}'),
                },
                Module::Empty => f.write_char('\u{FFFD}'),
                Module::Reserved(_) => f.write_char('\u{2592}'),
            })?;
            f.write_char('\n')
        })
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let iter1 = self.data.rows().step_by(2);
        let iter2 = self.data.rows().skip(1).step_by(2);
        iter1.zip(iter2).try_for_each(|(up_row, down_row)| {
            up_row.iter().zip(down_row).try_for_each(|(&up, &down)| {
                f.write_char(match (up.into(), down.into()) {
                    (Color::Dark, Color::Dark) => '\u{2588}',
                    (Color::Dark, Color::Light) => '\u{2580}',
                    (Color::Light, Color::Dark) => '\u{2584}',
                    (Color::Light, Color::Light) => ' ',
                })
            })?;
            f.write_char('\n')
        })?;

        if self.width() % 2 == 1 {
            if let Some(last_row) = self.data.rows().last() {
                last_row.iter().try_for_each(|&up| {
                    f.write_char(match up.into() {
                        Color::Dark => '\u{2580}',
                        Color::Light => ' ',
                    })
                })?;
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

/// Both positions of each format information bit, least significant bit first
#[derive(Copy, Clone)]
struct FormatPositionIterator {
    width: usize,
    index: usize,
}

impl FormatPositionIterator {
    fn new(width: usize) -> FormatPositionIterator {
        FormatPositionIterator { width, index: 0 }
    }
}

impl Iterator for FormatPositionIterator {
    type Item = [Coordinate; 2];

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        if index > 14 {
            return None;
        }

        // Around the left-top finder, skipping the timing pattern
        let pos1 = match index {
            0..=5 => Coordinate::new(index, 8),
            6..=7 => Coordinate::new(index + 1, 8),
            8 => Coordinate::new(8, 7),
            _ => Coordinate::new(8, 14 - index),
        };

        // Below the right-top finder and beside the left-bottom finder
        let pos2 = if index <= 7 {
            Coordinate::new(8, self.width - 1 - index)
        } else {
            Coordinate::new(self.width - 15 + index, 8)
        };

        self.index += 1;
        Some([pos1, pos2])
    }
}

/// Both positions of each version information bit, least significant bit first
fn version_positions(width: usize) -> impl Iterator<Item = [Coordinate; 2]> {
    (0..18).map(move |index| {
        let a = width - 11 + index % 3;
        let b = index / 3;
        [Coordinate::new(b, a), Coordinate::new(a, b)]
    })
}

/// Walks the symbol in two module wide columns, starting at the bottom-right
/// and alternating upwards and downwards. The vertical timing column is skipped.
#[derive(Copy, Clone)]
struct PositionIterator {
    width: usize,
    right: usize,
    vertical: usize,
    column_offset: usize,
    finished: bool,
}

impl PositionIterator {
    fn new(width: usize) -> PositionIterator {
        PositionIterator {
            width,
            right: width - 1,
            vertical: 0,
            column_offset: 0,
            finished: width == 0,
        }
    }
}

impl Iterator for PositionIterator {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let upwards = (self.right + 1) & 2 == 0;
        let row = if upwards {
            self.width - 1 - self.vertical
        } else {
            self.vertical
        };
        let pos = Coordinate::new(row, self.right - self.column_offset);

        self.column_offset += 1;
        if self.column_offset == 2 {
            self.column_offset = 0;
            self.vertical += 1;
            if self.vertical == self.width {
                self.vertical = 0;
                if self.right < 3 {
                    self.finished = true;
                } else {
                    self.right -= 2;
                    if self.right == 6 {
                        self.right = 5;
                    }
                }
            }
        }

        Some(pos)
    }
}
