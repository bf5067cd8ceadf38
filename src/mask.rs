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
use crate::matrix::{Category, Color, Matrix, Module};
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const FINDER_LIKE_PATTERNS: [[Color; 11]; 2] = {
    use Color::{Dark as D, Light as L};
    [
        [D, L, D, D, D, L, D, L, L, L, L],
        [L, L, L, L, D, L, D, D, D, L, D],
    ]
};

/// One of the eight data masks, identified by its 3 bit reference
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(reference: u8) -> Option<Self> {
        if reference < 8 {
            Some(MaskPattern(reference))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }

    pub fn reference(self) -> u8 {
        self.0
    }

    /// Whether the module at `row`, `column` is inverted by this mask
    pub fn condition(self, row: usize, column: usize) -> bool {
        let (i, j) = (row, column);
        match self.0 {
            0b000 => (i + j) % 2 == 0,
            0b001 => i % 2 == 0,
            0b010 => j % 3 == 0,
            0b011 => (i + j) % 3 == 0,
            0b100 => (i / 2 + j / 3) % 2 == 0,
            0b101 => (i * j) % 2 + (i * j) % 3 == 0,
            0b110 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
            _ => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        }
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = String;

    fn try_from(reference: u8) -> Result<Self, Self::Error> {
        MaskPattern::new(reference).ok_or_else(|| format!("mask pattern {} is not in 0..=7", reference))
    }
}

impl From<MaskPattern> for u8 {
    fn from(mask: MaskPattern) -> Self {
        mask.0
    }
}

impl fmt::Display for MaskPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.0)
    }
}

/// Picks the candidate with the lowest penalty; equal penalties resolve to the
/// lowest mask reference.
pub(crate) fn select_lowest_penalty<I>(candidates: I) -> Option<(MaskPattern, usize)>
where
    I: IntoIterator<Item = (MaskPattern, usize)>,
{
    candidates
        .into_iter()
        .fold(None, |best, candidate| match best {
            Some(best) if (best.1, best.0) <= (candidate.1, candidate.0) => Some(best),
            _ => Some(candidate),
        })
}

impl Matrix {
    /// Returns a copy with the data modules inverted where the mask applies
    pub fn mask(&self, mask: MaskPattern) -> Self {
        let mut masked = self.clone();
        for (pos, module) in masked.data.iter_mut() {
            if let Module::Filled(Category::Data, color) = module {
                if mask.condition(pos.row, pos.column) {
                    *color = color.inverse();
                }
            }
        }
        masked
    }

    /// Masks the data and writes the format and version information
    pub fn finish(&self, error_correction: ErrorCorrectionLevel, mask: MaskPattern) -> Self {
        let mut finished = self.mask(mask);
        finished.place_format(error_correction, mask);
        finished.place_version();
        finished
    }

    /// Evaluates all eight masks and commits the one with the lowest penalty
    pub fn finish_with_best_mask(
        &self,
        error_correction: ErrorCorrectionLevel,
    ) -> (MaskPattern, Self) {
        let scored = MaskPattern::all().map(|mask| {
            let score = self.finish(error_correction, mask).score();
            trace!(mask = mask.reference(), score, "mask penalty");
            (mask, score)
        });
        let (mask, score) =
            select_lowest_penalty(scored).unwrap_or((MaskPattern(0), usize::MAX));
        debug!(mask = mask.reference(), score, "selected mask pattern");
        (mask, self.finish(error_correction, mask))
    }

    fn colors(line: impl Iterator<Item = Module>) -> Vec<Color> {
        line.map(Color::from).collect()
    }

    fn row_colors(&self) -> Vec<Vec<Color>> {
        self.data
            .rows()
            .map(|row| Self::colors(row.iter().copied()))
            .collect()
    }

    fn column_colors(&self) -> Vec<Vec<Color>> {
        self.data
            .columns()
            .map(|column| Self::colors(column.copied()))
            .collect()
    }

    fn score_adjacent(line: &[Color]) -> usize {
        line.chunk_by(|a, b| a == b)
            .map(|run| run.len())
            .filter(|&len| len >= 5)
            .map(|len| len - 2)
            .sum()
    }

    fn score_adjacent_horizontal(&self) -> usize {
        self.row_colors()
            .iter()
            .map(|row| Self::score_adjacent(row))
            .sum()
    }

    fn score_adjacent_vertical(&self) -> usize {
        self.column_colors()
            .iter()
            .map(|column| Self::score_adjacent(column))
            .sum()
    }

    fn score_blocks(&self) -> usize {
        let rows = self.row_colors();
        rows.windows(2)
            .map(|pair| {
                let (upper, lower) = (&pair[0], &pair[1]);
                (0..upper.len() - 1)
                    .filter(|&x| {
                        let color = upper[x];
                        upper[x + 1] == color && lower[x] == color && lower[x + 1] == color
                    })
                    .count()
                    * 3
            })
            .sum()
    }

    fn score_match_pattern(line: &[Color]) -> usize {
        line.windows(11)
            .filter(|window| FINDER_LIKE_PATTERNS.iter().any(|pattern| pattern == window))
            .count()
    }

    fn score_pattern_horizontal(&self) -> usize {
        self.row_colors()
            .iter()
            .map(|row| Self::score_match_pattern(row))
            .sum::<usize>()
            * 40
    }

    fn score_pattern_vertical(&self) -> usize {
        self.column_colors()
            .iter()
            .map(|column| Self::score_match_pattern(column))
            .sum::<usize>()
            * 40
    }

    fn score_proportion(&self) -> usize {
        let dark_count: usize = self
            .row_colors()
            .iter()
            .map(|row| row.iter().filter(|&&color| color == Color::Dark).count())
            .sum();
        let total = self.width() * self.width();
        let deviation = (dark_count * 100).abs_diff(total * 50);
        deviation / (total * 5) * 10
    }

    pub(crate) fn score(&self) -> usize {
        self.score_adjacent_horizontal()
            + self.score_adjacent_vertical()
            + self.score_blocks()
            + self.score_pattern_horizontal()
            + self.score_pattern_vertical()
            + self.score_proportion()
    }
}
