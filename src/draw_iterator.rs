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
use crate::matrix::{Category, Color, Matrix};

/// A module positioned on the canvas, quiet zone included
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CoordinatedModule {
    pub x: usize,
    pub y: usize,
    pub color: Color,
    /// `None` inside the quiet zone
    pub category: Option<Category>,
}

pub struct DrawIterator<'a> {
    matrix: &'a Matrix,
    quiet_zone: usize,
    x: usize,
    y: usize,
}

impl<'a> DrawIterator<'a> {
    pub(crate) fn new(matrix: &'a Matrix, quiet_zone: usize) -> Self {
        DrawIterator {
            matrix,
            quiet_zone,
            x: 0,
            y: 0,
        }
    }

    pub fn height(&self) -> usize {
        self.matrix.width() + 2 * self.quiet_zone
    }

    pub fn width(&self) -> usize {
        self.matrix.width() + 2 * self.quiet_zone
    }

    fn is_current_pos_border(&self) -> bool {
        let size = self.matrix.width();

        self.x < self.quiet_zone
            || self.y < self.quiet_zone
            || self.x >= size + self.quiet_zone
            || self.y >= size + self.quiet_zone
    }
}

impl Iterator for DrawIterator<'_> {
    type Item = CoordinatedModule;

    fn next(&mut self) -> Option<Self::Item> {
        let result = if self.y >= self.height() {
            return None;
        } else if self.is_current_pos_border() {
            CoordinatedModule {
                x: self.x,
                y: self.y,
                color: Color::Light,
                category: None,
            }
        } else {
            let pos = Coordinate::new(self.y - self.quiet_zone, self.x - self.quiet_zone);
            let module = self.matrix.data[pos];
            CoordinatedModule {
                x: self.x,
                y: self.y,
                color: module.into(),
                category: module.category(),
            }
        };

        self.x += 1;
        if self.x >= self.width() {
            self.x = 0;
            self.y += 1;
        }

        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.height().saturating_sub(self.y) * self.width()).saturating_sub(self.x);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DrawIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::CoordinatedModule;
    use crate::matrix::{Category, Color};
    use crate::qrcode::QrCode;

    #[test]
    fn quiet_zone_surrounds_symbol() {
        let qrcode = QrCode::generator().with_text("HELLO").build().unwrap();
        let iter = qrcode.draw_iter(4);
        assert_eq!(iter.width(), 29);
        assert_eq!(iter.height(), 29);
        assert_eq!(iter.len(), 29 * 29);

        let modules: Vec<CoordinatedModule> = iter.collect();
        assert_eq!(modules.len(), 29 * 29);
        assert_eq!(
            modules[0],
            CoordinatedModule {
                x: 0,
                y: 0,
                color: Color::Light,
                category: None
            }
        );

        // Row 4, column 4 is the left-top corner of the left-top finder pattern
        let corner = modules[4 * 29 + 4];
        assert_eq!((corner.x, corner.y), (4, 4));
        assert_eq!(corner.color, Color::Dark);
        assert_eq!(corner.category, Some(Category::Finder));

        let border = modules.iter().filter(|module| module.category.is_none());
        assert!(border.clone().all(|module| module.color == Color::Light));
        assert_eq!(border.count(), 29 * 29 - 21 * 21);
    }

    #[test]
    fn rows_and_columns_are_not_transposed() {
        let qrcode = QrCode::generator().with_text("HELLO").build().unwrap();
        for module in qrcode.draw_iter(1) {
            if module.category.is_some() {
                assert_eq!(
                    Some(module.color),
                    qrcode.color(module.y - 1, module.x - 1)
                );
            }
        }
        // The dark module sits beside the left-bottom finder, not below the right-top one
        let dark = qrcode
            .draw_iter(0)
            .find(|module| module.x == 8 && module.y == 13)
            .unwrap();
        assert_eq!(dark.category, Some(Category::FormatInfo));
        assert_eq!(dark.color, Color::Dark);
    }
}
