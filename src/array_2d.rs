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

use core::ops::{Index, IndexMut};

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

impl Coordinate {
    pub fn new(row: usize, column: usize) -> Coordinate {
        Coordinate { row, column }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from(pos: (usize, usize)) -> Self {
        let (row, column) = pos;
        Coordinate::new(row, column)
    }
}

/// Square grid stored row by row
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Array2D<T> {
    data: Vec<T>,
    width: usize,
}

impl<T> Index<Coordinate> for Array2D<T> {
    type Output = T;

    fn index(&self, index: Coordinate) -> &Self::Output {
        debug_assert!(index.row < self.width && index.column < self.width);
        &self.data[index.row * self.width + index.column]
    }
}

impl<T> IndexMut<Coordinate> for Array2D<T> {
    fn index_mut(&mut self, index: Coordinate) -> &mut Self::Output {
        debug_assert!(index.row < self.width && index.column < self.width);
        &mut self.data[index.row * self.width + index.column]
    }
}

impl<T> Array2D<T>
where
    T: Default + Clone,
{
    pub fn new(width: usize) -> Self {
        Self {
            data: vec![T::default(); width * width],
            width,
        }
    }
}

impl<T> Array2D<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, pos: Coordinate) -> Option<&T> {
        if pos.row < self.width && pos.column < self.width {
            Some(&self[pos])
        } else {
            None
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Coordinate, &mut T)> {
        let width = self.width;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(index, value)| (Coordinate::new(index / width, index % width), value))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks(self.width)
    }

    pub fn columns(&self) -> Columns<'_, T> {
        Columns {
            data: self,
            column: 0,
        }
    }
}

#[derive(Copy, Clone)]
pub struct Columns<'a, T> {
    data: &'a Array2D<T>,
    column: usize,
}

impl<'a, T> Iterator for Columns<'a, T> {
    type Item = Column<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.column < self.data.width {
            let result = Column {
                data: self.data,
                row: 0,
                column: self.column,
            };
            self.column += 1;
            Some(result)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone)]
pub struct Column<'a, T> {
    data: &'a Array2D<T>,
    row: usize,
    column: usize,
}

impl<'a, T> Iterator for Column<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row < self.data.width {
            let result = &self.data[Coordinate::new(self.row, self.column)];
            self.row += 1;
            Some(result)
        } else {
            None
        }
    }
}
