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

use crate::error::{Error, Result};
use crate::export;
use crate::matrix::{Category, Color};
use crate::qrcode::QrCode;
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_RESOLUTION: u32 = 1000;
pub const DEFAULT_DOT_RATIO: f64 = 0.85;
pub const MIN_QUIET_ZONE: u32 = 4;
pub const MAX_QUIET_ZONE: u32 = 64;
pub const MAX_RESOLUTION: u32 = 16384;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// How alignment patterns are drawn
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStyle {
    /// Solid squares, like the finder patterns
    #[default]
    Square,
    /// Round dots, like the data modules
    Dots,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Width and height of the output in pixels
    pub resolution: u32,
    /// Dot diameter relative to the module size
    pub dot_ratio: f64,
    /// Light border in modules
    pub quiet_zone: u32,
    pub alignment_style: AlignmentStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            resolution: DEFAULT_RESOLUTION,
            dot_ratio: DEFAULT_DOT_RATIO,
            quiet_zone: MIN_QUIET_ZONE,
            alignment_style: AlignmentStyle::default(),
        }
    }
}

impl RenderOptions {
    /// Checks everything that does not depend on the symbol size
    pub fn validate(&self) -> Result<()> {
        if !self.dot_ratio.is_finite() || self.dot_ratio <= 0.0 || self.dot_ratio > 1.0 {
            return Err(Error::invalid_configuration(format!(
                "dot ratio {} is not in (0, 1]",
                self.dot_ratio
            )));
        }
        if !(MIN_QUIET_ZONE..=MAX_QUIET_ZONE).contains(&self.quiet_zone) {
            return Err(Error::invalid_configuration(format!(
                "quiet zone of {} modules is not in {}..={}",
                self.quiet_zone, MIN_QUIET_ZONE, MAX_QUIET_ZONE
            )));
        }
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(Error::invalid_configuration(format!(
                "resolution of {} px is not in 1..={}",
                self.resolution, MAX_RESOLUTION
            )));
        }
        Ok(())
    }
}

/// 8-bit greyscale raster, row by row; dark is 0 and light is 255
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw pixels. The length is not checked here; exporting a buffer
    /// whose length does not match its dimensions fails.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        PixelBuffer {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied()
    }

    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some_and(|luma| luma < 128)
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        export::to_png(self)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Shape {
    Square,
    Dot,
}

#[derive(Clone, Debug)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Renderer { options })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn shape(&self, category: Category) -> Shape {
        match category {
            Category::Data => Shape::Dot,
            Category::Alignment => match self.options.alignment_style {
                AlignmentStyle::Square => Shape::Square,
                AlignmentStyle::Dots => Shape::Dot,
            },
            Category::Finder
            | Category::Separator
            | Category::Timing
            | Category::FormatInfo
            | Category::VersionInfo => Shape::Square,
        }
    }

    /// Draws the symbol onto a square canvas of `resolution` pixels. Module
    /// `index` (quiet zone included) covers the pixels from
    /// `index * resolution / modules` up to the start of the next module.
    pub fn render(&self, qrcode: &QrCode) -> Result<PixelBuffer> {
        let resolution = self.options.resolution;
        let quiet_zone = self.options.quiet_zone as usize;
        let modules = qrcode.width() + 2 * quiet_zone;
        if (resolution as usize) < modules {
            return Err(Error::invalid_configuration(format!(
                "resolution of {} px is below the {} modules of a version {} symbol with its quiet zone",
                resolution,
                modules,
                qrcode.version().number()
            )));
        }

        let cell = f64::from(resolution) / modules as f64;
        let radius = ((self.options.dot_ratio * cell - 1.0) / 2.0).round().max(0.0) as i32;
        let span = |index: usize| -> (u32, u32) {
            let start = index * resolution as usize / modules;
            let end = (index + 1) * resolution as usize / modules;
            (start as u32, end as u32)
        };

        debug!(
            resolution,
            modules,
            cell,
            radius,
            version = qrcode.version().number(),
            "rendering qr code"
        );

        let mut image = GrayImage::from_pixel(resolution, resolution, LIGHT);
        for module in qrcode.draw_iter(quiet_zone) {
            let Some(category) = module.category else {
                continue;
            };
            if module.color != Color::Dark {
                continue;
            }

            let (x0, x1) = span(module.x);
            let (y0, y1) = span(module.y);
            match self.shape(category) {
                Shape::Square => {
                    let rect = Rect::at(x0 as i32, y0 as i32).of_size(x1 - x0, y1 - y0);
                    draw_filled_rect_mut(&mut image, rect, DARK);
                }
                Shape::Dot => {
                    let center = (
                        (x0 + (x1 - x0 - 1) / 2) as i32,
                        (y0 + (y1 - y0 - 1) / 2) as i32,
                    );
                    draw_filled_circle_mut(&mut image, center, radius, DARK);
                }
            }
        }

        Ok(PixelBuffer::from_raw(resolution, resolution, image.into_raw()))
    }
}
