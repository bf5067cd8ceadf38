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
use crate::render::PixelBuffer;
use image::{GrayImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encodes the buffer as an 8-bit greyscale PNG
pub fn to_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mismatch = || Error::BufferMismatch {
        width: buffer.width(),
        height: buffer.height(),
        len: buffer.pixels().len(),
    };

    let expected = buffer.width() as usize * buffer.height() as usize;
    if buffer.pixels().len() != expected {
        return Err(mismatch());
    }
    let image = GrayImage::from_raw(buffer.width(), buffer.height(), buffer.pixels().to_vec())
        .ok_or_else(mismatch)?;

    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;
    let png = png.into_inner();

    debug!(
        width = buffer.width(),
        height = buffer.height(),
        bytes = png.len(),
        "encoded png"
    );
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::to_png;
    use crate::error::ErrorKind;
    use crate::render::PixelBuffer;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn greyscale_png() {
        let pixels = vec![0, 255, 255, 0, 0, 255];
        let buffer = PixelBuffer::from_raw(3, 2, pixels.clone());
        let png = to_png(&buffer).unwrap();

        assert_eq!(png[..8], PNG_SIGNATURE);

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
        let decoded = decoded.to_luma8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn buffer_mismatch() {
        let buffer = PixelBuffer::from_raw(2, 2, vec![0; 3]);
        let error = to_png(&buffer).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Encoding);
        assert_eq!(error.code(), "encoding.buffer_mismatch");
        assert_eq!(error.to_string(), "pixel buffer of 3 bytes does not match 2x2");
    }

    #[test]
    fn same_buffer_same_bytes() {
        let buffer = PixelBuffer::from_raw(4, 4, (0..16).map(|i| (i * 16) as u8).collect());
        assert_eq!(to_png(&buffer).unwrap(), buffer.to_png().unwrap());
    }
}
