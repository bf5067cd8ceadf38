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

use crate::encoding::ByteProfile;
use crate::error::{Error, Result};
use crate::error_correction::ErrorCorrectionLevel;
use crate::export;
use crate::qrcode::QrCode;
use crate::render::{PixelBuffer, RenderOptions, Renderer};
use serde::{Deserialize, Serialize};

/// Everything needed to turn text into an image, except the text itself
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub error_correction: ErrorCorrectionLevel,
    pub byte_profile: ByteProfile,
    pub render: RenderOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            error_correction: ErrorCorrectionLevel::High,
            byte_profile: ByteProfile::default(),
            render: RenderOptions::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a configuration; missing fields take their default value
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)
            .map_err(|error| Error::invalid_configuration(error.to_string()))?;
        config.render.validate()?;
        Ok(config)
    }

    pub fn qrcode(&self, text: &str) -> Result<QrCode> {
        QrCode::generator()
            .with_text(text)
            .with_error_correction_level(self.error_correction)
            .with_byte_profile(self.byte_profile)
            .build()
    }

    pub fn generate(&self, text: &str) -> Result<PixelBuffer> {
        let renderer = Renderer::new(self.render)?;
        let qrcode = self.qrcode(text)?;
        renderer.render(&qrcode)
    }

    pub fn generate_png(&self, text: &str) -> Result<Vec<u8>> {
        export::to_png(&self.generate(text)?)
    }
}
