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
use crate::error_correction::ErrorCorrectionLevel;
use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Broad classification of an [`Error`], for callers that only want to tell
/// the user what went wrong.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The payload or the pixel buffer could not be encoded
    Encoding,
    /// The payload does not fit in a version 40 symbol
    CapacityExceeded,
    /// A rendering or generator option is out of range
    InvalidConfiguration,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("character {character:?} at position {position} is not representable in {profile} byte mode")]
    UnsupportedCharacter {
        character: char,
        position: usize,
        profile: ByteProfile,
    },

    #[error("payload needs {required_bits} bits, but a version 40 symbol at level {level:?} holds only {capacity_bits}")]
    CapacityExceeded {
        level: ErrorCorrectionLevel,
        required_bits: usize,
        capacity_bits: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("pixel buffer of {len} bytes does not match {width}x{height}")]
    BufferMismatch { width: u32, height: u32, len: usize },

    #[error("failed to encode png: {0}")]
    Png(#[from] image::ImageError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedCharacter { .. } | Error::BufferMismatch { .. } | Error::Png(_) => {
                ErrorKind::Encoding
            }
            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Error::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
        }
    }

    /// Stable identifier of the failure, suitable for showing next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedCharacter { .. } => "encoding.unsupported_character",
            Error::BufferMismatch { .. } => "encoding.buffer_mismatch",
            Error::Png(_) => "encoding.png",
            Error::CapacityExceeded { .. } => "capacity.exceeded",
            Error::InvalidConfiguration(_) => "config.invalid",
        }
    }

    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration(message.into())
    }
}
