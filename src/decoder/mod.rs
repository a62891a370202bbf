/*
Copyright 2021 Jakub Lewandowski

This file is part of GSI Background Error Reader (gsiberror).

GSI Background Error Reader (gsiberror) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

GSI Background Error Reader (gsiberror) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with GSI Background Error Reader (gsiberror). If not, see https://www.gnu.org/licenses/.
*/

//! Module responsible for reading `.gcv` files and turning
//! their records into a [`DecodedMatrix`].
//!
//! The file is read in one sequential pass. First the header record
//! is read to get the grid dimensions, then the remaining records
//! are decoded in the order given by the [`schema`], and finally the
//! decoded fields are reshaped and grouped into collections.

mod assembler;
mod collection;
mod coordinates;
mod header;
mod records;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixture;

pub use self::collection::table;
pub use self::coordinates::Coordinates;

use crate::{errors::DecodeError, matrix::DecodedMatrix};
use log::{debug, warn};
use serde::Deserialize;
use std::{
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::Path,
    sync::Arc,
};

/// Grid dimensions read from the file header.
///
/// Every record size in the file is a function of these three values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct GridDimensions {
    levels: usize,
    latitudes: usize,
    longitudes: usize,
}

impl GridDimensions {
    /// Checks the raw header values and converts them into dimensions.
    ///
    /// All three values must be positive. Single-point axes are accepted.
    pub fn new(levels: i32, latitudes: i32, longitudes: i32) -> Result<Self, DecodeError> {
        let invalid = |reason| DecodeError::InvalidDimensions {
            levels,
            latitudes,
            longitudes,
            reason,
        };

        if levels <= 0 {
            return Err(invalid("levels count must be positive"));
        }

        if latitudes <= 0 {
            return Err(invalid("latitudes count must be positive"));
        }

        if longitudes <= 0 {
            return Err(invalid("longitudes count must be positive"));
        }

        Ok(GridDimensions {
            levels: levels as usize,
            latitudes: latitudes as usize,
            longitudes: longitudes as usize,
        })
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn latitudes(&self) -> usize {
        self.latitudes
    }

    pub fn longitudes(&self) -> usize {
        self.longitudes
    }

    pub(crate) fn invalid(&self, reason: &'static str) -> DecodeError {
        DecodeError::InvalidDimensions {
            levels: self.levels as i32,
            latitudes: self.latitudes as i32,
            longitudes: self.longitudes as i32,
            reason,
        }
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "levels: {}, latitudes: {}, longitudes: {}",
            self.levels, self.latitudes, self.longitudes
        )
    }
}

/// Options changing how strictly the file is checked
/// and how the decoded fields are assembled.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct DecoderOptions {
    /// _(Optional)_ Check that leading and trailing record markers
    /// are equal to the record payload length.
    ///
    /// Defaults to `true`.
    #[serde(default = "DecoderOptions::default_true")]
    pub validate_frames: bool,

    /// _(Optional)_ Check that each control variable tag
    /// matches the variable expected at its position.
    ///
    /// Defaults to `true`.
    #[serde(default = "DecoderOptions::default_true")]
    pub validate_tags: bool,

    /// _(Optional)_ Reshape the decoded fields on the rayon
    /// thread pool instead of the calling thread.
    ///
    /// Defaults to `false`.
    #[serde(default)]
    pub parallel_assembly: bool,
}

impl DecoderOptions {
    fn default_true() -> bool {
        true
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            validate_frames: true,
            validate_tags: true,
            parallel_assembly: false,
        }
    }
}

/// Reads and decodes a `.gcv` file.
///
/// The file is opened once and its length is compared with the length
/// implied by the header before any data record is read.
pub fn decode_file(path: &Path, options: &DecoderOptions) -> Result<DecodedMatrix, DecodeError> {
    debug!("Opening {}", path.display());

    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    decode_stream(&mut reader, Some(file_len), options)
}

/// Decodes a `.gcv` file already loaded into memory.
pub fn decode_bytes(bytes: &[u8], options: &DecoderOptions) -> Result<DecodedMatrix, DecodeError> {
    let mut reader = bytes;

    decode_stream(&mut reader, Some(bytes.len() as u64), options)
}

/// Decodes a `.gcv` file from any reader positioned at the start of the file.
///
/// As the length of the source is not known upfront, truncation
/// is only detected when the missing record is reached.
pub fn decode_reader<R: Read>(
    mut reader: R,
    options: &DecoderOptions,
) -> Result<DecodedMatrix, DecodeError> {
    decode_stream(&mut reader, None, options)
}

fn decode_stream<R: Read>(
    reader: &mut R,
    source_len: Option<u64>,
    options: &DecoderOptions,
) -> Result<DecodedMatrix, DecodeError> {
    if !options.validate_frames {
        warn!("Record frame validation is disabled, corrupted files may decode into garbage");
    }

    let dims = header::read_grid_header(reader, options)?;
    debug!("Grid dimensions: {}", dims);

    let expected_len =
        schema::total_bytes(&dims).ok_or_else(|| dims.invalid("record sizes overflow"))?;

    if let Some(source_len) = source_len {
        check_source_len(&dims, source_len, expected_len)?;
    }

    debug!("Decoding records");
    let raw_fields = records::decode_records(reader, &dims, options)?;

    let mut probe = [0_u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(DecodeError::TrailingBytes { dims });
    }

    let coordinates = Arc::new(Coordinates::new(&dims));

    debug!("Assembling collections");
    collection::build_matrix(raw_fields, dims, coordinates, options)
}

/// Compares the actual source length with the one implied by the header,
/// so that a mismatched file fails before large buffers get allocated.
fn check_source_len(
    dims: &GridDimensions,
    source_len: u64,
    expected_len: usize,
) -> Result<(), DecodeError> {
    let expected_len = expected_len as u64;

    if source_len < expected_len {
        return Err(DecodeError::UnexpectedEndOfFile {
            field: schema::field_at_offset(dims, source_len as usize),
            dims: *dims,
        });
    }

    if source_len > expected_len {
        return Err(DecodeError::TrailingBytes { dims: *dims });
    }

    Ok(())
}
