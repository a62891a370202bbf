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

//! Sub-module reading the header record, which holds
//! the grid dimensions of the whole file.

use super::{records::read_marker, DecoderOptions, GridDimensions};
use crate::{constants::HEADER_PAYLOAD_BYTES, errors::DecodeError};
use byteorder::{BigEndian, ByteOrder};
use std::io::Read;

/// Reads the header record: leading marker, levels, latitudes
/// and longitudes counts, and trailing marker.
///
/// Dimensions are checked before the trailing marker is read,
/// so an invalid header never reaches the record decoder.
pub(super) fn read_grid_header<R: Read>(
    reader: &mut R,
    options: &DecoderOptions,
) -> Result<GridDimensions, DecodeError> {
    let mut leading = Vec::with_capacity(4);
    reader.by_ref().take(4).read_to_end(&mut leading)?;

    if leading.len() < 4 {
        return Err(DecodeError::TruncatedHeader(0));
    }

    let mut payload = Vec::with_capacity(HEADER_PAYLOAD_BYTES);
    reader
        .by_ref()
        .take(HEADER_PAYLOAD_BYTES as u64)
        .read_to_end(&mut payload)?;

    if payload.len() < HEADER_PAYLOAD_BYTES {
        return Err(DecodeError::TruncatedHeader(payload.len()));
    }

    let dims = GridDimensions::new(
        BigEndian::read_i32(&payload[0..4]),
        BigEndian::read_i32(&payload[4..8]),
        BigEndian::read_i32(&payload[8..12]),
    )?;

    let leading = BigEndian::read_i32(&leading);
    let trailing = read_marker(reader, "header", &dims)?;

    if options.validate_frames
        && (leading != trailing || leading != HEADER_PAYLOAD_BYTES as i32)
    {
        return Err(DecodeError::FrameMismatch {
            record: "header",
            leading,
            trailing,
            expected: HEADER_PAYLOAD_BYTES,
            dims,
        });
    }

    Ok(dims)
}
