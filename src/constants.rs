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

//! Module containing constants of the `.gcv` file layout
//! and of the coordinate system used by the decoder.

use crate::Float;

/// Size (in bytes) of a Fortran unformatted record marker.
pub const MARKER_BYTES: usize = 4;

/// Size (in bytes) of a big-endian 32-bit float or integer.
pub const WORD_BYTES: usize = 4;

/// Size (in bytes) of a control variable tag.
pub const TAG_BYTES: usize = 5;

/// Payload size (in bytes) of the header record
/// holding levels, latitudes and longitudes counts.
pub const HEADER_PAYLOAD_BYTES: usize = 3 * WORD_BYTES;

///Southernmost latitude of the grid
pub const SOUTH_POLE: Float = -90.0;

///Northernmost latitude of the grid
pub const NORTH_POLE: Float = 90.0;

///First longitude of the grid
pub const FIRST_LONGITUDE: Float = 0.0;

///Last longitude of the grid (repeats the first one)
pub const LAST_LONGITUDE: Float = 360.0;
