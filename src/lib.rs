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

//! GSI Background Error Reader (gsiberror) decodes background-error
//! covariance matrices used by the Gridpoint Statistical Interpolation (GSI)
//! data-assimilation system, stored in the `.gcv` file format.
//!
//! A `.gcv` file is a big-endian Fortran unformatted sequential file.
//! Its first record holds the number of vertical levels, latitudes and
//! longitudes of the grid and the size of every following record is derived
//! from those three values.
//!
//! The decoded file is returned as a [`DecodedMatrix`] with four groups
//! of [`NamedArray`]s:
//!
//! - balance projections (`agvin`, `bgvin`, `wgvin`),
//! - amplitudes (standard deviations) of the control variables,
//! - horizontal length scales,
//! - vertical length scales.
//!
//! ```no_run
//! use gsiberror::{decode_file, DecoderOptions, Group};
//! use std::path::Path;
//!
//! let matrix = decode_file(Path::new("gsir4.berror_stats.gcv"), &DecoderOptions::default())?;
//! let sf = matrix.get(Group::Amplitudes, "sf").unwrap();
//!
//! println!("{:?} {:?}", sf.axes(), sf.shape());
//! # Ok::<(), gsiberror::errors::DecodeError>(())
//! ```

pub mod configuration;
pub mod constants;
pub mod decoder;
pub mod errors;
pub mod matrix;
pub mod summary;

#[cfg(test)]
mod super_tests;

pub use decoder::{
    decode_bytes, decode_file, decode_reader, Coordinates, DecoderOptions, GridDimensions,
};
pub use matrix::{
    global_min_max, AxisCoords, AxisName, Collection, ControlVariable, DecodedMatrix, Group,
    NamedArray,
};

/// Floating point type of coordinates.
pub type Float = f64;
