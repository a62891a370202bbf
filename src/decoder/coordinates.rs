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

//! Sub-module deriving coordinate arrays from the grid dimensions.

use super::GridDimensions;
use crate::{
    constants::{FIRST_LONGITUDE, LAST_LONGITUDE, NORTH_POLE, SOUTH_POLE},
    Float,
};
use ndarray::Array1;

/// Coordinates of the grid: latitudes and longitudes in degrees
/// and vertical levels numbered from 1.
#[derive(Clone, PartialEq, Debug)]
pub struct Coordinates {
    dimensions: GridDimensions,
    latitudes: Array1<Float>,
    longitudes: Array1<Float>,
    levels: Array1<i32>,
}

impl Coordinates {
    /// Latitudes span from pole to pole and longitudes span the full
    /// circle, both with ends included. An axis with a single point
    /// holds only its first boundary value.
    pub fn new(dims: &GridDimensions) -> Self {
        Coordinates {
            dimensions: *dims,
            latitudes: inclusive_span(SOUTH_POLE, NORTH_POLE, dims.latitudes()),
            longitudes: inclusive_span(FIRST_LONGITUDE, LAST_LONGITUDE, dims.longitudes()),
            levels: (1..=dims.levels() as i32).collect(),
        }
    }

    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    pub fn latitudes(&self) -> &Array1<Float> {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &Array1<Float> {
        &self.longitudes
    }

    pub fn levels(&self) -> &Array1<i32> {
        &self.levels
    }
}

/// Evenly spaced values from `start` to `end`, both included.
///
/// The last value is pinned to `end`, as the accumulated step
/// of `linspace` can miss it. A single point holds `start`
/// and an empty axis gives an empty array.
fn inclusive_span(start: Float, end: Float, count: usize) -> Array1<Float> {
    if count == 1 {
        return Array1::from_elem(1, start);
    }

    let mut span = Array1::linspace(start, end, count);

    if let Some(last) = span.last_mut() {
        *last = end;
    }

    span
}
