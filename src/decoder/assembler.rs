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

//! Sub-module reshaping flat field buffers into
//! named multi-dimensional arrays.
//!
//! Fields are stored column-major with latitude varying fastest.
//! Each field is reshaped in that storage order and its axes are
//! then permuted into the canonical order, where level-indexed
//! fields have the level first and latitude second.

use super::{Coordinates, GridDimensions};
use crate::{
    errors::DecodeError,
    matrix::{AxisName, NamedArray},
};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use std::sync::Arc;

/// Shape of an assembled field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum ShapeClass {
    /// `[latitude]`
    ScalarByLatitude,
    /// `[latitude, longitude]`
    ByLatitudeLongitude,
    /// `[level, latitude]`
    ByLatitudeLevel,
    /// `[level, latitude, level_2]`
    ByLatitudeLevelLevel,
}

impl ShapeClass {
    /// Axes in the order the field is stored in the file.
    fn storage_axes(self) -> &'static [AxisName] {
        match self {
            ShapeClass::ScalarByLatitude => &[AxisName::Latitude],
            ShapeClass::ByLatitudeLongitude => &[AxisName::Latitude, AxisName::Longitude],
            ShapeClass::ByLatitudeLevel => &[AxisName::Latitude, AxisName::Level],
            ShapeClass::ByLatitudeLevelLevel => {
                &[AxisName::Latitude, AxisName::Level, AxisName::Level2]
            }
        }
    }

    /// For each canonical axis, its position among the storage axes.
    fn permutation(self) -> &'static [usize] {
        match self {
            ShapeClass::ScalarByLatitude => &[0],
            ShapeClass::ByLatitudeLongitude => &[0, 1],
            ShapeClass::ByLatitudeLevel => &[1, 0],
            ShapeClass::ByLatitudeLevelLevel => &[1, 0, 2],
        }
    }

    /// Axes of the assembled array.
    pub(crate) fn axes(self) -> Vec<AxisName> {
        let storage = self.storage_axes();

        self.permutation().iter().map(|&i| storage[i]).collect()
    }

    fn storage_shape(self, dims: &GridDimensions) -> Vec<usize> {
        self.storage_axes()
            .iter()
            .map(|axis| axis.len(dims))
            .collect()
    }
}

/// Reshapes a flat buffer of the field `name` into
/// a [`NamedArray`] with canonical axis order.
pub(super) fn assemble(
    name: &'static str,
    values: Vec<f32>,
    shape: ShapeClass,
    coordinates: &Arc<Coordinates>,
) -> Result<NamedArray, DecodeError> {
    let storage_shape = shape.storage_shape(coordinates.dimensions());

    let stored = ArrayD::from_shape_vec(IxDyn(&storage_shape).f(), values)?;
    let data = stored
        .permuted_axes(shape.permutation())
        .as_standard_layout()
        .into_owned();

    Ok(NamedArray::new(name, shape.axes(), data, Arc::clone(coordinates)))
}
