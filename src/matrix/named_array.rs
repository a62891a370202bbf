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

//! Sub-module with the array type handed out to users of decoded files.

use crate::{
    decoder::{Coordinates, GridDimensions},
    Float,
};
use ndarray::{ArrayD, ArrayView1, Axis};
use std::{fmt, sync::Arc};

/// Name of an array axis.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AxisName {
    Level,
    Latitude,
    Longitude,
    /// Second level axis of the 3D balance projection.
    Level2,
}

impl AxisName {
    pub fn as_str(self) -> &'static str {
        match self {
            AxisName::Level => "level",
            AxisName::Latitude => "latitude",
            AxisName::Longitude => "longitude",
            AxisName::Level2 => "level_2",
        }
    }

    /// Number of points along the axis.
    pub fn len(self, dims: &GridDimensions) -> usize {
        match self {
            AxisName::Level | AxisName::Level2 => dims.levels(),
            AxisName::Latitude => dims.latitudes(),
            AxisName::Longitude => dims.longitudes(),
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinate values along one axis.
#[derive(Clone, PartialEq, Debug)]
pub enum AxisCoords<'a> {
    /// Latitudes or longitudes in degrees.
    Degrees(ArrayView1<'a, Float>),
    /// Level numbers, starting from 1.
    Levels(ArrayView1<'a, i32>),
}

/// Multi-dimensional array decoded from a single field,
/// with named axes and coordinates.
///
/// Operations never modify the array, they return a new one.
/// Coordinates are shared between all arrays of a decoded file.
#[derive(Clone, Debug)]
pub struct NamedArray {
    name: &'static str,
    axes: Vec<AxisName>,
    data: ArrayD<f32>,
    coordinates: Arc<Coordinates>,
}

impl NamedArray {
    pub(crate) fn new(
        name: &'static str,
        axes: Vec<AxisName>,
        data: ArrayD<f32>,
        coordinates: Arc<Coordinates>,
    ) -> Self {
        debug_assert_eq!(axes.len(), data.ndim());

        NamedArray {
            name,
            axes,
            data,
            coordinates,
        }
    }

    /// Name of the field in the file, eg. `corzin_sf`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn axes(&self) -> &[AxisName] {
        &self.axes
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// Value at the index given in canonical axis order.
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        if index.len() != self.data.ndim() {
            return None;
        }

        self.data.get(index).copied()
    }

    /// Position of the axis in the array, if present.
    pub fn axis_position(&self, axis: AxisName) -> Option<usize> {
        self.axes.iter().position(|&a| a == axis)
    }

    /// Coordinate values along the axis, if present.
    pub fn coords(&self, axis: AxisName) -> Option<AxisCoords<'_>> {
        self.axis_position(axis)?;

        let coords = match axis {
            AxisName::Latitude => AxisCoords::Degrees(self.coordinates.latitudes().view()),
            AxisName::Longitude => AxisCoords::Degrees(self.coordinates.longitudes().view()),
            AxisName::Level | AxisName::Level2 => {
                AxisCoords::Levels(self.coordinates.levels().view())
            }
        };

        Some(coords)
    }

    /// Sub-array at `index` along `axis`, with that axis removed.
    pub fn index_axis(&self, axis: AxisName, index: usize) -> Option<NamedArray> {
        let position = self.axis_position(axis)?;

        if index >= self.data.len_of(Axis(position)) {
            return None;
        }

        let data = self.data.index_axis(Axis(position), index).to_owned();

        Some(self.with_data(self.axes_without(position), data))
    }

    /// Mean along `axis`, with that axis removed.
    pub fn mean_axis(&self, axis: AxisName) -> Option<NamedArray> {
        let position = self.axis_position(axis)?;
        let data = self.data.mean_axis(Axis(position))?;

        Some(self.with_data(self.axes_without(position), data))
    }

    /// Array with every value multiplied by `factor`,
    /// eg. `0.001` for scales in kilometres.
    pub fn scaled(&self, factor: f32) -> NamedArray {
        self.with_data(self.axes.clone(), self.data.mapv(|v| v * factor))
    }

    /// Smallest and largest value, skipping NaNs.
    ///
    /// Returns `None` when there are no numbers in the array.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    fn axes_without(&self, position: usize) -> Vec<AxisName> {
        let mut axes = self.axes.clone();
        axes.remove(position);
        axes
    }

    fn with_data(&self, axes: Vec<AxisName>, data: ArrayD<f32>) -> NamedArray {
        NamedArray::new(self.name, axes, data, Arc::clone(&self.coordinates))
    }
}
