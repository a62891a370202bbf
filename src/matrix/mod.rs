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

//! Module containing the result of decoding a `.gcv` file.

mod named_array;

pub use self::named_array::{AxisCoords, AxisName, NamedArray};

use crate::decoder::{Coordinates, GridDimensions};
use std::{fmt, ops::Index, sync::Arc};

/// Groups of arrays in a decoded file.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Group {
    /// Regression coefficients projecting stream function
    /// onto balanced temperature, surface pressure and velocity potential.
    BalanceProjections,
    /// Standard deviations of the control variables.
    Amplitudes,
    /// Horizontal correlation length scales (in metres).
    HorizontalScales,
    /// Vertical correlation length scales.
    VerticalScales,
}

impl Group {
    pub const ALL: [Group; 4] = [
        Group::BalanceProjections,
        Group::Amplitudes,
        Group::HorizontalScales,
        Group::VerticalScales,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Group::BalanceProjections => "balprojs",
            Group::Amplitudes => "amplitudes",
            Group::HorizontalScales => "hscales",
            Group::VerticalScales => "vscales",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arrays of one group keyed by short variable names,
/// kept in the order of the group table.
#[derive(Clone, Debug)]
pub struct Collection {
    group: Group,
    entries: Vec<(&'static str, NamedArray)>,
}

impl Collection {
    pub(crate) fn new(group: Group, entries: Vec<(&'static str, NamedArray)>) -> Self {
        Collection { group, entries }
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn get(&self, key: &str) -> Option<&NamedArray> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, array)| array)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &NamedArray)> + '_ {
        self.entries.iter().map(|(key, array)| (*key, array))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<&str> for Collection {
    type Output = NamedArray;

    /// # Panics
    ///
    /// When there is no array with the `key`.
    fn index(&self, key: &str) -> &NamedArray {
        self.get(key)
            .unwrap_or_else(|| panic!("no {} entry named {}", self.group, key))
    }
}

/// Header of a control variable block: its tag
/// (without padding) and the significance flag.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ControlVariable {
    pub tag: String,
    pub significance: i32,
}

/// Fully decoded background error covariance file.
///
/// Created only by a successful decode and never modified afterwards.
#[derive(Clone, Debug)]
pub struct DecodedMatrix {
    pub(crate) dimensions: GridDimensions,
    pub(crate) coordinates: Arc<Coordinates>,
    pub(crate) balance_projections: Collection,
    pub(crate) amplitudes: Collection,
    pub(crate) horizontal_scales: Collection,
    pub(crate) vertical_scales: Collection,
    pub(crate) control_variables: Vec<ControlVariable>,
}

impl DecodedMatrix {
    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn balance_projections(&self) -> &Collection {
        &self.balance_projections
    }

    pub fn amplitudes(&self) -> &Collection {
        &self.amplitudes
    }

    pub fn horizontal_scales(&self) -> &Collection {
        &self.horizontal_scales
    }

    pub fn vertical_scales(&self) -> &Collection {
        &self.vertical_scales
    }

    /// Control variable block headers in file order.
    pub fn control_variables(&self) -> &[ControlVariable] {
        &self.control_variables
    }

    pub fn group(&self, group: Group) -> &Collection {
        match group {
            Group::BalanceProjections => &self.balance_projections,
            Group::Amplitudes => &self.amplitudes,
            Group::HorizontalScales => &self.horizontal_scales,
            Group::VerticalScales => &self.vertical_scales,
        }
    }

    pub fn get(&self, group: Group, key: &str) -> Option<&NamedArray> {
        self.group(group).get(key)
    }
}

/// Smallest and largest value of one variable across several files,
/// eg. to put plots of different matrices on a common scale.
///
/// Files missing the variable or holding only NaNs are skipped.
pub fn global_min_max(matrices: &[DecodedMatrix], group: Group, key: &str) -> Option<(f32, f32)> {
    matrices
        .iter()
        .filter_map(|matrix| matrix.get(group, key)?.min_max())
        .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
}
