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

//! Sub-module describing the physical layout of records
//! following the header in a `.gcv` file.
//!
//! The layout is kept as a single ordered table of [`FieldSpec`]s.
//! Record markers are entries of the table like any data field:
//! markers alternate between opening and closing a record, and
//! every field between a pair belongs to the payload of that record.
//!
//! After the header record the file holds:
//!
//! 1. one record with the balance projections `agvin`, `bgvin` and `wgvin`,
//! 2. for each control variable a record with its 5-byte tag and
//!    a significance flag, followed by amplitude, horizontal scale
//!    and (except for `ps` and `sst`) vertical scale records.
//!
//! Humidity (`q`) stores its normalized amplitude (`corqin_q`)
//! in the same record as its regular amplitude.

use super::{assembler::ShapeClass, GridDimensions};
use crate::constants::{HEADER_PAYLOAD_BYTES, MARKER_BYTES, TAG_BYTES, WORD_BYTES};
use self::SizeClass::{PerLatLevel, PerLatLevel2, PerLatLon, PerLatitude};

/// Type of elements stored in a schema entry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementKind {
    /// Fortran record length marker, big-endian 32-bit integer.
    Marker,
    Float32,
    Int32,
    /// 5-byte ASCII control variable tag.
    Ascii5,
}

impl ElementKind {
    pub fn element_bytes(self) -> usize {
        match self {
            ElementKind::Marker => MARKER_BYTES,
            ElementKind::Float32 | ElementKind::Int32 => WORD_BYTES,
            ElementKind::Ascii5 => TAG_BYTES,
        }
    }
}

/// Number of elements in a schema entry as a function of grid dimensions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SizeClass {
    Single,
    PerLatitude,
    PerLatLevel,
    PerLatLon,
    PerLatLevel2,
}

impl SizeClass {
    /// Element count for given dimensions, `None` on overflow.
    pub fn element_count(self, dims: &GridDimensions) -> Option<usize> {
        match self {
            SizeClass::Single => Some(1),
            SizeClass::PerLatitude => Some(dims.latitudes()),
            SizeClass::PerLatLevel => dims.latitudes().checked_mul(dims.levels()),
            SizeClass::PerLatLon => dims.latitudes().checked_mul(dims.longitudes()),
            SizeClass::PerLatLevel2 => dims
                .latitudes()
                .checked_mul(dims.levels())?
                .checked_mul(dims.levels()),
        }
    }

    /// Shape the field takes once assembled, if it is an array field.
    pub(crate) fn shape_class(self) -> Option<ShapeClass> {
        match self {
            SizeClass::Single => None,
            SizeClass::PerLatitude => Some(ShapeClass::ScalarByLatitude),
            SizeClass::PerLatLevel => Some(ShapeClass::ByLatitudeLevel),
            SizeClass::PerLatLon => Some(ShapeClass::ByLatitudeLongitude),
            SizeClass::PerLatLevel2 => Some(ShapeClass::ByLatitudeLevelLevel),
        }
    }
}

/// Single entry of the record schema.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ElementKind,
    pub size: SizeClass,
}

impl FieldSpec {
    /// Length of the entry in bytes, `None` on overflow.
    pub fn byte_len(&self, dims: &GridDimensions) -> Option<usize> {
        self.size
            .element_count(dims)?
            .checked_mul(self.kind.element_bytes())
    }

    pub fn is_marker(&self) -> bool {
        self.kind == ElementKind::Marker
    }
}

const fn marker() -> FieldSpec {
    FieldSpec {
        name: "record marker",
        kind: ElementKind::Marker,
        size: SizeClass::Single,
    }
}

const fn tag(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: ElementKind::Ascii5,
        size: SizeClass::Single,
    }
}

const fn flag(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: ElementKind::Int32,
        size: SizeClass::Single,
    }
}

const fn data(name: &'static str, size: SizeClass) -> FieldSpec {
    FieldSpec {
        name,
        kind: ElementKind::Float32,
        size,
    }
}

/// Control variables in the order their blocks appear in the file.
pub const CONTROL_VARIABLES: [&str; 8] = ["sf", "vp", "t", "q", "oz", "cw", "ps", "sst"];

/// Name of the significance flag field of a control variable.
pub fn significance_field(variable: &str) -> String {
    format!("sig_{}", variable)
}

/// Records following the header, in file order.
#[rustfmt::skip]
pub static SCHEMA: &[FieldSpec] = &[
    marker(),
        data("agvin", PerLatLevel2), data("bgvin", PerLatLevel), data("wgvin", PerLatLevel),
    marker(),

    marker(), tag("sf"), flag("sig_sf"), marker(),
    marker(), data("corzin_sf", PerLatLevel), marker(),
    marker(), data("hscalesin_sf", PerLatLevel), marker(),
    marker(), data("vscalesin_sf", PerLatLevel), marker(),

    marker(), tag("vp"), flag("sig_vp"), marker(),
    marker(), data("corzin_vp", PerLatLevel), marker(),
    marker(), data("hscalesin_vp", PerLatLevel), marker(),
    marker(), data("vscalesin_vp", PerLatLevel), marker(),

    marker(), tag("t"), flag("sig_t"), marker(),
    marker(), data("corzin_t", PerLatLevel), marker(),
    marker(), data("hscalesin_t", PerLatLevel), marker(),
    marker(), data("vscalesin_t", PerLatLevel), marker(),

    marker(), tag("q"), flag("sig_q"), marker(),
    marker(), data("corzin_q", PerLatLevel), data("corqin_q", PerLatLevel), marker(),
    marker(), data("hscalesin_q", PerLatLevel), marker(),
    marker(), data("vscalesin_q", PerLatLevel), marker(),

    marker(), tag("oz"), flag("sig_oz"), marker(),
    marker(), data("corzin_oz", PerLatLevel), marker(),
    marker(), data("hscalesin_oz", PerLatLevel), marker(),
    marker(), data("vscalesin_oz", PerLatLevel), marker(),

    marker(), tag("cw"), flag("sig_cw"), marker(),
    marker(), data("corzin_cw", PerLatLevel), marker(),
    marker(), data("hscalesin_cw", PerLatLevel), marker(),
    marker(), data("vscalesin_cw", PerLatLevel), marker(),

    marker(), tag("ps"), flag("sig_ps"), marker(),
    marker(), data("corpin_ps", PerLatitude), marker(),
    marker(), data("hscalespin_ps", PerLatitude), marker(),

    marker(), tag("sst"), flag("sig_sst"), marker(),
    marker(), data("corsstin_sst", PerLatLon), marker(),
    // named `hsstin_ps` by some existing readers
    marker(), data("hsstin_sst", PerLatLon), marker(),
];

/// Finds a data entry of the schema by its name.
pub fn find(name: &str) -> Option<&'static FieldSpec> {
    SCHEMA
        .iter()
        .find(|spec| !spec.is_marker() && spec.name == name)
}

/// Length of the header record including its markers.
pub const fn header_record_bytes() -> usize {
    2 * MARKER_BYTES + HEADER_PAYLOAD_BYTES
}

/// Total length (in bytes) of a file with given dimensions,
/// `None` if it does not fit in `usize`.
pub fn total_bytes(dims: &GridDimensions) -> Option<usize> {
    SCHEMA
        .iter()
        .try_fold(header_record_bytes(), |total, spec| {
            total.checked_add(spec.byte_len(dims)?)
        })
}

/// Name of the schema entry covering the byte `offset` of the file.
///
/// Used to tell which field a truncated file ends in.
/// Offsets past the end of the schema point at the last marker.
pub fn field_at_offset(dims: &GridDimensions, offset: usize) -> &'static str {
    if offset < header_record_bytes() {
        return "header";
    }

    let mut start = header_record_bytes();

    for spec in SCHEMA {
        let end = match spec.byte_len(dims).and_then(|len| start.checked_add(len)) {
            Some(end) => end,
            None => return spec.name,
        };

        if offset < end {
            return spec.name;
        }

        start = end;
    }

    SCHEMA[SCHEMA.len() - 1].name
}
