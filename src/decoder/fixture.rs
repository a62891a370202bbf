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

//! Test-only encoder writing synthetic `.gcv` files
//! from the record schema.
//!
//! Every float element gets the next value of a single counter
//! running through the whole file, so each value is unique and
//! its source position can be recovered.

use super::{
    schema::{ElementKind, SCHEMA},
    GridDimensions,
};
use crate::constants::{HEADER_PAYLOAD_BYTES, TAG_BYTES};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use rustc_hash::FxHashMap;

/// Significance flag written for every control variable.
pub(crate) const SIGNIFICANCE: i32 = 7;

pub(crate) struct Fixture {
    pub bytes: Vec<u8>,
    /// Float values written for each field, in storage order.
    pub values: FxHashMap<&'static str, Vec<f32>>,
}

pub(crate) fn encode(dims: &GridDimensions) -> Fixture {
    encode_raw(dims.levels() as i32, dims.latitudes() as i32, dims.longitudes() as i32, dims)
}

/// Writes a header with arbitrary values followed by records
/// sized after `dims`.
pub(crate) fn encode_raw(
    levels: i32,
    latitudes: i32,
    longitudes: i32,
    dims: &GridDimensions,
) -> Fixture {
    let mut bytes: Vec<u8> = vec![];
    let mut values = FxHashMap::default();
    let mut counter = 0_u32;

    bytes.write_i32::<BigEndian>(HEADER_PAYLOAD_BYTES as i32).unwrap();
    bytes.write_i32::<BigEndian>(levels).unwrap();
    bytes.write_i32::<BigEndian>(latitudes).unwrap();
    bytes.write_i32::<BigEndian>(longitudes).unwrap();
    bytes.write_i32::<BigEndian>(HEADER_PAYLOAD_BYTES as i32).unwrap();

    let mut record_start: Option<usize> = None;

    for spec in SCHEMA {
        match spec.kind {
            ElementKind::Marker => match record_start.take() {
                None => {
                    record_start = Some(bytes.len());
                    bytes.write_i32::<BigEndian>(0).unwrap();
                }
                Some(start) => {
                    let payload = (bytes.len() - start - 4) as i32;
                    BigEndian::write_i32(&mut bytes[start..start + 4], payload);
                    bytes.write_i32::<BigEndian>(payload).unwrap();
                }
            },
            ElementKind::Ascii5 => {
                let tag = format!("{:<width$}", spec.name, width = TAG_BYTES);
                bytes.extend_from_slice(tag.as_bytes());
            }
            ElementKind::Int32 => {
                bytes.write_i32::<BigEndian>(SIGNIFICANCE).unwrap();
            }
            ElementKind::Float32 => {
                let count = spec.size.element_count(dims).unwrap();
                let field: Vec<f32> = (0..count)
                    .map(|_| {
                        counter += 1;
                        counter as f32
                    })
                    .collect();

                for value in &field {
                    bytes.write_f32::<BigEndian>(*value).unwrap();
                }

                values.insert(spec.name, field);
            }
        }
    }

    Fixture { bytes, values }
}
