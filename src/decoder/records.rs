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

//! Sub-module decoding the records following the header
//! into flat buffers, one per schema entry.

use super::{
    schema::{ElementKind, FieldSpec, SCHEMA},
    DecoderOptions, GridDimensions,
};
use crate::{constants::MARKER_BYTES, errors::DecodeError};
use byteorder::{BigEndian, ByteOrder};
use log::trace;
use rustc_hash::FxHashMap;
use std::io::Read;

/// Flat content of a single schema entry, in storage order.
#[derive(Clone, PartialEq, Debug)]
pub(crate) enum RawField {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Text(String),
}

impl RawField {
    /// Text content without padding.
    pub(crate) fn trimmed_text(&self) -> Option<&str> {
        match self {
            RawField::Text(text) => {
                Some(text.trim_matches(|c: char| c.is_whitespace() || c == '\0'))
            }
            _ => None,
        }
    }
}

/// Record currently being read: its leading marker,
/// first data field and payload bytes read so far.
struct OpenRecord {
    leading: i32,
    first_field: Option<&'static str>,
    payload: usize,
}

impl OpenRecord {
    fn close(
        self,
        trailing: i32,
        dims: &GridDimensions,
        options: &DecoderOptions,
    ) -> Result<(), DecodeError> {
        let record = self.first_field.unwrap_or("empty record");

        if options.validate_frames
            && (self.leading != trailing || i64::from(self.leading) != self.payload as i64)
        {
            return Err(DecodeError::FrameMismatch {
                record,
                leading: self.leading,
                trailing,
                expected: self.payload,
                dims: *dims,
            });
        }

        trace!("Record {} closed with {} payload bytes", record, self.payload);

        Ok(())
    }
}

/// Reads every entry of the schema in order.
///
/// The reader must be positioned right after the header record.
/// Returned fields are keyed by their schema names, markers are
/// checked (or skipped) and not returned.
pub(super) fn decode_records<R: Read>(
    reader: &mut R,
    dims: &GridDimensions,
    options: &DecoderOptions,
) -> Result<FxHashMap<&'static str, RawField>, DecodeError> {
    let mut fields = FxHashMap::default();
    let mut open: Option<OpenRecord> = None;

    for spec in SCHEMA {
        if spec.is_marker() {
            let record = open.as_ref().and_then(|r| r.first_field).unwrap_or(spec.name);
            let marker = read_marker(reader, record, dims)?;

            match open.take() {
                None => {
                    open = Some(OpenRecord {
                        leading: marker,
                        first_field: None,
                        payload: 0,
                    })
                }
                Some(record) => record.close(marker, dims, options)?,
            }

            continue;
        }

        let byte_len = spec.byte_len(dims).ok_or_else(|| dims.invalid("record sizes overflow"))?;
        let field = read_field(reader, spec, byte_len, dims)?;

        if spec.kind == ElementKind::Ascii5 && options.validate_tags {
            check_tag(spec, &field, dims)?;
        }

        if let Some(record) = open.as_mut() {
            record.first_field.get_or_insert(spec.name);
            record.payload += byte_len;
        }

        trace!("Decoded {} ({} bytes)", spec.name, byte_len);
        fields.insert(spec.name, field);
    }

    Ok(fields)
}

/// Reads a single record marker.
pub(super) fn read_marker<R: Read>(
    reader: &mut R,
    field: &'static str,
    dims: &GridDimensions,
) -> Result<i32, DecodeError> {
    let bytes = read_bytes(reader, MARKER_BYTES, field, dims)?;

    Ok(BigEndian::read_i32(&bytes))
}

fn read_field<R: Read>(
    reader: &mut R,
    spec: &FieldSpec,
    byte_len: usize,
    dims: &GridDimensions,
) -> Result<RawField, DecodeError> {
    let bytes = read_bytes(reader, byte_len, spec.name, dims)?;
    let count = byte_len / spec.kind.element_bytes();

    let field = match spec.kind {
        ElementKind::Float32 => {
            let mut values = vec![0.0; count];
            BigEndian::read_f32_into(&bytes, &mut values);
            RawField::Float(values)
        }
        ElementKind::Int32 | ElementKind::Marker => {
            let mut values = vec![0; count];
            BigEndian::read_i32_into(&bytes, &mut values);
            RawField::Int(values)
        }
        ElementKind::Ascii5 => RawField::Text(String::from_utf8_lossy(&bytes).into_owned()),
    };

    Ok(field)
}

/// Reads exactly `len` bytes.
///
/// The buffer grows with the data actually read, so a header
/// declaring huge dimensions cannot force a huge allocation
/// on a short source.
fn read_bytes<R: Read>(
    reader: &mut R,
    len: usize,
    field: &'static str,
    dims: &GridDimensions,
) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = Vec::with_capacity(len.min(1 << 20));
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;

    if bytes.len() < len {
        return Err(DecodeError::UnexpectedEndOfFile { field, dims: *dims });
    }

    Ok(bytes)
}

fn check_tag(spec: &FieldSpec, field: &RawField, dims: &GridDimensions) -> Result<(), DecodeError> {
    let found = field.trimmed_text().unwrap_or_default();

    if found != spec.name {
        return Err(DecodeError::TagMismatch {
            expected: spec.name,
            found: found.to_string(),
            dims: *dims,
        });
    }

    Ok(())
}
