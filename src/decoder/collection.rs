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

//! Sub-module grouping decoded fields into the collections
//! of a [`DecodedMatrix`].
//!
//! Each group has a fixed table mapping short variable names
//! to the schema fields they are read from.

use super::{
    assembler::{self, ShapeClass},
    records::RawField,
    schema::{self, CONTROL_VARIABLES},
    Coordinates, DecoderOptions, GridDimensions,
};
use crate::{
    errors::DecodeError,
    matrix::{Collection, ControlVariable, DecodedMatrix, Group, NamedArray},
};
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::Arc;

static BALANCE_PROJECTIONS: [(&str, &str); 3] = [
    ("agvin", "agvin"),
    ("bgvin", "bgvin"),
    ("wgvin", "wgvin"),
];

static AMPLITUDES: [(&str, &str); 9] = [
    ("sf", "corzin_sf"),
    ("vp", "corzin_vp"),
    ("t", "corzin_t"),
    ("q", "corzin_q"),
    ("qin", "corqin_q"),
    ("oz", "corzin_oz"),
    ("ps", "corpin_ps"),
    ("cw", "corzin_cw"),
    ("sst", "corsstin_sst"),
];

static HORIZONTAL_SCALES: [(&str, &str); 8] = [
    ("sf", "hscalesin_sf"),
    ("vp", "hscalesin_vp"),
    ("t", "hscalesin_t"),
    ("q", "hscalesin_q"),
    ("oz", "hscalesin_oz"),
    ("ps", "hscalespin_ps"),
    ("cw", "hscalesin_cw"),
    // same field other readers expose as `hsstin_ps`
    ("sst", "hsstin_sst"),
];

// surface pressure and sea surface temperature have no vertical scales
static VERTICAL_SCALES: [(&str, &str); 6] = [
    ("sf", "vscalesin_sf"),
    ("vp", "vscalesin_vp"),
    ("t", "vscalesin_t"),
    ("q", "vscalesin_q"),
    ("oz", "vscalesin_oz"),
    ("cw", "vscalesin_cw"),
];

/// Mapping of short variable names to schema field names for the `group`.
pub fn table(group: Group) -> &'static [(&'static str, &'static str)] {
    match group {
        Group::BalanceProjections => &BALANCE_PROJECTIONS,
        Group::Amplitudes => &AMPLITUDES,
        Group::HorizontalScales => &HORIZONTAL_SCALES,
        Group::VerticalScales => &VERTICAL_SCALES,
    }
}

/// Field waiting for assembly.
struct Job {
    group: Group,
    key: &'static str,
    field: &'static str,
    shape: ShapeClass,
    values: Vec<f32>,
}

/// Builds the decoded matrix from raw fields.
///
/// Every table entry takes its field out of `raw_fields`,
/// so each field ends up in exactly one collection.
pub(super) fn build_matrix(
    mut raw_fields: FxHashMap<&'static str, RawField>,
    dimensions: GridDimensions,
    coordinates: Arc<Coordinates>,
    options: &DecoderOptions,
) -> Result<DecodedMatrix, DecodeError> {
    let control_variables = collect_control_variables(&mut raw_fields)?;
    let jobs = prepare_jobs(&mut raw_fields)?;

    let assemble = |job: Job| -> Result<(Group, &'static str, NamedArray), DecodeError> {
        let array = assembler::assemble(job.field, job.values, job.shape, &coordinates)?;
        Ok((job.group, job.key, array))
    };

    let assembled: Vec<(Group, &'static str, NamedArray)> = if options.parallel_assembly {
        debug!("Assembling {} fields in parallel", jobs.len());
        jobs.into_par_iter().map(assemble).collect::<Result<_, _>>()?
    } else {
        jobs.into_iter().map(assemble).collect::<Result<_, _>>()?
    };

    let mut entries: FxHashMap<Group, Vec<(&'static str, NamedArray)>> = FxHashMap::default();
    for (group, key, array) in assembled {
        entries.entry(group).or_default().push((key, array));
    }

    let mut take =
        |group: Group| Collection::new(group, entries.remove(&group).unwrap_or_default());

    Ok(DecodedMatrix {
        dimensions,
        coordinates,
        balance_projections: take(Group::BalanceProjections),
        amplitudes: take(Group::Amplitudes),
        horizontal_scales: take(Group::HorizontalScales),
        vertical_scales: take(Group::VerticalScales),
        control_variables,
    })
}

/// Looks up every table field in the raw fields and in the schema,
/// keeping the table order.
fn prepare_jobs(
    raw_fields: &mut FxHashMap<&'static str, RawField>,
) -> Result<Vec<Job>, DecodeError> {
    let mut jobs = vec![];

    for group in Group::ALL {
        for &(key, field) in table(group) {
            let shape = schema::find(field)
                .and_then(|spec| spec.size.shape_class())
                .ok_or(DecodeError::UnknownVariable(field))?;

            let values = match raw_fields.remove(field) {
                Some(RawField::Float(values)) => values,
                _ => return Err(DecodeError::UnknownVariable(field)),
            };

            jobs.push(Job {
                group,
                key,
                field,
                shape,
                values,
            });
        }
    }

    Ok(jobs)
}

fn collect_control_variables(
    raw_fields: &mut FxHashMap<&'static str, RawField>,
) -> Result<Vec<ControlVariable>, DecodeError> {
    let mut variables = Vec::with_capacity(CONTROL_VARIABLES.len());

    for variable in CONTROL_VARIABLES {
        let tag = raw_fields
            .remove(variable)
            .as_ref()
            .and_then(RawField::trimmed_text)
            .map(str::to_string)
            .ok_or(DecodeError::UnknownVariable(variable))?;

        let significance = match raw_fields.remove(schema::significance_field(variable).as_str()) {
            Some(RawField::Int(values)) if values.len() == 1 => values[0],
            _ => return Err(DecodeError::UnknownVariable(variable)),
        };

        variables.push(ControlVariable { tag, significance });
    }

    Ok(variables)
}
