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

//! CSV summary of decoded matrices: one row per array
//! with its axes, shape and value statistics.

use crate::{errors::DriverError, matrix::NamedArray, DecodedMatrix, Group};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Columns of the summary file.
pub const SUMMARY_HEADER: [&str; 9] =
    ["file", "group", "variable", "field", "axes", "shape", "min", "max", "mean"];

/// Writes statistics of every decoded array into a CSV file.
///
/// `files` and `matrices` are paired in order. Missing parent
/// directories of `summary_path` are created.
pub fn write_summary(
    summary_path: &Path,
    files: &[PathBuf],
    matrices: &[DecodedMatrix],
) -> Result<(), DriverError> {
    if let Some(parent) = summary_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut out_file = csv::Writer::from_path(summary_path)?;
    out_file.write_record(&SUMMARY_HEADER)?;

    for (file, matrix) in files.iter().zip(matrices) {
        for group in Group::ALL {
            for (key, array) in matrix.group(group).iter() {
                let (min, max) = array.min_max().unwrap_or((f32::NAN, f32::NAN));
                let mean = array.data().mean().unwrap_or(f32::NAN);

                out_file.write_record(&[
                    file.display().to_string(),
                    group.to_string(),
                    key.to_string(),
                    array.name().to_string(),
                    axis_names(array).join(" "),
                    format!("{:?}", array.shape()),
                    min.to_string(),
                    max.to_string(),
                    mean.to_string(),
                ])?;
            }
        }
    }

    out_file.flush()?;

    Ok(())
}

pub fn axis_names(array: &NamedArray) -> Vec<&'static str> {
    array.axes().iter().map(|axis| axis.as_str()).collect()
}
