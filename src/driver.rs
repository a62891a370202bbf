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

//! Module with the actual program steps: reading configuration,
//! decoding input files and reporting what was decoded.

use gsiberror::{
    configuration::Config,
    decode_file,
    errors::DriverError,
    global_min_max,
    summary::{axis_names, write_summary},
    DecodedMatrix, Group,
};
use log::{debug, info};
use rayon::ThreadPoolBuilder;
use std::{env, path::PathBuf};

/// Main program function, responsible for all steps.
pub fn main() -> Result<(), DriverError> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.yaml"));

    info!("Reading configuration from {}", config_path.display());
    let config = Config::new_from_file(&config_path)?;

    debug!("Setting up ThreadPool");
    let threadpool = ThreadPoolBuilder::new()
        .num_threads(config.resources.threads as usize)
        .build()?;

    let mut matrices = Vec::with_capacity(config.input.files.len());

    for path in &config.input.files {
        info!("Decoding {}", path.display());

        let matrix = threadpool
            .install(|| decode_file(path, &config.decoder))
            .map_err(|source| DriverError::Decode {
                path: path.display().to_string(),
                source,
            })?;

        log_matrix(&matrix);
        matrices.push(matrix);
    }

    if matrices.len() > 1 {
        log_global_ranges(&matrices);
    }

    if let Some(summary_path) = &config.output.summary {
        info!("Writing summary to {}", summary_path.display());
        write_summary(summary_path, &config.input.files, &matrices)?;
    }

    Ok(())
}

fn log_matrix(matrix: &DecodedMatrix) {
    info!("Grid dimensions: {}", matrix.dimensions());

    for variable in matrix.control_variables() {
        debug!(
            "Control variable {} with significance flag {}",
            variable.tag, variable.significance
        );
    }

    for group in Group::ALL {
        for (key, array) in matrix.group(group).iter() {
            let (min, max) = array.min_max().unwrap_or((f32::NAN, f32::NAN));

            info!(
                "{}[{}] {} {:?} {:?} min: {} max: {}",
                group,
                key,
                array.name(),
                axis_names(array),
                array.shape(),
                min,
                max
            );
        }
    }
}

/// Logs the range of every variable across all decoded files.
fn log_global_ranges(matrices: &[DecodedMatrix]) {
    for group in Group::ALL {
        for (key, _) in matrices[0].group(group).iter() {
            if let Some((min, max)) = global_min_max(matrices, group, key) {
                info!("{}[{}] range across files: {} to {}", group, key, min, max);
            }
        }
    }
}
