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

//! Module responsible for parsing and checking the configuration file
//! of the `gsiberror` program.
//!
//! The configuration file uses [YAML](https://en.wikipedia.org/wiki/YAML)
//! and `serde` to enforce strong typing and automatic type checking.
//!
//! The structures and their fields in this module directly correspond to
//! the fields inside `config.yaml`:
//!
//! ```yaml
//! input:
//!   files:
//!     - ./data/gsir4.berror_stats.gcv
//! decoder:
//!   validate_frames: true
//!   parallel_assembly: true
//! resources:
//!   threads: 4
//! output:
//!   summary: ./output/summary.csv
//! ```

use crate::{decoder::DecoderOptions, errors::ConfigError};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Fields with information about files to decode.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Input {
    /// List of `.gcv` files to decode. Cannot be empty.
    pub files: Vec<PathBuf>,
}

impl Input {
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if self.files.is_empty() {
            return Err(ConfigError::OutOfBounds(
                "At least one input file must be provided",
            ));
        }

        Ok(())
    }
}

/// _(Optional)_ Fields with information about
/// resources available for the program.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Resources {
    /// _(Optional)_ Thread count of the pool used
    /// for parallel assembly of decoded fields.
    ///
    /// Cannot be less than `1`. Defaults to `1`.
    #[serde(default = "Resources::default_threads")]
    pub threads: u16,
}

impl Resources {
    fn default_threads() -> u16 {
        1
    }

    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if self.threads < 1 {
            return Err(ConfigError::OutOfBounds(
                "Available threads cannot be less than 1",
            ));
        }

        Ok(())
    }
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            threads: Resources::default_threads(),
        }
    }
}

/// _(Optional)_ Fields with information about program output.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
pub struct Output {
    /// _(Optional)_ Path of a CSV file where statistics
    /// of every decoded array are written.
    #[serde(default)]
    pub summary: Option<PathBuf>,
}

/// Main config structure representing the fields in
/// configuration file.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Config {
    pub input: Input,

    #[serde(default)]
    pub decoder: DecoderOptions,

    #[serde(default)]
    pub resources: Resources,

    #[serde(default)]
    pub output: Output,
}

impl Config {
    /// Config structure constructor, responsible for
    /// deserializing configuration and checking it.
    pub fn new_from_file(file_path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read(file_path)?;

        Config::new_from_slice(data.as_slice())
    }

    pub fn new_from_slice(data: &[u8]) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_slice(data)?;

        config.input.check_bounds()?;
        config.resources.check_bounds()?;

        Ok(config)
    }
}
