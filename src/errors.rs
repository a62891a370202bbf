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

use thiserror::Error;

use crate::decoder::GridDimensions;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("File header is truncated: expected 12 bytes of grid dimensions, found {0}")]
    TruncatedHeader(usize),

    #[error("File ended while reading {field} (grid dimensions: {dims})")]
    UnexpectedEndOfFile {
        field: &'static str,
        dims: GridDimensions,
    },

    #[error("Bad framing of {record}: markers {leading}/{trailing}, expected {expected} ({dims})")]
    FrameMismatch {
        record: &'static str,
        leading: i32,
        trailing: i32,
        expected: usize,
        dims: GridDimensions,
    },

    #[error("Collection table references field {0} which is not produced by the record schema")]
    UnknownVariable(&'static str),

    #[error("Invalid grid dimensions ({levels}/{latitudes}/{longitudes}): {reason}")]
    InvalidDimensions {
        levels: i32,
        latitudes: i32,
        longitudes: i32,
        reason: &'static str,
    },

    #[error("Control variable tag mismatch: expected {expected}, found {found:?} ({dims})")]
    TagMismatch {
        expected: &'static str,
        found: String,
        dims: GridDimensions,
    },

    #[error("File is longer than its grid dimensions imply ({dims})")]
    TrailingBytes { dims: GridDimensions },

    #[error("Error while reading the input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error while reshaping a field: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot open config.yaml: {0}")]
    CantOpenFile(#[from] std::io::Error),

    #[error("Cannot deserialize config.yaml: {0}")]
    CantDeserialize(#[from] serde_yaml::Error),

    #[error("Configuration component is out of bounds {0}")]
    OutOfBounds(&'static str),
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Error while reading config.yaml: {0}")]
    Config(#[from] ConfigError),

    #[error("Error while decoding {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: DecodeError,
    },

    #[error("Error while creating ThreadPool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Error while writing the summary: {0}")]
    Summary(#[from] csv::Error),

    #[error("Error while preparing the output: {0}")]
    Output(#[from] std::io::Error),
}
