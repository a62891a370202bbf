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

//! This is a module for integration tests of the decoder,
//! but with access to private fields and methods.
//!
//! Synthetic files are built by the test-only fixture encoder,
//! which writes every float element as a unique increasing value,
//! so decoded arrays can be compared with their source positions.

use crate::{
    decode_bytes, decode_file, decode_reader,
    decoder::{fixture, schema, GridDimensions},
    errors::DecodeError,
    global_min_max, AxisCoords, AxisName, DecodedMatrix, DecoderOptions, Group,
};
use byteorder::{BigEndian, ByteOrder};
use std::{fs, io::Cursor};
use tempdir::TempDir;

fn dims(levels: usize, latitudes: usize, longitudes: usize) -> GridDimensions {
    GridDimensions::new(levels as i32, latitudes as i32, longitudes as i32).unwrap()
}

fn decode(dims: &GridDimensions) -> (fixture::Fixture, DecodedMatrix) {
    let fixture = fixture::encode(dims);
    let matrix = decode_bytes(&fixture.bytes, &DecoderOptions::default()).unwrap();

    (fixture, matrix)
}

fn keys(matrix: &DecodedMatrix, group: Group) -> Vec<&'static str> {
    let mut keys: Vec<&str> = matrix.group(group).keys().collect();
    keys.sort_unstable();
    keys
}

#[test]
fn group_keys() {
    let (_, matrix) = decode(&dims(2, 3, 2));

    assert_eq!(keys(&matrix, Group::BalanceProjections), vec!["agvin", "bgvin", "wgvin"]);
    assert_eq!(
        keys(&matrix, Group::Amplitudes),
        vec!["cw", "oz", "ps", "q", "qin", "sf", "sst", "t", "vp"]
    );
    assert_eq!(
        keys(&matrix, Group::HorizontalScales),
        vec!["cw", "oz", "ps", "q", "sf", "sst", "t", "vp"]
    );
    assert_eq!(
        keys(&matrix, Group::VerticalScales),
        vec!["cw", "oz", "q", "sf", "t", "vp"]
    );
}

#[test]
fn array_shapes() {
    let (levels, latitudes, longitudes) = (4, 5, 3);
    let (_, matrix) = decode(&dims(levels, latitudes, longitudes));

    let balprojs = matrix.balance_projections();
    assert_eq!(balprojs["agvin"].shape(), &[levels, latitudes, levels]);
    assert_eq!(balprojs["bgvin"].shape(), &[levels, latitudes]);
    assert_eq!(balprojs["wgvin"].shape(), &[levels, latitudes]);

    for group in [Group::Amplitudes, Group::HorizontalScales] {
        for (key, array) in matrix.group(group).iter() {
            match key {
                "ps" => {
                    assert_eq!(array.axes(), &[AxisName::Latitude]);
                    assert_eq!(array.shape(), &[latitudes]);
                }
                "sst" => {
                    assert_eq!(array.axes(), &[AxisName::Latitude, AxisName::Longitude]);
                    assert_eq!(array.shape(), &[latitudes, longitudes]);
                }
                _ => {
                    assert_eq!(array.axes(), &[AxisName::Level, AxisName::Latitude]);
                    assert_eq!(array.shape(), &[levels, latitudes]);
                }
            }
        }
    }

    for (_, array) in matrix.vertical_scales().iter() {
        assert_eq!(array.shape(), &[levels, latitudes]);
    }
}

#[test]
fn transpose_direction() {
    let (fixture, matrix) = decode(&dims(2, 3, 2));

    // column-major (latitude = 0, level = 1) is offset 0 + 1 * 3
    let source = fixture.values["corzin_sf"][3];
    assert_eq!(matrix.amplitudes()["sf"].get(&[1, 0]), Some(source));

    let source = fixture.values["corqin_q"][2 + 3];
    assert_eq!(matrix.amplitudes()["qin"].get(&[1, 2]), Some(source));
}

#[test]
fn every_value_round_trips() {
    for dims in [dims(2, 2, 2), dims(2, 3, 2), dims(5, 7, 4), dims(3, 4, 9)] {
        let (fixture, matrix) = decode(&dims);
        let nlat = dims.latitudes();

        for group in Group::ALL {
            for (key, array) in matrix.group(group).iter() {
                let source = &fixture.values[array.name()];

                for (index, value) in array.data().indexed_iter() {
                    let offset = match array.axes() {
                        [AxisName::Latitude] => index[0],
                        [AxisName::Latitude, AxisName::Longitude] => index[0] + index[1] * nlat,
                        [AxisName::Level, AxisName::Latitude] => index[1] + index[0] * nlat,
                        [AxisName::Level, AxisName::Latitude, AxisName::Level2] => {
                            index[1] + index[0] * nlat + index[2] * nlat * dims.levels()
                        }
                        other => panic!("unexpected axes {:?} of {}", other, key),
                    };

                    assert_eq!(*value, source[offset], "{}[{}] at {:?}", group, key, index);
                }
            }
        }
    }
}

#[test]
fn coordinates() {
    let (_, matrix) = decode(&dims(3, 5, 4));
    let coords = matrix.coordinates();

    assert_eq!(coords.latitudes().to_vec(), vec![-90.0, -45.0, 0.0, 45.0, 90.0]);
    assert_eq!(coords.longitudes().to_vec(), vec![0.0, 120.0, 240.0, 360.0]);
    assert_eq!(coords.levels().to_vec(), vec![1, 2, 3]);

    match matrix.amplitudes()["sst"].coords(AxisName::Longitude) {
        Some(AxisCoords::Degrees(lons)) => assert_eq!(lons.len(), 4),
        other => panic!("unexpected longitude coordinates: {:?}", other),
    }
}

#[test]
fn control_variables() {
    let (_, matrix) = decode(&dims(2, 3, 2));
    let variables = matrix.control_variables();

    assert_eq!(variables.len(), schema::CONTROL_VARIABLES.len());
    assert_eq!(variables[7].tag, "sst");
    assert!(variables.iter().all(|v| v.significance == fixture::SIGNIFICANCE));
}

#[test]
fn truncated_file() {
    let dims = dims(2, 3, 2);
    let fixture = fixture::encode(&dims);
    let truncated = &fixture.bytes[..fixture.bytes.len() / 2];

    let from_bytes = decode_bytes(truncated, &DecoderOptions::default());
    assert!(matches!(from_bytes, Err(DecodeError::UnexpectedEndOfFile { .. })));

    // without knowing the length upfront the decoder runs into the end
    let from_reader = decode_reader(Cursor::new(truncated), &DecoderOptions::default());
    assert!(matches!(from_reader, Err(DecodeError::UnexpectedEndOfFile { .. })));
}

#[test]
fn trailing_bytes() {
    let mut fixture = fixture::encode(&dims(2, 3, 2));
    fixture.bytes.extend_from_slice(&[0, 0, 0, 0]);

    let from_bytes = decode_bytes(&fixture.bytes, &DecoderOptions::default());
    assert!(matches!(from_bytes, Err(DecodeError::TrailingBytes { .. })));

    let from_reader = decode_reader(Cursor::new(&fixture.bytes), &DecoderOptions::default());
    assert!(matches!(from_reader, Err(DecodeError::TrailingBytes { .. })));
}

#[test]
fn zero_latitudes() {
    let fixture = fixture::encode_raw(2, 0, 2, &dims(2, 3, 2));
    let result = decode_bytes(&fixture.bytes, &DecoderOptions::default());

    assert!(matches!(
        result,
        Err(DecodeError::InvalidDimensions { latitudes: 0, .. })
    ));
}

#[test]
fn header_disagrees_with_content() {
    let fixture = fixture::encode_raw(3, 3, 2, &dims(2, 3, 2));
    let result = decode_reader(Cursor::new(&fixture.bytes), &DecoderOptions::default());

    assert!(result.is_err());
}

#[test]
fn balance_record_framing() {
    let grid = dims(2, 3, 2);
    let leading = schema::header_record_bytes();
    let trailing = leading + 4 + 96;

    let mut flipped = fixture::encode(&grid).bytes;
    flipped[leading + 3] ^= 0x01;

    assert!(matches!(
        decode_bytes(&flipped, &DecoderOptions::default()),
        Err(DecodeError::FrameMismatch {
            record: "agvin",
            leading: 97,
            trailing: 96,
            expected: 96,
            ..
        })
    ));

    let mut agreeing = fixture::encode(&grid).bytes;
    BigEndian::write_i32(&mut agreeing[leading..leading + 4], 92);
    BigEndian::write_i32(&mut agreeing[trailing..trailing + 4], 92);

    assert!(matches!(
        decode_bytes(&agreeing, &DecoderOptions::default()),
        Err(DecodeError::FrameMismatch {
            record: "agvin",
            leading: 92,
            trailing: 92,
            expected: 96,
            ..
        })
    ));

    let lenient = DecoderOptions {
        validate_frames: false,
        ..DecoderOptions::default()
    };
    assert!(decode_bytes(&agreeing, &lenient).is_ok());
}

#[test]
fn single_point_grid() {
    let (_, matrix) = decode(&dims(1, 1, 1));

    assert_eq!(matrix.coordinates().latitudes().to_vec(), vec![-90.0]);
    assert_eq!(matrix.balance_projections()["agvin"].shape(), &[1, 1, 1]);
}

#[test]
fn parallel_assembly_matches_sequential() {
    let fixture = fixture::encode(&dims(4, 6, 3));
    let options = DecoderOptions {
        parallel_assembly: true,
        ..DecoderOptions::default()
    };

    let sequential = decode_bytes(&fixture.bytes, &DecoderOptions::default()).unwrap();
    let parallel = decode_bytes(&fixture.bytes, &options).unwrap();

    for group in Group::ALL {
        let seq: Vec<_> = sequential.group(group).keys().collect();
        let par: Vec<_> = parallel.group(group).keys().collect();
        assert_eq!(seq, par);

        for key in seq {
            assert_eq!(
                sequential.get(group, key).unwrap().data(),
                parallel.get(group, key).unwrap().data()
            );
        }
    }
}

#[test]
fn decode_from_disk() {
    let dir = TempDir::new("gsiberror").unwrap();
    let path = dir.path().join("berror_stats.gcv");
    let fixture = fixture::encode(&dims(2, 3, 2));
    fs::write(&path, &fixture.bytes).unwrap();

    let matrix = decode_file(&path, &DecoderOptions::default()).unwrap();
    assert_eq!(*matrix.dimensions(), dims(2, 3, 2));

    fs::write(&path, &fixture.bytes[..60]).unwrap();
    let result = decode_file(&path, &DecoderOptions::default());
    assert!(matches!(
        result,
        Err(DecodeError::UnexpectedEndOfFile { field: "agvin", .. })
    ));
}

#[test]
fn range_across_files() {
    let (_, small) = decode(&dims(2, 3, 2));
    let (_, large) = decode(&dims(2, 4, 2));

    let (min_small, max_small) = small.amplitudes()["t"].min_max().unwrap();
    let (_, max_large) = large.amplitudes()["t"].min_max().unwrap();

    assert_eq!(
        global_min_max(&[small, large], Group::Amplitudes, "t"),
        Some((min_small, max_small.max(max_large)))
    );
    assert_eq!(global_min_max(&[], Group::Amplitudes, "t"), None);
}

#[test]
fn horizontal_scales_in_kilometres() {
    let (fixture, matrix) = decode(&dims(2, 3, 2));
    let km = matrix.horizontal_scales()["ps"].scaled(0.001);

    assert_eq!(km.get(&[1]), Some(fixture.values["hscalespin_ps"][1] * 0.001));
}
