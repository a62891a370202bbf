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

//! `gsiberror` program decoding GSI background error covariance
//! files listed in `config.yaml` and summarizing their content.
//!
//! Path of the configuration file can be given as the first argument,
//! otherwise `config.yaml` in the working directory is used.

mod driver;

use env_logger::Env;
use log::{error, info};

/// The main program function.
/// Prepares the runtime environment and calls the [`driver::main`].
///
/// To provide meaningful and high-quality error messages the `env_logger`
/// needs to be initiated before any log messages are possible to occur.
fn main() {
    #[cfg(not(feature = "debug"))]
    let logger_env = Env::new().filter_or("GSIBERROR_LOG_LEVEL", "info");

    #[cfg(feature = "debug")]
    let logger_env = Env::new().filter_or("GSIBERROR_LOG_LEVEL", "debug");

    env_logger::Builder::from_env(logger_env)
        .format_timestamp_millis()
        .init();

    match driver::main() {
        Ok(_) => info!("Decoding finished. Check the log and the summary file."),
        Err(err) => {
            error!("Decoding failed with error: {}", err);
            std::process::exit(1);
        }
    }
}
