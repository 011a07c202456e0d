use std::path::PathBuf;

use anyhow::Result;
use clap::{value_t, App, Arg};

use charge_light_assoc::assoc_tools::{AssocParams, DEFAULT_BLOCK_SIZE, DEFAULT_TS_WINDOW};
use charge_light_assoc::output::OutputStrategy;
use charge_light_assoc::run::{run, RunParams};

const ABOUT: &str = "Takes a light event file and a charge event file and generates a list of \
associations between the external triggers in the charge file and the events in the light \
file. The source datasets are linked into the output file, or copied with --copy.";

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ts_window_default = DEFAULT_TS_WINDOW.to_string();
    let block_size_default = DEFAULT_BLOCK_SIZE.to_string();
    let matches = App::new("charge-light-assoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about(ABOUT)
        .arg(
            Arg::with_name("light_event_filename")
                .short("l")
                .long("light_event_filename")
                .takes_value(true)
                .required(true)
                .help("Light event file (.npz)"),
        )
        .arg(
            Arg::with_name("charge_event_filename")
                .short("c")
                .long("charge_event_filename")
                .takes_value(true)
                .required(true)
                .help("Charge event file (.npz)"),
        )
        .arg(
            Arg::with_name("output_filename")
                .short("o")
                .long("output_filename")
                .takes_value(true)
                .required(true)
                .help("Output file, must not exist"),
        )
        .arg(
            Arg::with_name("copy")
                .long("copy")
                .help("Copy data from source files rather than just creating links"),
        )
        .arg(
            Arg::with_name("ts_window")
                .long("ts_window")
                .takes_value(true)
                .default_value(&ts_window_default)
                .help("Time window for association in larpix ticks [0.1us]"),
        )
        .arg(
            Arg::with_name("block_size")
                .long("block_size")
                .takes_value(true)
                .default_value(&block_size_default)
                .help("Light events matched per block, trades memory for speed"),
        )
        .get_matches();

    let params = RunParams {
        light_event_filename: PathBuf::from(matches.value_of("light_event_filename").unwrap_or_default()),
        charge_event_filename: PathBuf::from(matches.value_of("charge_event_filename").unwrap_or_default()),
        output_filename: PathBuf::from(matches.value_of("output_filename").unwrap_or_default()),
        strategy: if matches.is_present("copy") {
            OutputStrategy::Copy
        } else {
            OutputStrategy::Link
        },
        assoc: AssocParams {
            ts_window: value_t!(matches, "ts_window", i64).unwrap_or_else(|e| e.exit()),
            block_size: value_t!(matches, "block_size", usize).unwrap_or_else(|e| e.exit()),
        },
    };

    let summary = run(&params)?;
    println!("matched {} events", summary.n_matches);
    Ok(())
}
