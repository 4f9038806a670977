use clap::Parser;
use log::{debug, warn, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;

mod args;
mod sorg;

fn main() {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
    debug!("arguments: {:?}", args);

    let res = sorg::run_check(&args);
    if let Err(e) = res {
        warn!("Error occurred {:?}", e);
        eprintln!("An error occurred {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
