#![forbid(unsafe_code)]

//! `curdata` binary entry point.

use std::io;
use std::process;

use curdata_cli::{cli, commands, logging};

fn main() {
    let opts = cli::Opts::parse();
    logging::init(&opts.log_filter, opts.log_json);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match commands::run(&opts, &mut out) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
