extern crate clap;
extern crate jackc_driver;

use clap::{ArgAction, Parser};
use jackc_driver::batch::{self, BatchOpts, OutputMode};
use jackc_err::err::JackErr;
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;
use std::{io, path::PathBuf, process};

#[derive(Debug, Parser)]
#[clap(name = "jackc", version, about = "Compiles Jack classes to stack VM code")]
pub struct JackcOpts {
    /// A .jack file, or a directory whose .jack files are all compiled
    path: PathBuf,

    /// Write the token listing (<Name>T.xml) instead of VM code
    #[clap(short, long)]
    tokens: bool,

    /// Print output to stdout instead of writing files
    #[clap(short, long)]
    print: bool,

    /// Log more: -v for debug, -vv for trace. RUST_LOG overrides this
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let opts = JackcOpts::parse();
    init_logger(opts.verbose);

    let batch_opts = BatchOpts {
        mode: if opts.tokens {
            OutputMode::Tokens
        } else {
            OutputMode::Vm
        },
        print: opts.print,
    };

    let stdout = io::stdout();
    let code = match batch::run(&opts.path, &batch_opts, &mut stdout.lock()) {
        Ok(report) => {
            debug!(
                "jackc: {} compiled, {} failed",
                report.done.len(),
                report.failed.len()
            );
            report.exit_code()
        }
        Err(e) => {
            e.emit();
            2
        }
    };

    process::exit(code);
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if let Err(e) = SimpleLogger::new().with_level(level).env().init() {
        eprintln!("jackc: could not start logger: {}", e);
    }
}
