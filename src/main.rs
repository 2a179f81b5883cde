extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate regex;
extern crate term_grid;
extern crate thiserror;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tPrint: {}\n\tOutfile: {}\n\tInfile: {}",
        level_for(args.occurrences_of("verbose")),
        args.is_present("print"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap()
    );

    let ifile = args.value_of("INPUT").unwrap();
    let ipath = Path::new(ifile);

    let ifile = match File::open(&ipath) {
        Err(err) => {
            error!("fatal: unable to open input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    let lines = match assembler::lexer::read_lines(Box::new(ifile)) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(lines) => lines,
    };

    let listing = match assembler::Encoder::new(lines).run() {
        Err(err) => {
            error!("fatal: {}: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(listing) => listing,
    };

    if args.is_present("print-debug") {
        let mut grid = Grid::new(GridOptions {
            filling:     Filling::Spaces(1),
            direction:   Direction::LeftToRight,
        });

        for emission in listing.iter() {
            grid.add(Cell::from(format!("0x{:04X}:", emission.address)));
            grid.add(Cell::from(emission.source.trim().to_string()));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(emission.hex()));
        }

        println!("{}", grid.fit_into_columns(4));
    }

    let image = assembler::output::hex_words(&listing.bytes());

    if args.is_present("print") {
        println!("{}", image);
    }

    let opath = match args.value_of("output") {
        Some(filename) => Path::new(filename),
        None => match ipath.file_stem() {
            Some(stem) => Path::new(stem),
            None => {
                error!("fatal: cannot derive an output name from `{}`", ipath.display());
                std::process::exit(1);
            },
        },
    };

    let mut ofile = match File::create(&opath) {
        Err(err) => {
            error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    if let Err(err) = ofile.write_all(image.as_bytes()) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }

    info!("wrote {} byte(s) to `{}`", listing.len(), opath.display());
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap())
        .version(option_env!("CARGO_PKG_VERSION").unwrap())
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap())
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap())
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile"))
        .arg(Arg::with_name("print")
            .short("p")
            .long("print")
            .takes_value(false)
            .help("also prints the hex words image to STDOUT"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints each line's address and bytes alongside the source to STDOUT"))
        .get_matches()
}

fn level_for(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 | _ => log::LevelFilter::Debug,
    }
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level_for(verbosity))
        .chain(std::io::stdout())
        .apply().ok();
}
