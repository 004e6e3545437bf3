use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, Command};

use fmpart::{parser, writer, Partitioner, Side};

#[derive(Clone, Debug)]
struct Config {
    input_file: PathBuf,
    output_file: PathBuf,
    report: bool,
}

impl Config {
    fn from_args(matches: &clap::ArgMatches) -> Self {
        Config {
            input_file: PathBuf::from(matches.value_of_os("INPUT").unwrap()),
            output_file: PathBuf::from(matches.value_of_os("OUTPUT").unwrap()),
            report: matches.is_present("REPORT"),
        }
    }
}

fn print_summary(part: &Partitioner) {
    let h = part.hypergraph();
    println!();
    println!("==================== Summary ====================");
    println!("Cutsize: {}", part.final_cut_size());
    println!("Total cell number: {}", h.num_cells());
    println!("Total net number:  {}", h.num_nets());
    println!("Cell Number of partition A: {}", part.side_size(Side::A));
    println!("Cell Number of partition B: {}", part.side_size(Side::B));
    println!("=================================================");
    println!();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("fmpart")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fiduccia-Mattheyses two-way netlist partitioner")
        .arg(
            Arg::new("INPUT")
                .help("Input netlist: a balance factor followed by NET lines")
                .index(1)
                .allow_invalid_utf8(true)
                .required(true),
        )
        .arg(
            Arg::new("OUTPUT")
                .help("Output file for the partition result")
                .index(2)
                .allow_invalid_utf8(true)
                .required(true),
        )
        .arg(
            Arg::new("REPORT")
                .long("report")
                .help("List nets and cells on stdout before partitioning"),
        )
        .get_matches();
    let config = Config::from_args(&matches);

    let text = fs::read_to_string(&config.input_file)
        .with_context(|| anyhow!("open input file {:?}", config.input_file))?;
    let (h, r) = parser::parse_netlist(&text)
        .with_context(|| anyhow!("parse input file {:?}", config.input_file))?;

    if config.report {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        writer::report_nets(&mut lock, &h)?;
        writer::report_cells(&mut lock, &h)?;
        lock.flush()?;
    }

    let mut part = Partitioner::build(h, r);
    part.partition()
        .with_context(|| anyhow!("partition {:?}", config.input_file))?;

    print_summary(&part);

    let mut outf = fs::File::create(&config.output_file)
        .with_context(|| anyhow!("create output file {:?}", config.output_file))?;
    writer::write_result(&mut outf, &part)
        .with_context(|| anyhow!("write result to {:?}", config.output_file))?;

    Ok(())
}
