use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, command, value_parser};

use crate::log_utils::LogLevel;

fn io_args(cmd: Command, default_dir: &'static str, input_help: &'static str) -> Command {
    cmd.next_help_heading("Input/Output")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input-file")
                .alias("input_file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .help(input_help),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-directory")
                .alias("output_directory")
                .default_value(default_dir)
                .value_parser(value_parser!(PathBuf))
                .value_name("DIR")
                .help("Name of output directory"),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Path to output (default: current directory)"),
        )
        .arg(
            Arg::new("prefix")
                .short('s')
                .long("savename")
                .default_value("excavate")
                .value_parser(value_parser!(String))
                .value_name("PREFIX")
                .help("Prefix for output files"),
        )
        .next_help_heading("Operation")
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .default_value("60")
                .value_parser(value_parser!(f64))
                .value_name("PERCENT")
                .help("Probability threshold for modification calls (%)"),
        )
}

pub(super) fn cli_model() -> Command {
    let read_db = io_args(
        Command::new("read-db")
            .alias("readDB")
            .about("Summarise a Megalodon per read modified base calls file by position"),
        "excavate_out",
        "Megalodon per read modified base calls file",
    )
    .arg(
        Arg::new("no_gff")
            .short('g')
            .long("do-not-export-gff")
            .alias("do_not_export_gff")
            .action(ArgAction::SetTrue)
            .help("Do not write GFF file of significant modifications"),
    )
    .arg(
        Arg::new("summary_stats")
            .long("summary-stats")
            .action(ArgAction::SetTrue)
            .help("Write summary statistics of calls and probabilities per position"),
    )
    .arg(
        Arg::new("ignore_contig")
            .long("ignore-contig")
            .action(ArgAction::SetTrue)
            .help("Group calls by position only, merging contigs that share a coordinate"),
    );

    let export = io_args(
        Command::new("export").about("Write GFF file from a modification statistics table"),
        "out",
        "Modification statistics table from read-db",
    );

    command!()
        .subcommand_required(true)
        .arg(
            Arg::new("loglevel")
                .short('l')
                .long("loglevel")
                .global(true)
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .ignore_case(true)
                .default_value("info")
                .help("Set log level"),
        )
        .arg(
            Arg::new("timestamp")
                .long("timestamp")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Prepend timestamps to log messages"),
        )
        .subcommand(read_db)
        .subcommand(export)
}
