use std::path::PathBuf;

mod getters;
mod mk_config;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Summarise per read calls into modification tables (and GFF)
    ReadDb,
    /// GFF from an existing modification table
    Export,
}

#[derive(Debug)]
pub struct Config {
    mode: Mode,
    input: PathBuf,
    output_dir: PathBuf,
    prefix: Box<str>,
    threshold: f64,
    export_gff: bool,
    summary_stats: bool,
    ignore_contig: bool,
}
