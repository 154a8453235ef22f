#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

mod accumulator;
mod call;
mod cli;
mod gff;
mod grouper;
mod log_utils;
mod process;
mod stat_funcs;
mod table;
mod tally;

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_cli()?;
    process::process_data(cfg)
}
