mod cli_model;
mod config;

pub use config::{Config, Mode};

use crate::log_utils::init_log;

pub fn handle_cli() -> anyhow::Result<Config> {
    let m = cli_model::cli_model().get_matches();
    init_log(&m)?;
    info!(
        "Running command: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );
    Config::from_matches(&m)
}

#[cfg(test)]
pub(crate) fn parse_args(args: &[&str]) -> anyhow::Result<Config> {
    let m = cli_model::cli_model().try_get_matches_from(args)?;
    Config::from_matches(&m)
}
