use std::fmt;

use clap::{builder::PossibleValue, ArgMatches, ValueEnum};

/// LogLevel
///
/// Represents minimum level of messages that will be logged
///
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Error = 0,
    Warn,
    Info,
    Debug,
    Trace,
    None,
}

impl ValueEnum for LogLevel {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Error,
            Self::Warn,
            Self::Info,
            Self::Debug,
            Self::Trace,
            Self::None,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.as_str()))
    }
}

impl LogLevel {
    fn level(&self) -> usize {
        *self as usize
    }

    fn as_str(&self) -> &'static str {
        ["error", "warn", "info", "debug", "trace", "none"][self.level()]
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Verbosity as used by stderrlog (0 = errors only)
    pub fn get_level(&self) -> usize {
        if self.is_none() {
            0
        } else {
            self.level()
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Initialize logging from command line arguments
pub fn init_log(m: &ArgMatches) -> anyhow::Result<()> {
    let verbose = m
        .get_one::<LogLevel>("loglevel")
        .copied()
        .expect("Missing default log level");
    let ts = if m.get_flag("timestamp") {
        stderrlog::Timestamp::Second
    } else {
        stderrlog::Timestamp::Off
    };

    stderrlog::new()
        .quiet(verbose.is_none())
        .verbosity(verbose.get_level())
        .timestamp(ts)
        .init()?;
    Ok(())
}
