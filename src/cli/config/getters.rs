use std::path::{Path, PathBuf};

use super::{Config, Mode};

impl Config {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn export_gff(&self) -> bool {
        self.export_gff
    }

    pub fn summary_stats(&self) -> bool {
        self.summary_stats
    }

    pub fn ignore_contig(&self) -> bool {
        self.ignore_contig
    }

    /// Output file name: `<output_dir>/<prefix>_<suffix>`
    pub fn output_file(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{}", self.prefix(), suffix))
    }
}
