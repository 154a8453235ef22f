use std::path::PathBuf;

use clap::ArgMatches;

use super::{Config, Mode};

impl Config {
    pub fn from_matches(m: &ArgMatches) -> anyhow::Result<Self> {
        let (mode, m) = match m.subcommand() {
            Some(("read-db", sm)) => (Mode::ReadDb, sm),
            Some(("export", sm)) => (Mode::Export, sm),
            _ => return Err(anyhow!("No subcommand given")),
        };

        let threshold = *m.try_get_one::<f64>("threshold")?.unwrap();
        if !(0.0..=100.0).contains(&threshold) {
            return Err(anyhow!(
                "Threshold must be a percentage between 0 and 100 (found {})",
                threshold
            ));
        }

        let input = m
            .get_one::<PathBuf>("input")
            .expect("Missing input") // Should be enforced by clap
            .to_owned();

        let base = match m.get_one::<PathBuf>("path") {
            Some(p) => p.to_owned(),
            None => std::env::current_dir()?,
        };
        let output_dir = base.join(
            m.get_one::<PathBuf>("output_dir")
                .expect("Missing default output directory"),
        );

        let prefix = m
            .get_one::<String>("prefix")
            .map(|s| Box::from(s.as_str()))
            .unwrap();

        // Options only present for read-db
        let flag = |s: &str| mode == Mode::ReadDb && m.get_flag(s);
        let export_gff = !flag("no_gff");
        let summary_stats = flag("summary_stats");
        let ignore_contig = flag("ignore_contig");

        debug!(
            "Mode: {:?}, input: {}, output directory: {}, threshold: {}",
            mode,
            input.display(),
            output_dir.display(),
            threshold
        );

        Ok(Config {
            mode,
            input,
            output_dir,
            prefix,
            threshold,
            export_gff,
            summary_stats,
            ignore_contig,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::cli::parse_args as cfg;

    #[test]
    fn read_db_config() {
        let c = cfg(&[
            "excavate", "read-db", "-i", "calls.txt", "-p", "/tmp/x", "-s", "sample", "-t", "75",
            "-g", "--summary-stats",
        ])
        .unwrap();
        assert_eq!(c.mode(), Mode::ReadDb);
        assert_eq!(c.input(), Path::new("calls.txt"));
        assert_eq!(c.output_dir(), Path::new("/tmp/x/excavate_out"));
        assert_eq!(
            c.output_file("mod_stat_full.tsv"),
            Path::new("/tmp/x/excavate_out/sample_mod_stat_full.tsv")
        );
        assert_eq!(c.threshold(), 75.0);
        assert!(!c.export_gff());
        assert!(c.summary_stats());
        assert!(!c.ignore_contig());
    }

    #[test]
    fn export_config() {
        let c = cfg(&["excavate", "export", "-i", "sig.tsv", "-p", "/tmp/y"]).unwrap();
        assert_eq!(c.mode(), Mode::Export);
        assert_eq!(c.output_dir(), Path::new("/tmp/y/out"));
        assert_eq!(c.prefix(), "excavate");
        assert!(c.export_gff());
    }

    #[test]
    fn bad_threshold() {
        assert!(cfg(&["excavate", "export", "-i", "sig.tsv", "-t", "120"]).is_err());
    }
}
