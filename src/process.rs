use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;

use crate::{
    call::{parse_line, Channel, ParsedLine, Strand},
    cli::{Config, Mode},
    gff::export_table,
    grouper::{flush, FlushedPosition, Grouper},
    table::Header,
};

const FULL_SUFFIX: &str = "mod_stat_full.tsv";
const SIG_SUFFIX: &str = "mod_stat_sig.tsv";
const GFF_SUFFIX: &str = "significant_mods.gff";
const SUMMARY_SUFFIX: &str = "mod_summary_stats.tsv";

#[derive(Clone, Copy)]
enum ListKind {
    Call,
    ModProb,
    CanProb,
}

// Lists reported in the summary statistics table
const SUMMARY_LISTS: [(Strand, Channel, ListKind, &str); 10] = [
    (Strand::Plus, Channel::H, ListKind::Call, "pos_h_call"),
    (Strand::Plus, Channel::H, ListKind::ModProb, "pos_h_mod"),
    (Strand::Plus, Channel::M, ListKind::Call, "pos_m_call"),
    (Strand::Plus, Channel::M, ListKind::ModProb, "pos_m_mod"),
    (Strand::Plus, Channel::M, ListKind::CanProb, "pos_m_can"),
    (Strand::Minus, Channel::H, ListKind::Call, "neg_h_call"),
    (Strand::Minus, Channel::H, ListKind::ModProb, "neg_h_mod"),
    (Strand::Minus, Channel::M, ListKind::Call, "neg_m_call"),
    (Strand::Minus, Channel::M, ListKind::ModProb, "neg_m_mod"),
    (Strand::Minus, Channel::M, ListKind::CanProb, "neg_m_can"),
];

fn summary_header() -> String {
    let cols: Vec<String> = SUMMARY_LISTS
        .iter()
        .flat_map(|(_, _, _, name)| {
            ["n", "mean", "median", "sd", "min", "max"]
                .iter()
                .map(move |stat| format!("{}_{}", name, stat))
        })
        .collect();
    format!("position\tcontig\t{}", cols.join("\t"))
}

/// Output tables for read-db
pub struct ModTables<W: Write> {
    full: W,
    sig: W,
    summary: Option<W>,
}

impl<W: Write> ModTables<W> {
    pub fn new(mut full: W, mut sig: W, mut summary: Option<W>) -> anyhow::Result<Self> {
        writeln!(full, "{}", Header)?;
        writeln!(sig, "{}", Header)?;
        if let Some(w) = summary.as_mut() {
            writeln!(w, "{}", summary_header())?
        }
        Ok(Self { full, sig, summary })
    }

    fn write(&mut self, fp: &FlushedPosition) -> anyhow::Result<()> {
        writeln!(self.full, "{}", fp.row)?;
        if fp.significant {
            debug!("Significant: {}", fp.row);
            writeln!(self.sig, "{}", fp.row)?;
        }
        if let Some(w) = self.summary.as_mut() {
            write!(w, "{}\t{}", fp.row.position, fp.row.contig)?;
            for (strand, channel, kind, _) in SUMMARY_LISTS.iter() {
                let s = fp.stats.get(*channel, *strand);
                let sm = match kind {
                    ListKind::Call => s.calls,
                    ListKind::ModProb => s.mod_probs,
                    ListKind::CanProb => s.can_probs.unwrap_or_default(),
                };
                write!(w, "\t{}", sm)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.full.flush()?;
        self.sig.flush()?;
        if let Some(w) = self.summary.as_mut() {
            w.flush()?
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadCounts {
    pub records: usize,
    pub skipped: usize,
    pub positions: usize,
    pub significant: usize,
}

/// Stream per read calls (header line first) from rdr, writing one row per position
pub fn read_calls<R: BufRead, W: Write>(
    mut rdr: R,
    tables: &mut ModTables<W>,
    threshold: f64,
    ignore_contig: bool,
) -> anyhow::Result<ReadCounts> {
    let mut grouper = Grouper::new(threshold, ignore_contig);
    let mut counts = ReadCounts::default();
    let mut buf = String::new();
    let mut line = 0;

    let mut output = |fp: FlushedPosition, counts: &mut ReadCounts| -> anyhow::Result<()> {
        counts.positions += 1;
        if fp.significant {
            counts.significant += 1;
        }
        tables.write(&fp)
    };

    loop {
        buf.clear();
        if rdr.read_line(&mut buf)? == 0 {
            break;
        }
        line += 1;
        // Skip header
        if line == 1 {
            continue;
        }
        match parse_line(&buf, line)? {
            ParsedLine::Record(rec) => {
                counts.records += 1;
                for acc in grouper.push(&rec) {
                    output(flush(acc, threshold)?, &mut counts)?
                }
            }
            ParsedLine::Skip(reason) => {
                warn!("Skipping line {}: {}", line, reason);
                counts.skipped += 1;
            }
            ParsedLine::Blank => (),
        }
    }
    for acc in grouper.finish() {
        output(flush(acc, threshold)?, &mut counts)?
    }
    Ok(counts)
}

fn open_input(path: &Path) -> anyhow::Result<impl BufRead> {
    let rdr = CompressIo::new()
        .path(path)
        .bufreader()
        .with_context(|| format!("Could not open input file {}", path.display()))?;
    debug!("Opened {} for input", path.display());
    Ok(rdr)
}

fn open_output(path: &Path) -> anyhow::Result<impl Write> {
    let wrt = CompressIo::new()
        .path(path)
        .bufwriter()
        .with_context(|| format!("Could not open output file {}", path.display()))?;
    debug!("Opened {} for output", path.display());
    Ok(wrt)
}

/// Returns the path of the significant table
fn read_db(cfg: &Config) -> anyhow::Result<PathBuf> {
    let rdr = open_input(cfg.input())?;

    let sig_path = cfg.output_file(SIG_SUFFIX);
    let summary = if cfg.summary_stats() {
        Some(open_output(&cfg.output_file(SUMMARY_SUFFIX))?)
    } else {
        None
    };
    let mut tables = ModTables::new(
        open_output(&cfg.output_file(FULL_SUFFIX))?,
        open_output(&sig_path)?,
        summary,
    )?;

    let counts = read_calls(rdr, &mut tables, cfg.threshold(), cfg.ignore_contig())
        .with_context(|| format!("Error processing {}", cfg.input().display()))?;
    tables.finish()?;

    info!(
        "Records read: {}, skipped: {}, positions: {}, significant positions: {}",
        counts.records, counts.skipped, counts.positions, counts.significant
    );
    Ok(sig_path)
}

fn export(cfg: &Config, input: &Path) -> anyhow::Result<()> {
    let rdr = open_input(input)?;
    let wrt = open_output(&cfg.output_file(GFF_SUFFIX))?;
    let n = export_table(rdr, wrt, cfg.threshold())
        .with_context(|| format!("Error exporting features from {}", input.display()))?;
    info!("Features written: {}", n);
    Ok(())
}

pub fn process_data(cfg: Config) -> anyhow::Result<()> {
    let dir = cfg.output_dir();
    fs::create_dir_all(dir)
        .with_context(|| format!("Could not create output directory {}", dir.display()))?;

    match cfg.mode() {
        Mode::ReadDb => {
            let sig_path = read_db(&cfg)?;
            if cfg.export_gff() {
                info!("Creating gff file");
                export(&cfg, &sig_path)?
            }
        }
        Mode::Export => export(&cfg, cfg.input())?,
    }
    info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_args;

    const CALLS: &str = "read_id\tchrm\tstrand\tpos\tmod_log_prob\tcan_log_prob\tmod_base
r1\tctg1\t+\t1000\t-0.10536051565782628\t-2.3025850929940455\th
r1\tctg1\t+\t1000\t-2.3025850929940455\t-0.10536051565782628\tm
r2\tctg1\t-\t1000\t-0.6931471805599453\t-0.6931471805599453\th
r2\tctg1\t-\t1000\t-0.916290731874155\t-0.6931471805599453\tm
r3\tctg1\t?\t1002\t-0.1\t-2.3\th
r3\tctg1\t+\t1002\t-3.0\t-0.05\th
r3\tctg1\t+\t1002\t-3.0\t-0.05\tm
r4\tctg2\t-\t1002\t-0.05\t-3.0\tm
r4\tctg2\t-\t1002\t-3.0\t-3.0\th
";

    fn run_tables(input: &str, threshold: f64, ignore_contig: bool) -> (ReadCounts, String, String, String) {
        let mut tables = ModTables::new(Vec::new(), Vec::new(), Some(Vec::new())).unwrap();
        let counts = read_calls(input.as_bytes(), &mut tables, threshold, ignore_contig).unwrap();
        let s = |v: Vec<u8>| String::from_utf8(v).unwrap();
        (counts, s(tables.full), s(tables.sig), s(tables.summary.unwrap()))
    }

    #[test]
    fn tables() {
        let (counts, full, sig, summary) = run_tables(CALLS, 60.0, false);
        assert_eq!(
            counts,
            ReadCounts {
                records: 8,
                skipped: 1,
                positions: 3,
                significant: 2
            }
        );
        let full: Vec<_> = full.lines().collect();
        assert_eq!(full.len(), 4);
        assert_eq!(full[0], Header.to_string());
        assert_eq!(
            full[1],
            "1000\tctg1\t1\t1\t0\t0\t100.00\t0\t0\t1\t0.00\t1\t0\t1\t0\t0.00\t0\t1\t0\t0.00"
        );
        assert_eq!(
            full[2],
            "1002\tctg1\t1\t0\t0\t1\t0.00\t0\t0\t1\t0.00\t0\t0\t0\t0\t0.00\t0\t0\t0\t0.00"
        );
        assert!(full[3].starts_with("1002\tctg2\t0\t"));

        let sig: Vec<_> = sig.lines().collect();
        assert_eq!(sig.len(), 3);
        assert_eq!(sig[1], full[1]);
        assert_eq!(sig[2], full[3]);

        let summary: Vec<_> = summary.lines().collect();
        assert_eq!(summary[0], summary_header());
        assert_eq!(summary[0].split('\t').count(), 62);
        assert!(summary[1].starts_with(
            "1000\tctg1\t1\t1.0000\t1.0000\t0.0000\t1.0000\t1.0000\t1\t90.0000\t90.0000\t0.0000\t90.0000\t90.0000\t1\t-1.0000"
        ));
        // Empty lists
        assert!(summary[3].starts_with("1002\tctg2\t0\tNA\tNA\tNA\tNA\tNA\t"));
    }

    #[test]
    fn position_only_grouping() {
        let (counts, full, _, _) = run_tables(CALLS, 60.0, true);
        assert_eq!(counts.positions, 2);
        let full: Vec<_> = full.lines().collect();
        assert_eq!(
            full[2],
            "1002\tctg1\t1\t0\t0\t1\t0.00\t0\t0\t1\t0.00\t1\t0\t1\t0\t0.00\t1\t0\t0\t100.00"
        );
    }

    #[test]
    fn interleaved_contigs() {
        let input = "header
r1\tctg1\t+\t10\t-0.05\t-3.0\th
r2\tctg2\t+\t10\t-0.05\t-3.0\th
r1\tctg1\t+\t10\t-3.0\t-0.05\tm
r2\tctg2\t+\t10\t-3.0\t-0.05\tm
";
        let (counts, full, _, _) = run_tables(input, 60.0, false);
        assert_eq!(
            counts,
            ReadCounts {
                records: 4,
                skipped: 0,
                positions: 2,
                significant: 2
            }
        );
        let full: Vec<_> = full.lines().skip(1).collect();
        assert_eq!(
            full,
            [
                "10\tctg1\t1\t1\t0\t0\t100.00\t0\t0\t1\t0.00\t0\t0\t0\t0\t0.00\t0\t0\t0\t0.00",
                "10\tctg2\t1\t1\t0\t0\t100.00\t0\t0\t1\t0.00\t0\t0\t0\t0\t0.00\t0\t0\t0\t0.00",
            ]
        );
    }

    #[test]
    fn empty_input() {
        let (counts, full, sig, _) = run_tables("read_id\tchrm\n", 60.0, false);
        assert_eq!(counts, ReadCounts::default());
        assert_eq!(full.lines().count(), 1);
        assert_eq!(sig.lines().count(), 1);
    }

    #[test]
    fn mismatched_channels_abort() {
        let input = "header\nr1\tctg1\t+\t10\t-0.1\t-2.3\th\nr2\tctg1\t+\t11\t-0.1\t-2.3\th\n";
        let mut tables = ModTables::new(Vec::new(), Vec::new(), None).unwrap();
        assert!(read_calls(input.as_bytes(), &mut tables, 60.0, false).is_err());
    }

    #[test]
    fn read_db_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("calls.txt");
        fs::write(&input, CALLS).unwrap();
        let base = dir.path().to_str().unwrap();

        let cfg = parse_args(&[
            "excavate", "readDB", "-i", input.to_str().unwrap(), "-p", base, "-s", "test",
        ])
        .unwrap();
        process_data(cfg).unwrap();

        let out = dir.path().join("excavate_out");
        let gff = fs::read_to_string(out.join("test_significant_mods.gff")).unwrap();
        let lines: Vec<_> = gff.lines().collect();
        assert_eq!(
            lines,
            [
                "##gff-version 3",
                "ctg1\tMegalodon\tmod\t1000\t1000\t100.0\t+\t.\tID=mod_0001;Name=h",
                "ctg2\tMegalodon\tmod\t1002\t1002\t100.0\t-\t.\tID=mod_0002;Name=m",
            ]
        );
        assert!(out.join("test_mod_stat_full.tsv").is_file());
        assert!(!out.join("test_mod_summary_stats.tsv").exists());

        // Exporting the significant table again gives the same features
        let cfg = parse_args(&[
            "excavate",
            "export",
            "-i",
            out.join("test_mod_stat_sig.tsv").to_str().unwrap(),
            "-p",
            base,
            "-o",
            "export",
            "-s",
            "test",
        ])
        .unwrap();
        process_data(cfg).unwrap();
        let gff2 = fs::read_to_string(dir.path().join("export/test_significant_mods.gff")).unwrap();
        assert_eq!(gff, gff2);
    }

    #[test]
    fn missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = parse_args(&[
            "excavate",
            "read-db",
            "-i",
            dir.path().join("nope.txt").to_str().unwrap(),
            "-p",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let e = process_data(cfg).unwrap_err();
        assert!(e.to_string().starts_with("Could not open input file"));
    }
}
