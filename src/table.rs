use std::fmt;

use crate::{
    call::Strand,
    tally::{ChannelTally, StrandTally},
};

pub const HEADER: [&str; 20] = [
    "position",
    "contig",
    "pos_strand_total",
    "pos_meth_h",
    "pos_na_h",
    "pos_con_h",
    "pos_prc_h",
    "pos_meth_m",
    "pos_na_m",
    "pos_con_m",
    "pos_prc_m",
    "neg_strand_total",
    "neg_meth_h",
    "neg_na_h",
    "neg_con_h",
    "neg_prc_h",
    "neg_meth_m",
    "neg_na_m",
    "neg_con_m",
    "neg_prc_m",
];

pub struct Header;

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HEADER.join("\t"))
    }
}

/// One row of the modification statistics table
#[derive(Debug, Clone, PartialEq)]
pub struct ModStatRow {
    pub position: u64,
    pub contig: Box<str>,
    pub strands: [StrandTally; 2],
}

impl ModStatRow {
    pub fn strand(&self, s: Strand) -> &StrandTally {
        &self.strands[s.idx()]
    }

    pub fn is_significant(&self, threshold: f64) -> bool {
        self.strands.iter().any(|t| t.is_significant(threshold))
    }

    /// Parse a (non header) line from a table written by `Display`
    pub fn from_line(line: &str, line_no: usize) -> anyhow::Result<Self> {
        let fields: Vec<_> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if fields.len() != HEADER.len() {
            return Err(anyhow!(
                "Wrong number of fields at line {} (seen {}, expected {})",
                line_no,
                fields.len(),
                HEADER.len()
            ));
        }

        let count = |ix: usize| {
            fields[ix].parse::<usize>().map_err(|e| {
                anyhow!(
                    "Could not parse {} from column {} at line {}: {}",
                    HEADER[ix],
                    ix + 1,
                    line_no,
                    e
                )
            })
        };
        let pct = |ix: usize| {
            fields[ix].parse::<f64>().map_err(|e| {
                anyhow!(
                    "Could not parse {} from column {} at line {}: {}",
                    HEADER[ix],
                    ix + 1,
                    line_no,
                    e
                )
            })
        };
        let channel = |ix: usize| -> anyhow::Result<ChannelTally> {
            Ok(ChannelTally {
                modified: count(ix)?,
                ambiguous: count(ix + 1)?,
                canonical: count(ix + 2)?,
                pct: pct(ix + 3)?,
            })
        };
        let strand = |ix: usize| -> anyhow::Result<StrandTally> {
            let total = count(ix)?;
            let t = StrandTally {
                h: channel(ix + 1)?,
                m: channel(ix + 5)?,
            };
            if t.h.total() != total || t.m.total() != total {
                return Err(anyhow!(
                    "{} ({}) does not match call counts ({} 5hmC, {} 5mC) at line {}",
                    HEADER[ix],
                    total,
                    t.h.total(),
                    t.m.total(),
                    line_no
                ));
            }
            Ok(t)
        };

        let position = fields[0].parse::<u64>().map_err(|e| {
            anyhow!(
                "Could not parse position from column 1 at line {}: {}",
                line_no,
                e
            )
        })?;

        Ok(Self {
            position,
            contig: Box::from(fields[1]),
            strands: [strand(2)?, strand(11)?],
        })
    }
}

impl fmt::Display for ModStatRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.position, self.contig, self.strands[0], self.strands[1]
        )
    }
}

/// Check that the first line of a table matches `HEADER`
pub fn check_header(line: &str) -> anyhow::Result<()> {
    let fields: Vec<_> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
    if fields[..] == HEADER[..] {
        Ok(())
    } else {
        Err(anyhow!(
            "Unexpected header line (expected columns: {})",
            HEADER.join(" ")
        ))
    }
}
