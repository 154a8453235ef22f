use std::{
    fmt,
    io::{BufRead, Write},
};

use crate::{
    call::{Channel, Strand},
    table::{check_header, ModStatRow},
};

const SOURCE: &str = "Megalodon";
const FEATURE_TYPE: &str = "mod";

/// A strand and channel specific modification call that passed the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct ModCall<'a> {
    pub seq_id: &'a str,
    pub position: u64,
    pub score: f64,
    pub strand: Strand,
    pub channel: Channel,
}

/// Modification calls from a table row with a score at or above threshold.
///
/// Combinations with no calls are ignored
pub fn row_features(row: &ModStatRow, threshold: f64) -> Vec<ModCall<'_>> {
    let mut v = Vec::new();
    for strand in [Strand::Plus, Strand::Minus] {
        let st = row.strand(strand);
        for (channel, ct) in [(Channel::H, &st.h), (Channel::M, &st.m)] {
            if let Some(score) = ct.score() {
                if score >= threshold {
                    v.push(ModCall {
                        seq_id: &row.contig,
                        position: row.position,
                        score,
                        strand,
                        channel,
                    })
                }
            }
        }
    }
    v
}

/// GFF3 line for a ModCall with an assigned feature number
pub struct Feature<'a, 'b> {
    pub id: usize,
    pub call: &'a ModCall<'b>,
}

impl<'a, 'b> fmt::Display for Feature<'a, 'b> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.call;
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{:?}\t{}\t.\tID=mod_{:04};Name={}",
            c.seq_id,
            SOURCE,
            FEATURE_TYPE,
            c.position,
            c.position,
            c.score,
            c.strand,
            self.id,
            c.channel
        )
    }
}

/// Writes GFF3 features numbering them sequentially from 1
pub struct GffWriter<W: Write> {
    wrt: W,
    next_id: usize,
}

impl<W: Write> GffWriter<W> {
    pub fn new(mut wrt: W) -> anyhow::Result<Self> {
        writeln!(wrt, "##gff-version 3")?;
        Ok(Self { wrt, next_id: 1 })
    }

    pub fn write_call(&mut self, call: &ModCall) -> anyhow::Result<()> {
        writeln!(
            self.wrt,
            "{}",
            Feature {
                id: self.next_id,
                call
            }
        )?;
        self.next_id += 1;
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.next_id - 1
    }

    pub fn into_inner(mut self) -> anyhow::Result<W> {
        self.wrt.flush()?;
        Ok(self.wrt)
    }
}

/// Read a modification statistics table and write features for all calls
/// passing the threshold.  Returns the number of features written
pub fn export_table<R: BufRead, W: Write>(
    mut rdr: R,
    wrt: W,
    threshold: f64,
) -> anyhow::Result<usize> {
    let mut gff = GffWriter::new(wrt)?;
    let mut buf = String::new();
    let mut line = 0;
    loop {
        buf.clear();
        if rdr.read_line(&mut buf)? == 0 {
            break;
        }
        line += 1;
        if line == 1 {
            check_header(&buf)?;
            continue;
        }
        if buf.trim().is_empty() {
            continue;
        }
        let row = ModStatRow::from_line(&buf, line)?;
        for call in row_features(&row, threshold) {
            gff.write_call(&call)?
        }
    }
    let n = gff.n_features();
    gff.into_inner()?;
    debug!("Read {} lines, wrote {} features", line, n);
    Ok(n)
}
