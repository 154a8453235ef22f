use crate::{
    accumulator::{PositionAccumulator, PositionStats},
    call::{CallRecord, Channel, Strand},
    table::ModStatRow,
    tally::StrandTally,
};

/// Groups a stream of call records sorted by position into per position accumulators.
///
/// All accumulators for the current position stay open, one per contig, so
/// contigs interleaved at the same coordinate are kept apart. They are handed
/// back in first seen order when a record for a different position arrives
pub struct Grouper {
    position: Option<u64>,
    open: Vec<PositionAccumulator>,
    threshold: f64,
    ignore_contig: bool,
    unsorted_warned: bool,
}

impl Grouper {
    pub fn new(threshold: f64, ignore_contig: bool) -> Self {
        Self {
            position: None,
            open: Vec::new(),
            threshold,
            ignore_contig,
            unsorted_warned: false,
        }
    }

    fn check_order(&mut self, rec: &CallRecord, pos: u64) {
        if !self.unsorted_warned
            && rec.position < pos
            && self.open.iter().any(|a| a.contig() == &*rec.contig)
        {
            warn!(
                "Input not sorted by position (read {} at {}:{} follows {}:{}); aggregation will be incorrect",
                rec.read_id, rec.contig, rec.position, rec.contig, pos
            );
            self.unsorted_warned = true;
        }
    }

    /// Add a record, returning the groups of the previous position if it is now complete
    pub fn push(&mut self, rec: &CallRecord) -> Vec<PositionAccumulator> {
        let done = match self.position {
            Some(pos) if pos == rec.position => Vec::new(),
            Some(pos) => {
                self.check_order(rec, pos);
                std::mem::take(&mut self.open)
            }
            None => Vec::new(),
        };
        self.position = Some(rec.position);

        let ix = if self.ignore_contig {
            (!self.open.is_empty()).then_some(0)
        } else {
            self.open.iter().position(|a| a.contig() == &*rec.contig)
        };
        let i = ix.unwrap_or_else(|| {
            self.open
                .push(PositionAccumulator::new(&rec.contig, rec.position));
            self.open.len() - 1
        });
        self.open[i].record_call(rec, self.threshold);
        done
    }

    /// End of input: return the groups of the last position (if any)
    pub fn finish(self) -> Vec<PositionAccumulator> {
        self.open
    }
}

pub struct FlushedPosition {
    pub row: ModStatRow,
    pub stats: PositionStats,
    pub significant: bool,
}

/// Summarize a completed position, consuming it.
/// Fails if the h and m call counts differ on either strand
pub fn flush(acc: PositionAccumulator, threshold: f64) -> anyhow::Result<FlushedPosition> {
    let stats = acc.finalize();
    let tally = |s: Strand| {
        StrandTally::from_calls(
            acc.channel_calls(Channel::H, s).calls(),
            acc.channel_calls(Channel::M, s).calls(),
        )
        .map_err(|e| {
            anyhow!(
                "{}:{} strand {}: {}",
                acc.contig(),
                acc.position(),
                s,
                e
            )
        })
    };
    let row = ModStatRow {
        position: acc.position(),
        contig: Box::from(acc.contig()),
        strands: [tally(Strand::Plus)?, tally(Strand::Minus)?],
    };
    let significant = row.is_significant(threshold);
    Ok(FlushedPosition {
        row,
        stats,
        significant,
    })
}
