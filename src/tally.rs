use std::fmt;

use crate::call::Call;

/// Counts of calls for one channel on one strand
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ChannelTally {
    pub modified: usize,
    pub ambiguous: usize,
    pub canonical: usize,
    pub pct: f64,
}

impl ChannelTally {
    pub fn from_calls(calls: &[Call]) -> Self {
        let mut t = Self::default();
        for c in calls {
            match c {
                Call::Modified => t.modified += 1,
                Call::Ambiguous => t.ambiguous += 1,
                Call::Canonical => t.canonical += 1,
            }
        }
        t
    }

    pub fn total(&self) -> usize {
        self.modified + self.ambiguous + self.canonical
    }

    /// Percentage of modified calls, not rounded
    pub fn score(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.modified as f64 / n as f64 * 100.0),
        }
    }
}

impl fmt::Display for ChannelTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{:.2}",
            self.modified, self.ambiguous, self.canonical, self.pct
        )
    }
}

/// Tallies for both channels on one strand.  The h and m totals are always equal
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StrandTally {
    pub h: ChannelTally,
    pub m: ChannelTally,
}

/// Round to 2 decimal places, ties to even on the exact binary value
fn round2(x: f64) -> f64 {
    format!("{:.2}", x).parse().unwrap_or(x)
}

impl StrandTally {
    /// Tally h and m calls from the same strand at the same position.
    ///
    /// Both channels come from the same reads, so differing totals mean the input is corrupt
    pub fn from_calls(h_calls: &[Call], m_calls: &[Call]) -> anyhow::Result<Self> {
        let mut h = ChannelTally::from_calls(h_calls);
        let mut m = ChannelTally::from_calls(m_calls);

        if h.total() != m.total() {
            return Err(anyhow!(
                "Call counts do not add up: {} 5hmC vs. {} 5mC",
                h.total(),
                m.total()
            ));
        }

        // With no calls both percentages stay at 0
        h.pct = h.score().map(round2).unwrap_or(0.0);
        m.pct = m.score().map(round2).unwrap_or(0.0);
        Ok(Self { h, m })
    }

    pub fn total(&self) -> usize {
        self.m.total()
    }

    pub fn is_significant(&self, threshold: f64) -> bool {
        self.h.pct >= threshold || self.m.pct >= threshold
    }
}

impl fmt::Display for StrandTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.total(), self.h, self.m)
    }
}
