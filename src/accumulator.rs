use crate::{
    call::{Call, CallRecord, Channel, Strand},
    stat_funcs::Summary,
};

/// Calls and probabilities for one (channel, strand) combination
#[derive(Debug, Default)]
pub struct ChannelCalls {
    calls: Vec<Call>,
    mod_probs: Vec<f64>,
    can_probs: Option<Vec<f64>>,
}

impl ChannelCalls {
    fn new(channel: Channel) -> Self {
        Self {
            can_probs: if channel.has_canonical_probs() {
                Some(Vec::new())
            } else {
                None
            },
            ..Default::default()
        }
    }

    fn push(&mut self, call: Call, mod_prob: f64, can_prob: f64) {
        self.calls.push(call);
        self.mod_probs.push(mod_prob);
        if let Some(v) = self.can_probs.as_mut() {
            v.push(can_prob)
        }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn mod_probs(&self) -> &[f64] {
        &self.mod_probs
    }

    pub fn can_probs(&self) -> Option<&[f64]> {
        self.can_probs.as_deref()
    }

    fn summarize(&self) -> ChannelSummary {
        let calls: Vec<f64> = self.calls.iter().map(|c| c.value() as f64).collect();
        ChannelSummary {
            calls: Summary::from_slice(&calls),
            mod_probs: Summary::from_slice(self.mod_probs()),
            can_probs: self.can_probs().map(Summary::from_slice),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelSummary {
    pub calls: Summary,
    pub mod_probs: Summary,
    pub can_probs: Option<Summary>,
}

/// Summary statistics for all lists of a finalized position.
/// Indexed by [channel][strand]
#[derive(Debug)]
pub struct PositionStats {
    stats: [[ChannelSummary; 2]; 2],
}

impl PositionStats {
    pub fn get(&self, channel: Channel, strand: Strand) -> &ChannelSummary {
        &self.stats[channel.idx()][strand.idx()]
    }
}

/// All calls seen at a single genomic position
#[derive(Debug)]
pub struct PositionAccumulator {
    contig: Box<str>,
    position: u64,
    calls: [[ChannelCalls; 2]; 2],
}

impl PositionAccumulator {
    pub fn new(contig: &str, position: u64) -> Self {
        Self {
            contig: Box::from(contig),
            position,
            calls: [
                [ChannelCalls::new(Channel::H), ChannelCalls::new(Channel::H)],
                [ChannelCalls::new(Channel::M), ChannelCalls::new(Channel::M)],
            ],
        }
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn record_call(&mut self, rec: &CallRecord, threshold: f64) {
        let call = rec.call(threshold);
        self.calls[rec.channel.idx()][rec.strand.idx()].push(call, rec.mod_prob, rec.can_prob)
    }

    pub fn channel_calls(&self, channel: Channel, strand: Strand) -> &ChannelCalls {
        &self.calls[channel.idx()][strand.idx()]
    }

    pub fn finalize(&self) -> PositionStats {
        let stats = [
            [self.calls[0][0].summarize(), self.calls[0][1].summarize()],
            [self.calls[1][0].summarize(), self.calls[1][1].summarize()],
        ];
        PositionStats { stats }
    }
}
