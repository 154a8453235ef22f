use std::fmt;

/// Strand of the call relative to the reference
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn idx(&self) -> usize {
        match self {
            Self::Plus => 0,
            Self::Minus => 1,
        }
    }

    pub fn from_field(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if matches!(self, Self::Plus) { '+' } else { '-' })
    }
}

/// Modification channel.  H is 5hmC-like, M is 5mC-like.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channel {
    H,
    M,
}

impl Channel {
    pub fn idx(&self) -> usize {
        match self {
            Self::H => 0,
            Self::M => 1,
        }
    }

    pub fn from_field(s: &str) -> Option<Self> {
        match s {
            "h" => Some(Self::H),
            "m" => Some(Self::M),
            _ => None,
        }
    }

    /// Only the M channel keeps the canonical probabilities
    pub fn has_canonical_probs(&self) -> bool {
        matches!(self, Self::M)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if matches!(self, Self::H) { 'h' } else { 'm' })
    }
}

/// Outcome of classifying a single read at a single site
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Call {
    Canonical = -1,
    Ambiguous = 0,
    Modified = 1,
}

impl Call {
    /// Probabilities are percentages (0-100)
    pub fn classify(mod_prob: f64, can_prob: f64, threshold: f64) -> Self {
        if can_prob >= threshold {
            Self::Canonical
        } else if mod_prob >= threshold {
            Self::Modified
        } else {
            Self::Ambiguous
        }
    }

    pub fn value(&self) -> i8 {
        *self as i8
    }
}

/// Convert a natural log probability to a percentage
pub fn log_prob_to_pct(x: f64) -> f64 {
    x.exp() * 100.0
}

#[derive(Debug, Clone)]
pub struct CallRecord {
    pub read_id: Box<str>,
    pub contig: Box<str>,
    pub strand: Strand,
    pub position: u64,
    pub mod_prob: f64,
    pub can_prob: f64,
    pub channel: Channel,
}

impl CallRecord {
    pub fn call(&self, threshold: f64) -> Call {
        Call::classify(self.mod_prob, self.can_prob, threshold)
    }
}

/// Result of parsing one input line
#[derive(Debug)]
pub enum ParsedLine {
    Record(CallRecord),
    Skip(SkipReason),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Strand(Box<str>),
    Channel(Box<str>),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strand(s) => write!(f, "unrecognized strand '{}'", s),
            Self::Channel(s) => write!(f, "unrecognized modification '{}'", s),
        }
    }
}

const N_FIELDS: usize = 7;

/// Parse a line from a Megalodon per read modified base calls file.
///
/// Lines with an unknown strand or modification are skipped, anything else
/// that can not be parsed is an error.
pub fn parse_line(line: &str, line_no: usize) -> anyhow::Result<ParsedLine> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Ok(ParsedLine::Blank);
    }
    let fields: Vec<_> = line.split('\t').collect();
    if fields.len() < N_FIELDS {
        return Err(anyhow!(
            "Wrong number of fields at line {} (seen {}, expected {})",
            line_no,
            fields.len(),
            N_FIELDS
        ));
    }

    let position = fields[3].parse::<u64>().map_err(|e| {
        anyhow!(
            "Could not parse position from column 4 at line {}: {}",
            line_no,
            e
        )
    })?;

    let parse_prob = |ix: usize| {
        fields[ix].parse::<f64>().map_err(|e| {
            anyhow!(
                "Could not parse log probability from column {} at line {}: {}",
                ix + 1,
                line_no,
                e
            )
        })
    };
    let mod_prob = log_prob_to_pct(parse_prob(4)?);
    let can_prob = log_prob_to_pct(parse_prob(5)?);

    let strand = match Strand::from_field(fields[2]) {
        Some(s) => s,
        None => return Ok(ParsedLine::Skip(SkipReason::Strand(Box::from(fields[2])))),
    };
    let channel = match Channel::from_field(fields[6]) {
        Some(c) => c,
        None => return Ok(ParsedLine::Skip(SkipReason::Channel(Box::from(fields[6])))),
    };

    Ok(ParsedLine::Record(CallRecord {
        read_id: Box::from(fields[0]),
        contig: Box::from(fields[1]),
        strand,
        position,
        mod_prob,
        can_prob,
        channel,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> CallRecord {
        match parse_line(line, 2).unwrap() {
            ParsedLine::Record(r) => r,
            x => panic!("Expected record, got {:?}", x),
        }
    }

    #[test]
    fn parse_record() {
        let r = record("read1\tctg1\t+\t1000\t-0.10536051565782628\t-2.3025850929940455\th\n");
        assert_eq!(&*r.read_id, "read1");
        assert_eq!(&*r.contig, "ctg1");
        assert_eq!(r.strand, Strand::Plus);
        assert_eq!(r.channel, Channel::H);
        assert_eq!(r.position, 1000);
        assert!((r.mod_prob - 90.0).abs() < 1e-9);
        assert!((r.can_prob - 10.0).abs() < 1e-9);
        assert_eq!(r.call(60.0), Call::Modified);
    }

    #[test]
    fn classification_uses_current_probabilities() {
        assert_eq!(Call::classify(90.0, 5.0, 60.0), Call::Modified);
        assert_eq!(Call::classify(5.0, 90.0, 60.0), Call::Canonical);
        // A modified call followed by an ambiguous one must not inherit +1
        assert_eq!(Call::classify(50.0, 40.0, 60.0), Call::Ambiguous);
        assert_eq!(Call::classify(60.0, 40.0, 60.0), Call::Modified);
        assert_eq!(Call::classify(55.0, 55.0, 50.0), Call::Canonical);
        assert_eq!(Call::Canonical.value(), -1);
    }

    #[test]
    fn unknown_strand_or_channel_is_skipped() {
        let l = "read1\tctg1\t.\t1000\t-0.1\t-2.3\th";
        assert!(matches!(
            parse_line(l, 3).unwrap(),
            ParsedLine::Skip(SkipReason::Strand(_))
        ));
        let l = "read1\tctg1\t-\t1000\t-0.1\t-2.3\ta";
        match parse_line(l, 3).unwrap() {
            ParsedLine::Skip(r) => assert_eq!(r.to_string(), "unrecognized modification 'a'"),
            x => panic!("Expected skip, got {:?}", x),
        }
    }

    #[test]
    fn malformed_lines() {
        assert!(parse_line("read1\tctg1\t+\t1000", 5).is_err());
        assert!(parse_line("read1\tctg1\t+\tabc\t-0.1\t-2.3\th", 5).is_err());
        assert!(parse_line("read1\tctg1\t+\t10\tx\t-2.3\th", 5).is_err());
        assert!(matches!(parse_line("\n", 5).unwrap(), ParsedLine::Blank));
    }
}
