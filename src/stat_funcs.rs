use std::fmt;

/// Descriptive statistics of a list of values.
///
/// For an empty list `n` is zero and all other statistics are None
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub n: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub sd: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub fn from_slice(v: &[f64]) -> Self {
        let n = v.len();
        if n == 0 {
            return Self::default();
        }
        let nf = n as f64;
        let mean = v.iter().sum::<f64>() / nf;
        // Population variance
        let var = v.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / nf;
        let (min, max) = v
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), &x| {
                (a.min(x), b.max(x))
            });

        Self {
            n,
            mean: Some(mean),
            median: Some(median(v)),
            sd: Some(var.sqrt()),
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Median of a non-empty slice
fn median(v: &[f64]) -> f64 {
    let mut s = v.to_vec();
    s.sort_unstable_by(|a, b| a.total_cmp(b));
    let n = s.len();
    if n & 1 == 1 {
        s[n >> 1]
    } else {
        0.5 * (s[(n >> 1) - 1] + s[n >> 1])
    }
}

struct Na(Option<f64>);

impl fmt::Display for Na {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(x) => write!(f, "{:.4}", x),
            None => write!(f, "NA"),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.n,
            Na(self.mean),
            Na(self.median),
            Na(self.sd),
            Na(self.min),
            Na(self.max)
        )
    }
}
