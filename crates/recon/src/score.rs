use serde::Serialize;

/// Outcome of comparing two names or two house numbers.
///
/// `Definite` and `NonMatch` short-circuit the continuous comparison; the
/// scale of `Value` depends on the comparator that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchScore<T> {
    Definite,
    NonMatch,
    Value(T),
}

/// Name similarity. `Value` lies in `[0, 2]`.
pub type NameScore = MatchScore<f64>;

/// House-number distance. `Value` is an absolute integer difference.
pub type NumberScore = MatchScore<u64>;

impl NameScore {
    /// True when the score clears the name threshold (strictly greater).
    pub fn passes(&self, threshold: f64) -> bool {
        match self {
            Self::Definite => true,
            Self::NonMatch => false,
            Self::Value(v) => *v > threshold,
        }
    }

    /// Ranking weight used by the optimal strategy. Definite outranks any
    /// continuous score.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Definite => 3.0,
            Self::NonMatch => 0.0,
            Self::Value(v) => *v,
        }
    }
}

impl NumberScore {
    /// True when the house numbers are close enough (strictly less than
    /// `tolerance` apart, or a definite match).
    pub fn within(&self, tolerance: u64) -> bool {
        match self {
            Self::Definite => true,
            Self::NonMatch => false,
            Self::Value(d) => *d < tolerance,
        }
    }
}
