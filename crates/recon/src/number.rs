//! House-number comparison, including hyphenated ranges ("10-12").

use crate::score::NumberScore;

/// A house-number token: a plain number or an `A-B` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HouseNumber<'a> {
    Plain(&'a str),
    Range(&'a str, &'a str),
}

impl<'a> HouseNumber<'a> {
    pub fn parse(token: &'a str) -> Self {
        match token.split_once('-') {
            Some((lo, hi)) => Self::Range(lo, hi),
            None => Self::Plain(token),
        }
    }

    /// Inclusive numeric bounds, order-normalized. `None` if either bound
    /// is not an integer.
    fn bounds(&self) -> Option<(i64, i64)> {
        match self {
            Self::Plain(n) => {
                let n = parse_int(n)?;
                Some((n, n))
            }
            Self::Range(lo, hi) => {
                let (lo, hi) = (parse_int(lo)?, parse_int(hi)?);
                Some((lo.min(hi), lo.max(hi)))
            }
        }
    }
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Compare two house-number tokens.
///
/// - identical strings: `Definite`
/// - range vs plain: `Definite` if the number lies inside the range
/// - range vs range: `Definite` if the ranges overlap
/// - plain vs plain: absolute difference
///
/// Anything that fails to parse as an integer is a `NonMatch`.
pub fn score(num1: &str, num2: &str) -> NumberScore {
    if num1 == num2 {
        return NumberScore::Definite;
    }

    match (HouseNumber::parse(num1), HouseNumber::parse(num2)) {
        (HouseNumber::Plain(a), HouseNumber::Plain(b)) => match (parse_int(a), parse_int(b)) {
            (Some(a), Some(b)) => NumberScore::Value(a.abs_diff(b)),
            _ => NumberScore::NonMatch,
        },
        (left, right) => match (left.bounds(), right.bounds()) {
            (Some((lo1, hi1)), Some((lo2, hi2))) if lo1 <= hi2 && lo2 <= hi1 => {
                NumberScore::Definite
            }
            _ => NumberScore::NonMatch,
        },
    }
}
