//! Street-address canonicalization and structural comparison.

use crate::number;

/// Long-form street suffixes and their abbreviations, applied in this order.
pub const STREET_SUFFIXES: [(&str, &str); 5] = [
    ("Street", "St"),
    ("Avenue", "Ave"),
    ("Terrace", "Ter"),
    ("Court", "Ct"),
    ("Road", "Rd"),
];

/// Neighborhood names some sources append as ", Town".
pub const DEFAULT_NEIGHBORHOODS: [&str; 4] = ["Brighton", "Boston", "Allston", "Brookline"];

/// Marker preceding an apartment/unit number.
pub const UNIT_MARKER: &str = " #";

/// Default house-number tolerance: numbers strictly less than this far apart
/// are treated as the same building.
pub const DEFAULT_HOUSE_NUMBER_TOLERANCE: u64 = 5;

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AddressNormalizer {
    neighborhoods: Vec<String>,
}

impl Default for AddressNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORHOODS.iter().map(|s| s.to_string()).collect())
    }
}

impl AddressNormalizer {
    pub fn new(neighborhoods: Vec<String>) -> Self {
        Self { neighborhoods }
    }

    /// Canonicalize an address: drop trailing ", Neighborhood" suffixes,
    /// remove periods and commas, abbreviate street suffixes.
    ///
    /// Replacement is case-sensitive on the capitalized long forms.
    pub fn normalize(&self, address: &str) -> String {
        let mut out = address;
        for town in &self.neighborhoods {
            if let Some(stripped) = out
                .strip_suffix(town.as_str())
                .and_then(|rest| rest.strip_suffix(", "))
            {
                out = stripped;
            }
        }

        let mut out = out.replace(['.', ','], "");
        for (long, short) in STREET_SUFFIXES {
            // A replacement can splice a new long form ("StStreetreet").
            while out.contains(long) {
                out = out.replace(long, short);
            }
        }
        out
    }
}

/// Normalize with the default neighborhood list.
pub fn normalize(address: &str) -> String {
    AddressNormalizer::default().normalize(address)
}

/// Truncate at the first unit marker (" #").
pub fn strip_unit(address: &str) -> &str {
    match address.find(UNIT_MARKER) {
        Some(idx) => &address[..idx],
        None => address,
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct AddressMatcher {
    pub house_number_tolerance: u64,
}

impl Default for AddressMatcher {
    fn default() -> Self {
        Self {
            house_number_tolerance: DEFAULT_HOUSE_NUMBER_TOLERANCE,
        }
    }
}

impl AddressMatcher {
    pub fn new(house_number_tolerance: u64) -> Self {
        Self { house_number_tolerance }
    }

    /// Decide whether two normalized, unit-stripped addresses name the same
    /// place.
    ///
    /// Tokens are positional: `[house number, street name, street type, ..]`
    /// when both addresses carry digits, `[word, word, ..]` when neither does.
    /// An address with digits never matches one without.
    pub fn matches(&self, addr1: &str, addr2: &str) -> bool {
        let addr1 = addr1.to_lowercase();
        let addr2 = addr2.to_lowercase();
        let t1: Vec<&str> = addr1.split(' ').collect();
        let t2: Vec<&str> = addr2.split(' ').collect();

        match (has_digit(&addr1), has_digit(&addr2)) {
            (true, true) => {
                if t1.len() < 3 || t2.len() < 3 {
                    return false;
                }
                number::score(t1[0], t2[0]).within(self.house_number_tolerance)
                    && contains_either(t1[1], t2[1])
                    && contains_either(t1[2], t2[2])
            }
            (false, false) => {
                if t1.len() < 2 || t2.len() < 2 {
                    return false;
                }
                contains_either(t1[0], t2[0]) && contains_either(t1[1], t2[1])
            }
            _ => false,
        }
    }
}

/// Match with the default house-number tolerance.
pub fn matches(addr1: &str, addr2: &str) -> bool {
    AddressMatcher::default().matches(addr1, addr2)
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
