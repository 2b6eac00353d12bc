//! Business-name similarity.

use crate::score::NameScore;

/// Lower-case, drop apostrophes and hyphens, expand "ctr" to "center".
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .replace(['\'', '-'], "")
        .replace("ctr", "center")
}

/// Score two business names.
///
/// Returns `Definite` when either normalized name contains the other.
/// Otherwise counts the tokens of each name found anywhere inside the other
/// and divides by the combined token count, giving a value in `[0, 2]`.
pub fn score(name1: &str, name2: &str) -> NameScore {
    let n1 = normalize_name(name1);
    let n2 = normalize_name(name2);

    if n1.contains(n2.as_str()) || n2.contains(n1.as_str()) {
        return NameScore::Definite;
    }

    let tokens1: Vec<&str> = n1.split_whitespace().collect();
    let tokens2: Vec<&str> = n2.split_whitespace().collect();
    let total = tokens1.len() + tokens2.len();
    if total == 0 {
        return NameScore::NonMatch;
    }

    let count1 = tokens1.iter().filter(|t| n2.contains(**t)).count();
    let count2 = tokens2.iter().filter(|t| n1.contains(**t)).count();

    NameScore::Value((count1 + count2) as f64 / total as f64)
}
