//! CLI Exit Code Registry
//!
//! Single source of truth for `placemerge` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | Internal engine error (registry accounting mismatch)  |
//! | 2    | Usage error (bad arguments, unreadable config)        |
//! | 60   | Invalid config (parse or validation failure)          |
//! | 61   | Input load failure (missing file/column, bad coordinate) |
//! | 62   | Output write failure                                  |
//! | 63   | Geo failure (malformed or empty boundary)             |
//!
//! Clap's own argument errors also exit with 2.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Engine invariant violated. Should not happen; report it.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, config file cannot be read.
pub const EXIT_USAGE: u8 = 2;

/// Config parsed but rejected, or not valid TOML.
pub const EXIT_INVALID_CONFIG: u8 = 60;

/// A place table, points file or boundary file could not be loaded.
pub const EXIT_INPUT: u8 = 61;

/// The registry or filtered table could not be written.
pub const EXIT_OUTPUT: u8 = 62;

/// Boundary document is not usable GeoJSON.
pub const EXIT_GEO: u8 = 63;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let mut codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_INVALID_CONFIG,
            EXIT_INPUT,
            EXIT_OUTPUT,
            EXIT_GEO,
        ];
        codes.sort_unstable();
        let len = codes.len();
        let mut unique = codes.to_vec();
        unique.dedup();
        assert_eq!(unique.len(), len);
    }
}
