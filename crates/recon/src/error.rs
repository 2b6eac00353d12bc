use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad threshold, empty column name, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Registry size does not add up to old + new - matched.
    #[error("registry accounting error: expected {expected} records, built {actual}")]
    Accounting { expected: usize, actual: usize },
}
