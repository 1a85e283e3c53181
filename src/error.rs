use std::fmt::Display;

/// Custom Result type for MiniDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for MiniDB
///
/// Missing tables and unknown columns are not errors: the storage layer
/// reports them as empty results or zero affected rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Command parsing error
    Parse(String),
    /// A schema or table file could not be opened, written or replaced
    Io(String),
    /// Invalid configuration file
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(value: tempfile::PersistError) -> Self {
        Error::Io(value.error.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(value.to_string())
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "parse error {}", err),
            Error::Io(err) => write!(f, "io error {}", err),
            Error::Config(err) => write!(f, "config error {}", err),
        }
    }
}
