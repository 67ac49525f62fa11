use thiserror::Error;

/// Library-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dump file holds something other than back-to-back BSON documents.
    #[error("Invalid BSON in dump: {0}")]
    Dump(#[from] mongodb::bson::de::Error),

    /// The server could not be reached or refused the initial ping.
    #[error("Could not connect to {uri}: {source}")]
    Connection {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// Flags, environment, or config file do not describe a usable connection.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Statistics for a database or collection could not be read.
    #[error("Statistics unavailable for {namespace}: {reason}")]
    StatsUnavailable { namespace: String, reason: String },
}

impl Error {
    pub fn stats_unavailable(namespace: impl Into<String>, reason: impl ToString) -> Self {
        Error::StatsUnavailable { namespace: namespace.into(), reason: reason.to_string() }
    }

    /// Whether the run can continue past this error by skipping the affected unit.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::StatsUnavailable { .. })
    }
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
