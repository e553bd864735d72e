use std::{fmt, time::Duration};

#[derive(Debug)]
pub enum StoreError {
    /// The database rejected a statement or the connection failed.
    Database(String),
    /// A round trip did not finish in time.
    Timeout(Duration),
    /// Connection settings could not be understood.
    Config(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(msg) => write!(f, "database error: {}", msg),
            StoreError::Timeout(after) => write!(f, "store did not answer within {:?}", after),
            StoreError::Config(msg) => write!(f, "invalid store configuration: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        StoreError::Database(error.to_string())
    }
}
