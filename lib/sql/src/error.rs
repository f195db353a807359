use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// A UNIQUE constraint rejected the write. Callers use this to
    /// detect a concurrent writer that got there first.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}
