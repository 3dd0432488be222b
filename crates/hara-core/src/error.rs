use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read HAR input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed HAR input: {0}")]
    MalformedInput(String),

    #[error("Unexpected HAR shape: {0}")]
    UnexpectedShape(String),

    #[error("Cannot compute {0} of an empty dataset")]
    EmptyDataset(String),

    #[error("Integer overflow in {0}")]
    Overflow(String),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
