//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XlateError {
    #[error("CACHE/{0}")]
    Cache(String),

    #[error("PARSE/{0}")]
    Parse(String),

    #[error("IO/{0}")]
    Io(String),

    #[error("SERVICE/{0}")]
    Service(String),
}

impl From<std::io::Error> for XlateError {
    fn from(err: std::io::Error) -> Self {
        XlateError::Io(err.to_string())
    }
}
