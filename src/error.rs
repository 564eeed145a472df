use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Grid parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
