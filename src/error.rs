use std::error;
use std::fmt;
use std::io;
use std::result;

#[derive(Debug)]
pub enum KvsError {
    IO(io::Error),
    InvalidArgument(String),
    KeyNotFound,
    Parse { line: usize, message: String },
    StringError(String),
}

impl fmt::Display for KvsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO(err) => write!(f, "IO: {}", err),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::KeyNotFound => write!(f, "Key not found"),
            Self::Parse { line, message } => write!(f, "line {}: {}", line, message),
            Self::StringError(msg) => write!(f, "{}", msg),
        }
    }
}

impl error::Error for KvsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::IO(source) => Some(source),
            Self::InvalidArgument(_) => None,
            Self::KeyNotFound => None,
            Self::Parse { .. } => None,
            Self::StringError(_) => None,
        }
    }
}

impl From<io::Error> for KvsError {
    fn from(e: io::Error) -> Self {
        Self::IO(e)
    }
}

pub type Result<T> = result::Result<T, KvsError>;
