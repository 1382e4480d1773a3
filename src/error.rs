use std::fmt;
use std::path::PathBuf;

/// An error that can occur while building an index, enumerating substrings,
/// or reading/writing the serialized forms this crate produces.
#[derive(Debug)]
pub enum Error {
    /// The input text (FASTA or plain) was malformed: an empty record, a
    /// stray byte outside the DNA/RNA alphabet, or a truncated header.
    InputFormat(String),

    /// Reading or writing a file failed.
    Io {
        path: Option<PathBuf>,
        source: std::io::Error,
    },

    /// An allocation or an external suffix-array builder failed.
    Resource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputFormat(msg) => write!(f, "malformed input: {msg}"),
            Error::Io { path: Some(p), source } => {
                write!(f, "I/O error on {}: {source}", p.display())
            }
            Error::Io { path: None, source } => write!(f, "I/O error: {source}"),
            Error::Resource(msg) => write!(f, "resource error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }
}

/// Attaches a path to an I/O error for a more useful message.
pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.into();
    move |source| Error::Io {
        path: Some(path),
        source,
    }
}
