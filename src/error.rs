use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Occurs when the byte stream is not a valid, complete zstd frame: truncated, corrupted, or
    /// followed by trailing bytes.
    FailDecompress(String),
    /// Occurs when the decompressed payload doesn't have the expected shape: invalid JSON, a
    /// missing field or tag, a collection tagged with the wrong kind, a map entry that isn't a
    /// `[key, value]` pair, or a value of the wrong JSON type.
    BadFormat { path: String, reason: String },
    /// Occurs when a key or value has the right shape but can't be converted to its target type,
    /// such as a malformed identifier or an out-of-range line number.
    BadType { path: String, reason: String },
    /// Decompressed data would be larger than the configured maximum.
    LengthTooLong { max: usize, actual: usize },
    /// Occurs when serializing or compressing a record fails.
    BadEncode(String),
}

impl Error {
    /// The location of the offending value within the payload, for format and type errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::BadFormat { path, .. } | Error::BadType { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Replace the location attached to a format or type error. Other errors are returned as-is.
    pub(crate) fn with_path(self, path: String) -> Self {
        match self {
            Error::BadFormat { reason, .. } => Error::BadFormat { path, reason },
            Error::BadType { reason, .. } => Error::BadType { path, reason },
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::FailDecompress(ref err) => write!(f, "Failed decompression step: {}", err),
            Error::BadFormat {
                ref path,
                ref reason,
            } => write!(f, "Bad format at {}: {}", path, reason),
            Error::BadType {
                ref path,
                ref reason,
            } => write!(f, "Bad type at {}: {}", path, reason),
            Error::LengthTooLong { max, actual } => write!(
                f,
                "Data too long: was {} bytes, maximum allowed is {}",
                actual, max
            ),
            Error::BadEncode(ref err) => write!(f, "Encoding failure: {}", err),
        }
    }
}

impl std::error::Error for Error {}
