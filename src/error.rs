

pub type Result<T> = std::result::Result<T, Error>;
pub type PassiveResult = Result<()>;

pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;


#[derive(Debug)]
pub enum Error {
    /// Width or height was zero or exceeded 65535.
    Dimensions(String),

    /// The bitstream did not match the format this crate writes or reads.
    Invalid(String),

    /// An internal consistency check failed. Not a recoverable condition;
    /// indicates a bug in this crate rather than bad input.
    Invariant(String),

    /// The external image-decoding collaborator failed to produce a raster.
    Decode(String),

    /// This error can also occur when reading invalid files,
    /// where the number of bytes to read does not match the input stream length.
    Io(IoError),
}


impl Error {
    pub fn dimensions(message: impl Into<String>) -> Self {
        Error::Dimensions(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Invalid(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Error::Invariant(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode(message.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Dimensions(message) => write!(f, "invalid dimensions: {}", message),
            Error::Invalid(message) => write!(f, "invalid nya bitstream: {}", message),
            Error::Invariant(message) => write!(f, "internal invariant violated: {}", message),
            Error::Decode(message) => write!(f, "could not decode input image: {}", message),
            Error::Io(error) => write!(f, "io error: {}", error),
        }
    }
}

impl std::error::Error for Error {}

/// Enable using the `?` operator on io::Result
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        Error::Io(error)
    }
}

impl From<image::ImageError> for Error {
    fn from(error: image::ImageError) -> Self {
        Error::Decode(error.to_string())
    }
}
