use std::fmt;

#[derive(Debug)]
pub enum KeyplateError {
    InvalidGeometry(String),
    InvalidColorFormat(String),
    ImageUnavailable(String),
    DecodeTimeout,
    Cancelled,
    Io(std::io::Error),
}

impl fmt::Display for KeyplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyplateError::InvalidGeometry(message) => {
                write!(f, "invalid geometry: {}", message)
            }
            KeyplateError::InvalidColorFormat(raw) => {
                write!(f, "invalid hex color: {:?}", raw)
            }
            KeyplateError::ImageUnavailable(message) => {
                write!(f, "image unavailable: {}", message)
            }
            KeyplateError::DecodeTimeout => write!(f, "timed out waiting for bitmap decode"),
            KeyplateError::Cancelled => write!(f, "report build cancelled"),
            KeyplateError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for KeyplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeyplateError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KeyplateError {
    fn from(value: std::io::Error) -> Self {
        KeyplateError::Io(value)
    }
}
