use std::{error, fmt};

#[derive(Debug)]
pub enum LinkError {
    /// The document is not valid JSON.
    Json(serde_json::Error),
    /// The document is valid JSON but its top level value is not an object.
    RootNotRecord,
}

impl error::Error for LinkError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LinkError::Json(e) => Some(e),
            LinkError::RootNotRecord => None,
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Json(e) => write!(f, "Malformed document\n{e}"),
            LinkError::RootNotRecord => write!(f, "Document root is not an object"),
        }
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(value: serde_json::Error) -> Self {
        LinkError::Json(value)
    }
}
