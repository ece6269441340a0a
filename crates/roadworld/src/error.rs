use std::fmt;

/// Error type shared by world construction and snapshot loading.
#[derive(Debug)]
pub enum WorldError {
    InvalidParams { reason: String },
    Snapshot { reason: String },
    Json(serde_json::Error),
}

impl WorldError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    pub(crate) fn snapshot(reason: impl Into<String>) -> Self {
        Self::Snapshot {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid world params: {reason}"),
            Self::Snapshot { reason } => write!(f, "inconsistent snapshot: {reason}"),
            Self::Json(err) => write!(f, "malformed snapshot json: {err}"),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WorldError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
