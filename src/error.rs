use std::fmt;

#[derive(Debug)]
pub enum CoreError {
    Note(NoteError),
    Settings(SettingsError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoteError {
    /// A nearest-note query ran against a table with no entries.
    EmptyTable,
    UnknownNote { name: String },
}

#[derive(Debug)]
pub enum SettingsError {
    Json(serde_json::Error),
    InvalidField { field: &'static str, reason: String },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Note(e) => write!(f, "Note error: {e}"),
            CoreError::Settings(e) => write!(f, "Settings error: {e}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Note(e) => Some(e),
            CoreError::Settings(e) => Some(e),
        }
    }
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::EmptyTable => write!(f, "Note frequency table is empty"),
            NoteError::UnknownNote { name } => write!(f, "Unknown note '{name}'"),
        }
    }
}

impl std::error::Error for NoteError {}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Json(e) => write!(f, "Invalid settings JSON: {e}"),
            SettingsError::InvalidField { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Json(e) => Some(e),
            SettingsError::InvalidField { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

impl From<NoteError> for CoreError {
    fn from(e: NoteError) -> Self {
        CoreError::Note(e)
    }
}

impl From<SettingsError> for CoreError {
    fn from(e: SettingsError) -> Self {
        CoreError::Settings(e)
    }
}
