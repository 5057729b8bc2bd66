use std::fmt::Display;

#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Io(err) => write!(f, "history i/o error: {err}"),
            HistoryError::Json(err) => write!(f, "history is not valid JSON: {err}"),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Io(err) => Some(err),
            HistoryError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self { HistoryError::Io(err) }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self { HistoryError::Json(err) }
}
