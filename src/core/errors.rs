use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordsiftError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Analysis backend error: {0}")]
    Backend(String),

    #[error("Analysis model is not loaded")]
    ModelNotLoaded,

    #[error("No files selected for analysis")]
    NoFilesSelected,

    #[error("An analysis is already running")]
    AnalysisInProgress,

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("WordsiftError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for WordsiftError {
    fn from(error: std::io::Error) -> Self {
        WordsiftError::Io(Box::new(error))
    }
}
