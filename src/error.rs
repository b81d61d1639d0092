use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("report parse error: {0}")]
    ReportParse(String),

    #[error("unknown lint reporter: {0}")]
    UnknownReporter(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
