// errors.rs
use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

/// Failures of the lead service as seen by the pipeline core.
///
/// The optimistic update engine does not distinguish between variants:
/// any of them on a stage change means "reload from the store".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("lead not found: {0}")]
    NotFound(String),

    #[error("invalid stage value: {0}")]
    InvalidStage(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<ServerError> for PipelineError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::NotFound => PipelineError::NotFound("unknown".into()),
            ServerError::BadRequest(msg) => PipelineError::InvalidStage(msg),
            ServerError::DbError(msg) => PipelineError::Storage(msg),
            ServerError::InternalError => PipelineError::Storage("internal failure".into()),
        }
    }
}

impl From<PipelineError> for ServerError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NotFound(_) => ServerError::NotFound,
            PipelineError::InvalidStage(msg) => ServerError::BadRequest(msg),
            PipelineError::Storage(msg) => ServerError::DbError(msg),
            PipelineError::Network(_) | PipelineError::Rejected { .. } => ServerError::InternalError,
        }
    }
}
