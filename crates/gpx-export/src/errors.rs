use routes::RouteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No route points to export. Please create a route first.")]
    NoRouteData,

    #[error("Track time out of range: {elapsed_seconds} s after the first point")]
    ElapsedOutOfRange { elapsed_seconds: f64 },

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Timestamp formatting error: {0}")]
    TimeFormat(#[from] time::error::Format),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
