use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid geojson: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("invalid color '{0}'")]
    InvalidColor(String),
    #[error("error drawing map: {0}")]
    Render(#[from] staticmap::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
