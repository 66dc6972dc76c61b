use std::path::PathBuf;

/// Failure of a backend call. The page shows the same fixed text for every
/// variant; the distinction only matters for logs.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response was not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid base url: {source}")]
    BaseUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{var} must be an absolute http(s) url, got `{value}`")]
    UnsupportedScheme { var: &'static str, value: String },

    #[error("{var} must be a whole number of milliseconds, got `{value}`")]
    ScrollDelay { var: &'static str, value: String },
}
