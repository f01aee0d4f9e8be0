use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read seed file {path}: {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedParse(#[from] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}
