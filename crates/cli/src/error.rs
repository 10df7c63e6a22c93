use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Feed(#[from] feed::FeedError),
    #[error("store error: {0}")]
    Store(#[from] feed::StoreError),
    #[error("invalid base_url: {0}")]
    BaseUrl(String),
}
