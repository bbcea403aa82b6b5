use std::io;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("SES is misconfigured. Malware reporting will be unavailable.")]
    Misconfigured,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Stream(String),
    #[error("report incomplete: {0}")]
    Report(String),
    #[error("mail error: {0}")]
    Mail(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
