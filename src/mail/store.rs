use std::fmt;
use std::path::PathBuf;

use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// One selected message: an RFC 5322 file on disk, or standard input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MessageHandle {
    File(PathBuf),
    Stdin,
}

impl MessageHandle {
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// Access to the raw bytes (headers and body) of selected messages,
/// exactly as stored.
#[allow(async_fn_in_trait)]
pub trait MessageSource {
    async fn read_raw(&self, handle: &MessageHandle) -> AppResult<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileMessageStore;

impl MessageSource for FileMessageStore {
    async fn read_raw(&self, handle: &MessageHandle) -> AppResult<Vec<u8>> {
        let bytes = match handle {
            MessageHandle::File(path) => tokio::fs::read(path).await.map_err(|err| {
                AppError::Stream(format!("unable to read {}: {err}", path.display()))
            })?,
            MessageHandle::Stdin => {
                let mut bytes = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut bytes)
                    .await
                    .map_err(|err| AppError::Stream(format!("unable to read stdin: {err}")))?;
                bytes
            }
        };

        if bytes.is_empty() {
            return Err(AppError::Stream(format!("{handle} is empty")));
        }

        debug!(%handle, bytes = bytes.len(), "message read");
        Ok(bytes)
    }
}
