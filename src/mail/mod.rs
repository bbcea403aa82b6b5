pub mod mime;
pub mod smtp;
pub mod store;

pub use smtp::SmtpForwarder;
pub use store::{FileMessageStore, MessageHandle, MessageSource};
