pub mod client;
pub mod models;

pub use client::MispClient;
pub use models::{EventEnvelope, SubmitResult};
