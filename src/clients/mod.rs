pub mod failover_client;
pub mod gemini_backend;

pub use failover_client::{FailoverClient, GenerationBackend, GenerationOutcome};
pub use gemini_backend::GeminiBackend;
