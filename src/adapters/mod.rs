// Adapters layer: concrete implementations of the completion and mail ports.

pub mod groq;
pub mod smtp;

pub use groq::GroqClient;
pub use smtp::SmtpMailTransport;
