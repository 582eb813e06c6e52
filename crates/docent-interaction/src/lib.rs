//! Backends that answer grounded questions.

pub mod gemini_api_backend;

pub use gemini_api_backend::GeminiApiBackend;
