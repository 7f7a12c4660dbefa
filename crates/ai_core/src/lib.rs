//! AI Core - Content generation client
//!
//! Provides the inference engine abstraction and a client for the Gemini
//! `generateContent` REST API.

pub mod config;
pub mod error;
pub mod gemini;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use gemini::GeminiInferenceEngine;
pub use ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};
