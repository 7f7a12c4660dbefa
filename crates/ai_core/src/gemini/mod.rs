//! Google Gemini `generateContent` client

mod client;
mod types;

pub use client::GeminiInferenceEngine;
