//! HTTP request handlers

pub mod cache;
pub mod generate;
pub mod health;
pub mod root;
pub mod simulations;
pub mod subjects;
pub mod views;
