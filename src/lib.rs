pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod imdb;

pub use error::{AppError, Result};

#[cfg(test)]
mod testutil;
