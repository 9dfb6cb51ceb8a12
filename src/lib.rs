pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::{NormalizeError, Result};
pub use service::{FileProcessor, RegistryPipeline};
