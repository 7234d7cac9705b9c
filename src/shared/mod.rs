pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, DatabaseConfig, LoggingConfig, ResolverConfig};
pub use error::{AppError, Result};
pub use logging::init_logging;
