//! Pennywise observability
//!
//! Provides:
//! - Tracing subscriber setup with console, error file and JSON file output
//! - HTTP request/response logging middleware
//!
//! # Examples
//!
//! ```no_run
//! use pennywise_observability::init_logging;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     // Keep the guards alive or buffered file output is lost on exit.
//!     let _guards = init_logging()?;
//!     // ... application code ...
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod middleware;

pub use logging::{LoggingGuards, init_logging, init_logging_in};
pub use middleware::logging_middleware;
