//! Watch scarce, externally tracked resources by key and notify subscribers
//! once when they become available.
//!
//! The [`WatchEngine`] keeps a durable registry of watches, runs one poller
//! task per watched key and resolves a key with a single notification round
//! once the upstream snapshot reports availability.
//!
//! ```ignore
//! let config = SeatWatchConfig::new()?.validate()?;
//! let engine = EngineBuilder::new(config).build()?;
//! engine.start();
//! engine.submit(Submission::new("Ada", "ada@example.com", "555-0100", "10234")).await?;
//! ```
pub mod admin;
mod config;
pub(crate) mod constants;
mod engine;
mod errors;
mod fetcher;
pub mod metrics;
mod model;
mod notifier;
mod registry;
pub mod utils;

pub use config::*;
pub use engine::*;
pub use errors::*;
pub use fetcher::*;
pub use model::*;
pub use notifier::*;
pub use registry::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
