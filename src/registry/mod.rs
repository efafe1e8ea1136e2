//! Durable registry of watch requests.
//!
//! [`WatchRegistry`] is the in-memory, insertion-ordered set of watches and
//! the only writer of the durable store. It is not synchronized itself; the
//! engine owns it behind the same lock as the active monitors so that
//! registry and scheduler mutations are linearizable.
//!
//! Persistence is best-effort: every mutation rewrites the whole registry
//! through a [`RegistryStore`] before returning, and a failed write is
//! reported without rolling the in-memory change back.
mod json_file_store;
mod mem_store;
mod registry;
mod store;
pub use json_file_store::*;
pub use mem_store::*;
pub use registry::*;
pub use store::*;
