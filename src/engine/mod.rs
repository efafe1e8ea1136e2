//! Watch-monitoring engine.
//!
//! One [`WatchEngine`] owns the watch registry and the set of running
//! pollers behind a single lock. Each key with at least one watch has
//! exactly one poller task; the poller hands availability to the
//! [`NotificationGate`] which notifies once and resolves the key.
mod builder;
mod gate;
mod poller;
mod scheduler;
mod watch_engine;
pub use builder::*;
pub use gate::*;
pub use poller::*;
pub use scheduler::*;
pub use watch_engine::*;
