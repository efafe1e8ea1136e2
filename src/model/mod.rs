//! Domain types shared by the registry, the pollers and the admin surface.
mod snapshot;
mod submission;
mod watch;
pub use snapshot::*;
pub use submission::*;
pub use watch::*;
