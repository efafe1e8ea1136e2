//! Scripted collaborators for driving the engine without network or disk.
//!
//! [`ScriptedFetcher`] replays a queue of fetch results and then keeps
//! answering with its current step; [`RecordingNotifier`] records every
//! delivery and can be switched to fail. Use [`MockSnapshotFetcher`] and
//! [`MockNotifier`] when a test needs exact call expectations instead.
//!
//! [`MockSnapshotFetcher`]: crate::MockSnapshotFetcher
//! [`MockNotifier`]: crate::MockNotifier
mod mock_builder;
mod mock_collaborators;

pub use mock_builder::*;
pub use mock_collaborators::*;
