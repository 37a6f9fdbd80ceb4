mod carryover;
mod snapshot;
mod store;

pub use carryover::carry_over;
pub use snapshot::{ItemStatus, MemorySnapshot, SnapshotItem};
pub use store::SnapshotStore;
