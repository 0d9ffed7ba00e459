//! Link graph construction and querying.

mod neighborhood;
mod snapshot;

pub use neighborhood::{EdgeData, GraphElement, Neighborhood, NodeData};
pub use snapshot::{GraphSnapshot, SnapshotDocument};
