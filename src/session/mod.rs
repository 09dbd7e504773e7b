//! Slice sessions: per-slice placement of every object and the volume that
//! stacks them.

mod config;
mod record;
mod slice;
mod volume;

pub use config::{PlacementMode, SessionConfig, SpawnConfig};
pub use record::{ObjectRecord, PlacedGeometry};
pub use slice::{ObjectId, SliceOutput, SliceSession};
pub use volume::{PackVolume, PackedVolume};
