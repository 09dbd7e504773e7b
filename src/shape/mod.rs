pub mod descriptor;
pub mod instance;
pub mod labels;

pub use descriptor::{LiquidSpec, ShapeDescriptor, ShapeGeometry, ShapeKind, VoxelMask};
pub use instance::ObjectInstance;
pub use labels::{validate_labels, LabelAllocator, WALL_LABEL};
