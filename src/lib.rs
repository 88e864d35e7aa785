pub mod catmull_rom;
pub mod curve;
pub mod error;
pub mod geometry_utilities;
pub mod path;
pub mod path_editing;
pub mod serialization;
mod sub_path;

pub use curve::{CurveSegment, PointRole};
pub use error::PathError;
pub use path::{Path, PointId};
pub use path_editing::{AdjustOptions, DragOptions, MIN_HANDLE_LENGTH};
