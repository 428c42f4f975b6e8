pub mod attachment;
pub mod edge_path;
pub mod geometry;
pub mod parallel;
pub mod snap;
pub mod snapshot;

pub use attachment::{AttachmentSlot, attachment_point, distribute_attachment_points};
pub use edge_path::{EdgePath, edge_path};
pub use geometry::{
    GeometrySettings, LineCoords, NodeShape, border_midpoint, node_shape, ray_rect_exit,
    trimmed_line,
};
pub use parallel::{ParallelOffset, parallel_edge_offset, parallel_edge_offsets};
pub use snap::{SnapAnchor, SnapEngine, SnapGuide, SnapResult};
pub use snapshot::GraphSnapshot;
