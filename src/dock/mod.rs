//! The docking layout tree: zones of tabbed panels arranged by horizontal and vertical splits.

mod context;
mod geometry;
mod integrity;
pub(crate) mod render;
mod tree;
mod zone;

#[cfg(feature = "serde")]
mod snapshot;


pub use context::{DockContext, DockPosition};
pub use geometry::{Magnet, SplitAxis, amount_from_split_pos, split_pos};
pub use integrity::tree_integrity_issues;
pub use tree::{Clean, DockNode, DockTree, NodeId, Split};
pub use zone::Zone;

pub(crate) use geometry::{clamp_split_pos, split_bar};
#[cfg(test)]
pub(crate) use geometry::close_glyph_rect;

#[cfg(feature = "serde")]
pub(crate) use snapshot::RestoredLayout;
#[cfg(feature = "serde")]
pub use snapshot::{LAYOUT_SNAPSHOT_VERSION, LayoutSnapshot, LayoutSnapshotError, NodeSnapshot};
