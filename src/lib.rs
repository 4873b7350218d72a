//! Dockable panel layouts: tabbed zones arranged by draggable splits.
//!
//! A [`Context`] owns the [`Panels`] registry and a [`PanelsManager`] holding the layout tree.
//! The host feeds it pointer and resize events and replays the [`DrawList`] it produces, for
//! example with [`paint_with_egui`]. Layouts can be scripted with [`DockBuilder`].

#![forbid(unsafe_code)]

mod context;
pub mod dock;
pub mod dock_builder;
mod draw;
mod input;
mod manager;
mod panel;
mod style;

pub use context::Context;
pub use dock::{
    DockContext, DockNode, DockPosition, DockTree, Magnet, NodeId, Split, SplitAxis, Zone,
};
pub use dock_builder::{DockBuilder, DockNodeId, SplitDirection};
pub use draw::{
    DrawCommand, DrawList, EguiTextMeasure, MonospaceMeasure, TextMeasure, paint_with_egui,
};
pub use input::PointerInput;
pub use manager::{DOCUMENTS_PLACEHOLDER, FrameOutput, PanelsManager};
pub use panel::{ControlId, Panel, PanelId, Panels};
pub use style::DockStyle;

#[cfg(feature = "serde")]
pub use dock::{LAYOUT_SNAPSHOT_VERSION, LayoutSnapshot, LayoutSnapshotError};
