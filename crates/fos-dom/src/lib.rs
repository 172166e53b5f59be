//! fOS DOM - Document Object Model
//!
//! Host-side DOM plumbing shared by the component crates:
//! - element geometry and viewport-relative positions
//! - event targets with scoped (RAII) listeners
//! - the measure/mutate frame scheduler

pub mod events;
pub mod geometry;
pub mod vsync;

pub use events::{EventTarget, Unlisten};
pub use geometry::{DOMRect, PositionEntry, RelativePosition};
pub use vsync::Vsync;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Build a node ID from its raw arena index
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Raw arena index
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
