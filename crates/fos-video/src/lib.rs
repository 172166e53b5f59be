//! fOS Video
//!
//! In-page video behaviors for the fOS browser engine.
//!
//! Features:
//! - Visibility tracking and visibility-driven muted autoplay
//! - Scroll-linked docking of a playing video into a viewport corner
//! - Drag, inertial coasting, corner snapping and fling-to-dismiss
//! - A document-wide manager sequencing it all in measure/mutate frames

pub mod analytics;
pub mod autoplay;
pub mod config;
pub mod docking;
pub mod drag;
pub mod element;
pub mod entry;
pub mod error;
pub mod kinematics;
pub mod manager;
pub mod style;
pub mod visibility;

pub use analytics::{SessionTracker, VideoAnalyticsEvent};
pub use autoplay::{AutoplayOverlay, AutoplayProbe, AutoplaySupport, ProbeReport};
pub use config::DockingConfig;
pub use docking::{DockingState, MinimizeCorner, UndockReason};
pub use drag::{DragTick, PointerInput};
pub use element::{
    PageDirection, PlayingState, VideoAction, VideoEvent, VideoInterface, VideoOptions, Viewport,
};
pub use entry::VideoEntry;
pub use error::{ConfigError, VideoError};
pub use manager::{VideoManager, VideoStyles};
pub use style::{DockTransform, ElementStyle};
