//! Analytics hooks
//!
//! Playback and session milestones reported to an optional tracker.

use fos_dom::NodeId;

use crate::element::PlayingState;

/// Milestones reported per video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoAnalyticsEvent {
    Play,
    Pause,
    Ended,
    /// Became visible outside of autoplay control
    SessionStart,
    /// Stopped being visible outside of autoplay control
    SessionEnd,
    Docked,
    Undocked,
    /// Flung off-screen by the user
    Dismissed,
}

/// Receives analytics milestones
pub trait SessionTracker {
    fn track(&mut self, video: NodeId, event: VideoAnalyticsEvent, state: PlayingState);
}
