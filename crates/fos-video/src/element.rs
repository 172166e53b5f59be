//! Media Elements
//!
//! The capability surface a video player implementation exposes to the
//! manager, the viewport it lives in, and the events and actions exchanged
//! with it.

use fos_dom::NodeId;
use serde::Deserialize;

/// A video player implementation (native `<video>`, an embedded iframe
/// player, ...).
pub trait VideoInterface {
    /// Host element handle, the video's identity
    fn element(&self) -> NodeId;

    /// Start playback. `is_autoplay` marks policy-initiated playback.
    fn play(&mut self, is_autoplay: bool);
    fn pause(&mut self);
    fn mute(&mut self);
    fn unmute(&mut self);
    fn hide_controls(&mut self);
    fn show_controls(&mut self);

    /// Whether the player shows user-operable controls
    fn is_interactive(&self) -> bool;

    /// Whether the player can run on this platform at all
    fn supports_platform(&self) -> bool;

    /// Playback position (s)
    fn current_time(&self) -> f64;

    /// Media duration (s), `NaN` while unknown
    fn duration(&self) -> f64;

    fn fullscreen_enter(&mut self);
    fn fullscreen_exit(&mut self);
}

/// The document viewport, read during measure phases
pub trait Viewport {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Full scrollable height of the document
    fn scroll_height(&self) -> f64;
}

/// Element events the manager subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoEvent {
    Load,
    Play,
    Pause,
    Ended,
    Muted,
    Unmuted,
}

impl VideoEvent {
    pub const ALL: [VideoEvent; 6] = [
        VideoEvent::Load,
        VideoEvent::Play,
        VideoEvent::Pause,
        VideoEvent::Ended,
        VideoEvent::Muted,
        VideoEvent::Unmuted,
    ];
}

/// Actions bound on every registered video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoAction {
    Play,
    Pause,
    Mute,
    Unmute,
    FullscreenEnter,
    FullscreenExit,
}

/// Public playback state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayingState {
    #[default]
    Paused,
    /// Playing because the autoplay policy started it
    PlayingAuto,
    /// Playing because the user asked for it (or took over an autoplay)
    PlayingManual,
}

impl PlayingState {
    pub fn derive(is_playing: bool, played_by_autoplay: bool, user_interacted: bool) -> Self {
        if !is_playing {
            PlayingState::Paused
        } else if played_by_autoplay && !user_interacted {
            PlayingState::PlayingAuto
        } else {
            PlayingState::PlayingManual
        }
    }
}

/// Text direction of the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Behaviors a video element requests through its attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    pub autoplay: bool,
    pub dock: bool,
}
