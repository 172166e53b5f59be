//! Video Entry
//!
//! Per-video aggregate: playback flags, autoplay gating, visibility,
//! docking and drag state, and the inline style overrides they produce.
//! Entries are owned by the [`VideoManager`](crate::VideoManager), which
//! sequences every call below inside a mutate phase.

use std::time::Duration;

use fos_dom::{NodeId, Unlisten};

use crate::analytics::VideoAnalyticsEvent;
use crate::autoplay::{AutoplayOverlay, AutoplaySupport};
use crate::config::DockingConfig;
use crate::docking::{Docking, DockingState, MinimizeCorner};
use crate::drag::{DragSession, DragTick, PointerInput};
use crate::element::{
    PageDirection, PlayingState, VideoAction, VideoEvent, VideoInterface, VideoOptions,
};
use crate::style::{DOCKED_CLASS, ElementStyle, MASK_ACTIVE_CLASS, MINIMIZED_CLASS};
use crate::visibility::VisibilityTracker;

/// One registered video
pub struct VideoEntry {
    video: Box<dyn VideoInterface>,
    options: VideoOptions,
    pub(crate) is_loaded: bool,
    is_playing: bool,
    is_muted: bool,
    played_by_autoplay: bool,
    user_interacted: bool,
    autoplay_support: AutoplaySupport,
    overlay: AutoplayOverlay,
    pub(crate) visibility: VisibilityTracker,
    pub(crate) docking: Docking,
    drag: Option<DragSession>,
    video_style: ElementStyle,
    mask_style: ElementStyle,
    _listeners: Unlisten,
}

impl VideoEntry {
    pub(crate) fn new(
        video: Box<dyn VideoInterface>,
        options: VideoOptions,
        visible_percent: f64,
        listeners: Unlisten,
    ) -> Self {
        Self {
            video,
            options,
            is_loaded: false,
            is_playing: false,
            is_muted: false,
            played_by_autoplay: false,
            user_interacted: false,
            autoplay_support: AutoplaySupport::Unknown,
            overlay: AutoplayOverlay::default(),
            visibility: VisibilityTracker::new(visible_percent),
            docking: Docking::new(),
            drag: None,
            video_style: ElementStyle::default(),
            mask_style: ElementStyle::default(),
            _listeners: listeners,
        }
    }

    pub fn element(&self) -> NodeId {
        self.video.element()
    }

    pub fn options(&self) -> VideoOptions {
        self.options
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn user_interacted(&self) -> bool {
        self.user_interacted
    }

    pub fn playing_state(&self) -> PlayingState {
        PlayingState::derive(self.is_playing, self.played_by_autoplay, self.user_interacted)
    }

    pub fn docking_state(&self) -> DockingState {
        self.docking.state()
    }

    pub fn minimize_corner(&self) -> MinimizeCorner {
        self.docking.corner()
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn overlay(&self) -> AutoplayOverlay {
        self.overlay
    }

    pub fn video_style(&self) -> &ElementStyle {
        &self.video_style
    }

    pub fn mask_style(&self) -> &ElementStyle {
        &self.mask_style
    }

    /// Visibility drives play/pause instead of the user
    fn autoplay_gated(&self) -> bool {
        self.options.autoplay
            && self.autoplay_support == AutoplaySupport::Supported
            && !self.user_interacted
    }

    /// Controls stay hidden while autoplay is pending or gating
    fn controls_allowed(&self) -> bool {
        !(self.options.autoplay
            && !self.user_interacted
            && self.autoplay_support != AutoplaySupport::Unsupported)
    }

    // Playback

    pub(crate) fn handle_event(&mut self, event: VideoEvent) -> Option<VideoAnalyticsEvent> {
        match event {
            VideoEvent::Load => {
                self.is_loaded = true;
                if self.autoplay_gated() && self.is_visible() {
                    self.autoplay_play();
                }
                None
            }
            VideoEvent::Play => {
                self.is_playing = true;
                self.overlay.equalizer = self.autoplay_gated() && self.video.is_interactive();
                Some(VideoAnalyticsEvent::Play)
            }
            VideoEvent::Pause => {
                self.is_playing = false;
                self.overlay.equalizer = false;
                Some(VideoAnalyticsEvent::Pause)
            }
            VideoEvent::Ended => {
                self.is_playing = false;
                self.overlay.equalizer = false;
                Some(VideoAnalyticsEvent::Ended)
            }
            VideoEvent::Muted => {
                self.is_muted = true;
                None
            }
            VideoEvent::Unmuted => {
                self.is_muted = false;
                None
            }
        }
    }

    pub(crate) fn invoke(&mut self, action: VideoAction) {
        match action {
            VideoAction::Play => {
                self.played_by_autoplay = false;
                self.video.play(false);
            }
            VideoAction::Pause => self.video.pause(),
            VideoAction::Mute => self.video.mute(),
            VideoAction::Unmute => self.video.unmute(),
            VideoAction::FullscreenEnter => self.video.fullscreen_enter(),
            VideoAction::FullscreenExit => self.video.fullscreen_exit(),
        }
    }

    pub(crate) fn pause(&mut self) {
        self.video.pause();
    }

    fn autoplay_play(&mut self) {
        self.played_by_autoplay = true;
        self.video.play(true);
    }

    // Autoplay

    /// Apply the (possibly still unknown) platform autoplay support
    pub(crate) fn apply_autoplay_support(&mut self, support: AutoplaySupport) {
        if !self.options.autoplay {
            return;
        }
        self.autoplay_support = support;
        let interactive = self.video.is_interactive();
        match support {
            AutoplaySupport::Unknown => {
                if interactive {
                    self.video.hide_controls();
                }
            }
            AutoplaySupport::Unsupported => {
                self.overlay = AutoplayOverlay::default();
                if interactive {
                    self.video.show_controls();
                }
            }
            AutoplaySupport::Supported => {
                self.video.mute();
                if interactive && !self.user_interacted {
                    self.video.hide_controls();
                    self.overlay.mask = true;
                    self.overlay.equalizer = self.is_playing;
                }
                if self.is_loaded && self.is_visible() && !self.user_interacted {
                    self.autoplay_play();
                }
            }
        }
    }

    /// First tap on the autoplay mask. Returns whether anything changed.
    pub(crate) fn mask_tapped(&mut self) -> bool {
        if self.user_interacted || !self.overlay.mask {
            return false;
        }
        self.user_interacted = true;
        self.overlay = AutoplayOverlay::default();
        self.video.unmute();
        self.video.show_controls();
        true
    }

    // Visibility

    /// A committed visibility flip
    pub(crate) fn visibility_changed(&mut self, visible: bool) -> Option<VideoAnalyticsEvent> {
        if self.autoplay_gated() {
            if self.is_loaded {
                if visible {
                    self.autoplay_play();
                } else {
                    self.video.pause();
                }
            }
            return None;
        }
        Some(if visible {
            VideoAnalyticsEvent::SessionStart
        } else {
            VideoAnalyticsEvent::SessionEnd
        })
    }

    // Docking

    pub(crate) fn begin_docking(&mut self, direction: PageDirection) {
        self.docking.begin(direction);
        self.video_style.add_class(DOCKED_CLASS);
    }

    /// Apply the scroll-linked transform. Returns `true` when this call
    /// completed docking.
    pub(crate) fn animate_docking(&mut self, config: &DockingConfig) -> bool {
        if self.drag.as_ref().is_some_and(|d| d.needs_tick(config)) {
            return false;
        }
        let Some(transform) = self.docking.transform(config) else {
            return false;
        };
        self.video_style.set_transform(transform);
        if self.docking.state() == DockingState::Docked {
            self.mask_style.set_transform(transform);
            let size = self.docking.scaled_size(transform.scale).unwrap_or_default();
            if let Some(drag) = self.drag.as_mut() {
                drag.place(transform, size, config);
            }
            return false;
        }
        if !self.docking.settle_if_minimized(config) {
            return false;
        }

        self.video.hide_controls();
        self.video_style.add_class(MINIMIZED_CLASS);
        self.mask_style.add_class(MASK_ACTIVE_CLASS);
        self.mask_style.set_transform(transform);
        let size = self.docking.minimized_size(config).unwrap_or_default();
        self.drag = Some(DragSession::new(transform, size));
        true
    }

    /// Back inline: drop overrides and the drag session, restore controls
    pub(crate) fn finish_docking(&mut self) {
        self.docking.reset();
        self.drag = None;
        self.video_style.clear();
        self.mask_style.clear();
        if self.video.is_interactive() && self.controls_allowed() {
            self.video.show_controls();
        }
    }

    // Drag

    /// Feed pointer input. Returns whether a drag tick should be scheduled.
    pub(crate) fn pointer(&mut self, input: PointerInput) -> bool {
        match self.drag.as_mut() {
            Some(drag) => drag.pointer(input),
            None => false,
        }
    }

    /// One drag frame. `None` once the loop's preconditions are gone.
    pub(crate) fn drag_tick(&mut self, now: Duration, config: &DockingConfig) -> Option<DragTick> {
        if !self.is_loaded || self.docking.state() != DockingState::Docked {
            return None;
        }
        let viewport = self.docking.viewport();
        let tick = self.drag.as_mut()?.tick(now, viewport, config);
        match tick {
            DragTick::Moved(transform) => {
                self.video_style.set_transform(transform);
                self.mask_style.set_transform(transform);
            }
            DragTick::Snap {
                transform,
                duration_ms,
                ..
            } => {
                self.video_style.animate_transform(transform, duration_ms);
                self.mask_style.animate_transform(transform, duration_ms);
            }
            DragTick::Snapped(corner) => {
                self.docking.pin_corner(corner);
                self.video_style.transition_ms = None;
                self.mask_style.transition_ms = None;
            }
            DragTick::Snapping | DragTick::Dismissed => {}
        }
        Some(tick)
    }

    pub(crate) fn drag_needs_tick(&self, config: &DockingConfig) -> bool {
        self.drag.as_ref().is_some_and(|d| d.needs_tick(config))
    }
}

impl std::fmt::Debug for VideoEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoEntry")
            .field("element", &self.video.element())
            .field("options", &self.options)
            .field("is_loaded", &self.is_loaded)
            .field("is_playing", &self.is_playing)
            .field("user_interacted", &self.user_interacted)
            .field("autoplay_support", &self.autoplay_support)
            .field("docking", &self.docking)
            .field("drag", &self.drag)
            .finish()
    }
}
