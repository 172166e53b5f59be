//! Video Manager
//!
//! Document-wide registry of videos. Owns every [`VideoEntry`], the single
//! docked-video slot and the measure/mutate scheduler that sequences all of
//! their state changes.
//!
//! The host feeds observations in (`on_intersection`, `on_position_changed`,
//! `on_viewport_resize`, pointer input, element events) and calls
//! [`VideoManager::run_frame`] once per animation frame while
//! [`VideoManager::has_pending_frame`] holds.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use fos_dom::{EventTarget, NodeId, PositionEntry, Vsync};
use kurbo::Size;

use crate::analytics::{SessionTracker, VideoAnalyticsEvent};
use crate::autoplay::{AutoplayOverlay, AutoplayProbe, AutoplayResolver, AutoplaySupport};
use crate::config::DockingConfig;
use crate::docking::{DockContext, DockDecision, DockingState, MinimizeCorner, UndockReason};
use crate::drag::{DragTick, PointerInput};
use crate::element::{
    PageDirection, PlayingState, VideoAction, VideoEvent, VideoInterface, VideoOptions, Viewport,
};
use crate::entry::VideoEntry;
use crate::error::{ConfigError, VideoError};
use crate::style::ElementStyle;

/// Read-only work for the measure phase
#[derive(Debug, Clone, Copy, PartialEq)]
enum Measure {
    Visibility(NodeId, f64),
    Position(NodeId, PositionEntry),
    Remeasure(NodeId),
}

/// Writes for the mutate phase
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mutate {
    Visibility(NodeId),
    Dock(NodeId),
    Resize(NodeId),
    DragTick(NodeId),
    MaskTapped(NodeId),
    AutoplaySetup(NodeId),
    AutoplayResolved(AutoplaySupport),
}

type Inbox = Rc<RefCell<VecDeque<(NodeId, VideoEvent)>>>;

/// Inline overrides of a video element and its drag mask
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoStyles {
    pub video: ElementStyle,
    pub mask: ElementStyle,
}

fn find(entries: &[VideoEntry], node: NodeId) -> Option<&VideoEntry> {
    entries.iter().find(|e| e.element() == node)
}

fn find_mut(entries: &mut [VideoEntry], node: NodeId) -> Option<&mut VideoEntry> {
    entries.iter_mut().find(|e| e.element() == node)
}

/// Registry of the document's videos
pub struct VideoManager {
    viewport: Box<dyn Viewport>,
    config: DockingConfig,
    direction: PageDirection,
    /// Registration order
    entries: Vec<VideoEntry>,
    /// The one video allowed out of inline
    docked: Option<NodeId>,
    vsync: Vsync<Measure, Mutate>,
    inbox: Inbox,
    /// Player actions in call order, never coalesced
    actions: VecDeque<(NodeId, VideoAction)>,
    autoplay: AutoplayResolver,
    tracker: Option<Box<dyn SessionTracker>>,
    now: Duration,
}

impl VideoManager {
    /// Manager with the default [`DockingConfig`]
    pub fn new(viewport: Box<dyn Viewport>) -> Self {
        Self {
            viewport,
            config: DockingConfig::default(),
            direction: PageDirection::default(),
            entries: Vec::new(),
            docked: None,
            vsync: Vsync::new(),
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            actions: VecDeque::new(),
            autoplay: AutoplayResolver::new(None),
            tracker: None,
            now: Duration::ZERO,
        }
    }

    pub fn with_config(
        viewport: Box<dyn Viewport>,
        config: DockingConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut manager = Self::new(viewport);
        manager.config = config;
        Ok(manager)
    }

    pub fn config(&self) -> &DockingConfig {
        &self.config
    }

    pub fn set_page_direction(&mut self, direction: PageDirection) {
        self.direction = direction;
    }

    /// Install the platform autoplay probe. Without one, autoplay is
    /// treated as unsupported. Must precede the first autoplay registration.
    pub fn set_autoplay_probe(&mut self, probe: Box<dyn AutoplayProbe>) {
        self.autoplay = AutoplayResolver::new(Some(probe));
    }

    pub fn set_session_tracker(&mut self, tracker: Box<dyn SessionTracker>) {
        self.tracker = Some(tracker);
    }

    // Registration

    /// Register a video and subscribe to its element events.
    ///
    /// Returns `false` (and registers nothing) when the player does not
    /// support this platform or the element is already registered.
    pub fn register(
        &mut self,
        video: Box<dyn VideoInterface>,
        events: &EventTarget<VideoEvent>,
        options: VideoOptions,
    ) -> bool {
        let node = video.element();
        if !video.supports_platform() {
            tracing::debug!(%node, "video platform not supported, skipping");
            return false;
        }
        if find(&self.entries, node).is_some() {
            tracing::warn!(%node, "video registered twice");
            return false;
        }

        let inbox = Rc::clone(&self.inbox);
        let listeners = events.listen_multiple(&VideoEvent::ALL, move |event| {
            inbox.borrow_mut().push_back((node, event));
        });

        self.entries.push(VideoEntry::new(
            video,
            options,
            self.config.visible_percent,
            listeners,
        ));
        if options.autoplay {
            self.vsync.mutate(Mutate::AutoplaySetup(node));
        }
        tracing::debug!(%node, autoplay = options.autoplay, dock = options.dock, "video registered");
        true
    }

    /// Remove a video, drop its event subscriptions and free the docked
    /// slot if it held it.
    pub fn unregister(&mut self, node: NodeId) -> Result<(), VideoError> {
        let Some(index) = self.entries.iter().position(|e| e.element() == node) else {
            tracing::error!(%node, "unregister of unknown video");
            return Err(VideoError::NotRegistered(node));
        };
        self.entries.remove(index);
        self.inbox.borrow_mut().retain(|(n, _)| *n != node);
        self.actions.retain(|(n, _)| *n != node);
        if self.docked == Some(node) {
            self.unregister_docked();
        }
        tracing::debug!(%node, "video unregistered");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_registered(&self, node: NodeId) -> bool {
        find(&self.entries, node).is_some()
    }

    /// Registered entry, logging an error for an unknown video
    pub fn entry(&self, node: NodeId) -> Result<&VideoEntry, VideoError> {
        find(&self.entries, node).ok_or_else(|| {
            tracing::error!(%node, "video is not registered");
            VideoError::NotRegistered(node)
        })
    }

    // Queries

    pub fn playing_state(&self, node: NodeId) -> Result<PlayingState, VideoError> {
        self.entry(node).map(VideoEntry::playing_state)
    }

    /// Whether the user has taken over an autoplaying video
    pub fn user_interacted_with_autoplay(&self, node: NodeId) -> Result<bool, VideoError> {
        self.entry(node).map(VideoEntry::user_interacted)
    }

    pub fn docking_state(&self, node: NodeId) -> Result<DockingState, VideoError> {
        self.entry(node).map(VideoEntry::docking_state)
    }

    pub fn minimize_corner(&self, node: NodeId) -> Result<MinimizeCorner, VideoError> {
        self.entry(node).map(VideoEntry::minimize_corner)
    }

    pub fn is_visible(&self, node: NodeId) -> Result<bool, VideoError> {
        self.entry(node).map(VideoEntry::is_visible)
    }

    pub fn autoplay_overlay(&self, node: NodeId) -> Result<AutoplayOverlay, VideoError> {
        self.entry(node).map(VideoEntry::overlay)
    }

    /// Current inline overrides; an inline video reports the baseline
    pub fn styles(&self, node: NodeId) -> Result<VideoStyles, VideoError> {
        self.entry(node).map(|e| VideoStyles {
            video: e.video_style().clone(),
            mask: e.mask_style().clone(),
        })
    }

    /// The video currently holding the docked slot
    pub fn docked_video(&self) -> Option<NodeId> {
        self.docked
    }

    // Docked slot

    /// The slot is free or already held by `node`
    pub fn can_dock(&self, node: NodeId) -> bool {
        self.docked.is_none_or(|docked| docked == node)
    }

    /// Claim the slot. Returns `false` if another video holds it.
    pub fn register_docked(&mut self, node: NodeId) -> bool {
        if !self.can_dock(node) {
            return false;
        }
        self.docked = Some(node);
        true
    }

    /// Free the slot. Every video must be fully in view again before it
    /// may dock.
    pub fn unregister_docked(&mut self) {
        self.docked = None;
        for entry in &mut self.entries {
            entry.docking.reset_in_view();
        }
    }

    // Host input

    /// Queue a player action. Actions reach the player in call order on
    /// the next mutate phase.
    pub fn invoke_action(&mut self, node: NodeId, action: VideoAction) -> Result<(), VideoError> {
        self.entry(node)?;
        self.actions.push_back((node, action));
        Ok(())
    }

    /// Intersection observer delivery
    pub fn on_intersection(&mut self, node: NodeId, ratio: f64) {
        if find(&self.entries, node).is_none() {
            return;
        }
        self.vsync
            .run(Measure::Visibility(node, ratio), Mutate::Visibility(node));
    }

    /// Position observer delivery; also how scrolling reaches docking
    pub fn on_position_changed(&mut self, node: NodeId, entry: PositionEntry) {
        if !find(&self.entries, node).is_some_and(|e| e.options().dock) {
            return;
        }
        self.vsync
            .run(Measure::Position(node, entry), Mutate::Dock(node));
    }

    /// Viewport size changed: re-measure and re-evaluate docked videos
    pub fn on_viewport_resize(&mut self) {
        for entry in &self.entries {
            if entry.options().dock {
                let node = entry.element();
                self.vsync
                    .run(Measure::Remeasure(node), Mutate::Resize(node));
            }
        }
    }

    /// Pointer input on a video or its drag mask
    pub fn on_pointer(&mut self, node: NodeId, input: PointerInput) -> Result<(), VideoError> {
        self.entry(node)?;
        let wants_tick = find_mut(&mut self.entries, node).is_some_and(|e| e.pointer(input));
        if wants_tick {
            self.vsync.mutate(Mutate::DragTick(node));
        }
        Ok(())
    }

    /// Tap on the autoplay mask
    pub fn on_mask_tapped(&mut self, node: NodeId) -> Result<(), VideoError> {
        self.entry(node)?;
        self.vsync.mutate(Mutate::MaskTapped(node));
        Ok(())
    }

    // Frames

    /// Whether the host should request another animation frame
    pub fn has_pending_frame(&self) -> bool {
        self.vsync.has_pending()
            || !self.inbox.borrow().is_empty()
            || !self.actions.is_empty()
            || self.autoplay.is_probing()
    }

    /// Run one frame: the measure phase, then the mutate phase (element
    /// events first, then player actions, then queued tasks). Tasks queued
    /// while mutating run on the next frame.
    pub fn run_frame(&mut self, now: Duration) {
        self.now = now;
        if let Some(support) = self.autoplay.poll() {
            self.vsync.mutate(Mutate::AutoplayResolved(support));
        }

        let measures = self.vsync.begin_frame();
        if !measures.is_empty() {
            let viewport = self.viewport_size();
            let page_height = self.viewport.scroll_height();
            for task in measures {
                self.run_measure(task, viewport, page_height);
            }
        }

        let mutates = self.vsync.take_mutates();
        self.drain_events();
        self.drain_actions();
        for task in mutates {
            self.run_mutate(task);
        }
    }

    fn viewport_size(&self) -> Size {
        Size::new(self.viewport.width(), self.viewport.height())
    }

    fn run_measure(&mut self, task: Measure, viewport: Size, page_height: f64) {
        match task {
            Measure::Visibility(node, ratio) => {
                if let Some(entry) = find_mut(&mut self.entries, node) {
                    entry.visibility.measure(ratio);
                }
            }
            Measure::Position(node, position) => {
                if let Some(entry) = find_mut(&mut self.entries, node) {
                    entry.docking.set_page_height(page_height);
                    entry.docking.measure(position, viewport);
                }
            }
            Measure::Remeasure(node) => {
                if let Some(entry) = find_mut(&mut self.entries, node) {
                    entry.docking.set_page_height(page_height);
                    entry.docking.remeasure(viewport);
                }
            }
        }
    }

    fn run_mutate(&mut self, task: Mutate) {
        match task {
            Mutate::Visibility(node) => self.commit_visibility(node),
            Mutate::Dock(node) => self.update_docking(node),
            Mutate::Resize(node) => {
                self.undock(node, UndockReason::Resize);
                self.update_docking(node);
            }
            Mutate::DragTick(node) => self.drag_tick(node),
            Mutate::MaskTapped(node) => {
                if let Some(entry) = find_mut(&mut self.entries, node)
                    && entry.mask_tapped()
                {
                    tracing::debug!(%node, "autoplay taken over by user");
                }
            }
            Mutate::AutoplaySetup(node) => {
                let support = self.autoplay.request();
                if let Some(entry) = find_mut(&mut self.entries, node) {
                    entry.apply_autoplay_support(support);
                }
            }
            Mutate::AutoplayResolved(support) => {
                for entry in &mut self.entries {
                    entry.apply_autoplay_support(support);
                }
            }
        }
    }

    fn drain_events(&mut self) {
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some((node, event)) = next else {
                break;
            };
            let Some(entry) = find_mut(&mut self.entries, node) else {
                continue;
            };
            let milestone = entry.handle_event(event);
            let dock = entry.options().dock;
            if let Some(milestone) = milestone {
                self.track(node, milestone);
            }
            if !dock {
                continue;
            }
            match event {
                VideoEvent::Ended => self.undock(node, UndockReason::PlaybackStopped),
                VideoEvent::Load | VideoEvent::Play | VideoEvent::Pause => {
                    self.update_docking(node)
                }
                VideoEvent::Muted | VideoEvent::Unmuted => {}
            }
        }
    }

    fn drain_actions(&mut self) {
        while let Some((node, action)) = self.actions.pop_front() {
            if let Some(entry) = find_mut(&mut self.entries, node) {
                tracing::trace!(%node, ?action, "player action");
                entry.invoke(action);
            }
        }
    }

    fn commit_visibility(&mut self, node: NodeId) {
        let Some(entry) = find_mut(&mut self.entries, node) else {
            return;
        };
        let Some(visible) = entry.visibility.commit() else {
            return;
        };
        tracing::trace!(%node, visible, "visibility changed");
        if let Some(milestone) = entry.visibility_changed(visible) {
            self.track(node, milestone);
        }
    }

    fn track(&mut self, node: NodeId, event: VideoAnalyticsEvent) {
        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };
        let state = find(&self.entries, node)
            .map(VideoEntry::playing_state)
            .unwrap_or_default();
        tracker.track(node, event, state);
    }

    // Docking

    fn update_docking(&mut self, node: NodeId) {
        let can_dock = self.can_dock(node);
        let Some(entry) = find(&self.entries, node) else {
            return;
        };
        if !entry.options().dock {
            return;
        }
        let decision = entry.docking.decide(DockContext {
            loaded: entry.is_loaded(),
            playing: entry.playing_state(),
            can_dock,
        });

        match decision {
            DockDecision::Stay => {}
            DockDecision::Begin => {
                if !self.register_docked(node) {
                    return;
                }
                let direction = self.direction;
                if let Some(entry) = find_mut(&mut self.entries, node) {
                    entry.begin_docking(direction);
                    tracing::debug!(%node, corner = ?entry.minimize_corner(), "docking started");
                }
                self.animate_docking(node);
            }
            DockDecision::Animate => self.animate_docking(node),
            DockDecision::Undock(reason) => self.undock(node, reason),
        }
    }

    fn animate_docking(&mut self, node: NodeId) {
        let Some(entry) = find_mut(&mut self.entries, node) else {
            return;
        };
        if entry.animate_docking(&self.config) {
            tracing::debug!(%node, corner = ?entry.minimize_corner(), "video docked");
            self.track(node, VideoAnalyticsEvent::Docked);
        }
    }

    fn undock(&mut self, node: NodeId, reason: UndockReason) {
        let Some(entry) = find_mut(&mut self.entries, node) else {
            return;
        };
        if entry.docking_state() == DockingState::Inline {
            return;
        }
        let in_view = entry.docking.previously_in_view();
        entry.finish_docking();
        tracing::debug!(%node, ?reason, "video undocked");

        if self.docked == Some(node) {
            self.unregister_docked();
        }
        // A resize re-evaluates the same scroll position right away.
        if reason == UndockReason::Resize
            && let Some(entry) = find_mut(&mut self.entries, node)
        {
            entry.docking.restore_in_view(in_view);
        }
        self.track(node, VideoAnalyticsEvent::Undocked);
    }

    // Drag

    fn drag_tick(&mut self, node: NodeId) {
        let Some(entry) = find_mut(&mut self.entries, node) else {
            return;
        };
        let Some(tick) = entry.drag_tick(self.now, &self.config) else {
            return;
        };
        let needs_tick = entry.drag_needs_tick(&self.config);

        match tick {
            DragTick::Dismissed => {
                entry.pause();
                tracing::debug!(%node, "docked video dismissed");
                self.track(node, VideoAnalyticsEvent::Dismissed);
                self.undock(node, UndockReason::Dismissed);
                return;
            }
            DragTick::Moved(transform) => {
                tracing::trace!(%node, css = %transform.to_css(), "drag");
            }
            DragTick::Snap { corner, .. } => {
                tracing::debug!(%node, ?corner, "snapping to corner");
            }
            DragTick::Snapped(corner) => {
                tracing::debug!(%node, ?corner, "snapped");
            }
            DragTick::Snapping => {}
        }

        if needs_tick {
            self.vsync.mutate(Mutate::DragTick(node));
        }
    }
}

impl std::fmt::Debug for VideoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoManager")
            .field("config", &self.config)
            .field("direction", &self.direction)
            .field("entries", &self.entries)
            .field("docked", &self.docked)
            .field("autoplay", &self.autoplay)
            .finish()
    }
}
