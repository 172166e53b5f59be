//! Docking
//!
//! Minimizes a manually playing video into a viewport corner once it has
//! been scrolled out of view, and brings it back inline when it scrolls back.
//!
//! ```text
//!   Inline ──(fully out of view, eligible)──► Docking ──(scale == dock scale)──► Docked
//!     ▲                                          │                                  │
//!     └──────────(back in view / stopped / dismissed / resize)─────────────────────┘
//! ```
//!
//! Docking only begins once the video is fully out of view, where the
//! scroll-linked scale is already at its minimum, so Docking settles into
//! Docked within the same frame. The interpolation is what animates the video
//! while a docked video is partly scrolled back.
//!
//! While not inline the video is fixed-positioned with a top-left transform
//! origin. Its scale and translation are linear in the height of the inline
//! box still visible in the viewport: fully visible maps to the inline
//! geometry, fully hidden maps to the minimized corner geometry.

use fos_dom::{DOMRect, PositionEntry, RelativePosition};
use kurbo::{Point, Size};

use crate::config::DockingConfig;
use crate::element::{PageDirection, PlayingState};
use crate::kinematics::map_range;
use crate::style::DockTransform;

/// Docking lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DockingState {
    #[default]
    Inline,
    Docking,
    Docked,
}

/// Corner a video minimizes into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MinimizeCorner {
    #[default]
    Inline,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl MinimizeCorner {
    pub fn from_sides(top: bool, left: bool) -> Self {
        match (top, left) {
            (true, true) => MinimizeCorner::TopLeft,
            (true, false) => MinimizeCorner::TopRight,
            (false, true) => MinimizeCorner::BottomLeft,
            (false, false) => MinimizeCorner::BottomRight,
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, MinimizeCorner::TopLeft | MinimizeCorner::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, MinimizeCorner::TopLeft | MinimizeCorner::BottomLeft)
    }
}

/// Why a video goes back inline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndockReason {
    /// Scrolled fully back into view
    BackInView,
    /// Playback ended or was taken over by autoplay
    PlaybackStopped,
    /// Flung off-screen by the user
    Dismissed,
    /// The viewport changed size; geometry is re-measured
    Resize,
    /// The video is no longer eligible (too tall, unloaded, removed)
    Ineligible,
}

/// Outcome of evaluating the latest position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DockDecision {
    /// Nothing to do
    Stay,
    /// Claim the docked slot and start docking
    Begin,
    /// Apply the scroll-linked transform
    Animate,
    /// Return inline
    Undock(UndockReason),
}

/// Inputs owned by the entry/manager rather than the docking geometry
#[derive(Debug, Clone, Copy)]
pub struct DockContext {
    pub loaded: bool,
    pub playing: PlayingState,
    /// The manager's docked slot is free or already ours
    pub can_dock: bool,
}

/// Scale of a video with `visible_height` of its `height` on screen
pub fn dock_scale(visible_height: f64, height: f64, config: &DockingConfig) -> f64 {
    map_range(visible_height, 0.0, height, config.dock_scale, 1.0)
}

/// Top-left of a `scaled` box minimized into `corner` of `viewport`
pub fn corner_position(
    corner: MinimizeCorner,
    viewport: Size,
    scaled: Size,
    margin: f64,
) -> Point {
    let x = if corner.is_left() {
        margin
    } else {
        viewport.width - scaled.width - margin
    };
    let y = if corner.is_top() {
        margin
    } else {
        viewport.height - scaled.height - margin
    };
    Point::new(x, y)
}

/// Scroll-linked transform for a video whose inline box is `initial`
/// (viewport coordinates) with `visible_height` of it on screen, overlapping
/// the top viewport edge if `from_top` and the bottom edge otherwise.
pub fn docking_transform(
    corner: MinimizeCorner,
    from_top: bool,
    visible_height: f64,
    initial: &DOMRect,
    viewport: Size,
    config: &DockingConfig,
) -> DockTransform {
    let height = initial.height;
    let scale = dock_scale(visible_height, height, config);
    let scaled = Size::new(initial.width * config.dock_scale, height * config.dock_scale);
    let target = corner_position(corner, viewport, scaled, config.dock_margin);

    // Fully visible against the edge the video overlaps.
    let inline_top = if from_top {
        0.0
    } else {
        viewport.height - height
    };
    let x = map_range(visible_height, height, 0.0, initial.x, target.x);
    let y = map_range(visible_height, height, 0.0, inline_top, target.y);

    DockTransform::new(Point::new(x, y), scale)
}

/// Docking state of one video
#[derive(Debug, Clone, Default)]
pub struct Docking {
    state: DockingState,
    corner: MinimizeCorner,
    /// Horizontal side, fixed by the first docking and by user drags
    left_side: Option<bool>,
    /// Inline box in viewport coordinates at capture time
    initial_rect: Option<DOMRect>,
    viewport: Size,
    visible_height: f64,
    relative_pos: RelativePosition,
    /// Edge the inline box last overlapped or left through
    from_top: bool,
    /// Document scroll height; `None` until measured
    page_height: Option<f64>,
    previously_in_view: bool,
    last_position: Option<PositionEntry>,
}

impl Docking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DockingState {
        self.state
    }

    pub fn corner(&self) -> MinimizeCorner {
        self.corner
    }

    pub fn initial_rect(&self) -> Option<DOMRect> {
        self.initial_rect
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn visible_height(&self) -> f64 {
        self.visible_height
    }

    pub fn previously_in_view(&self) -> bool {
        self.previously_in_view
    }

    pub fn last_position(&self) -> Option<PositionEntry> {
        self.last_position
    }

    /// The inline box is entirely on screen
    pub fn fully_in_view(&self) -> bool {
        self.initial_rect
            .is_some_and(|r| self.visible_height.ceil() >= r.height)
    }

    /// Forget that the video was ever fully in view
    pub fn reset_in_view(&mut self) {
        self.previously_in_view = false;
    }

    pub(crate) fn restore_in_view(&mut self, in_view: bool) {
        self.previously_in_view = in_view;
    }

    /// Measure step: record the document scroll height.
    pub fn set_page_height(&mut self, page_height: f64) {
        self.page_height = Some(page_height);
    }

    /// Whether scrolling can move the inline box out of the viewport
    pub fn can_scroll_out(&self) -> bool {
        let Some(initial) = self.initial_rect else {
            return false;
        };
        initial.height < self.viewport.height
            && self.page_height.is_none_or(|h| h > self.viewport.height)
    }

    /// Measure step: take a position observer delivery.
    pub fn measure(&mut self, entry: PositionEntry, viewport: Size) {
        self.last_position = Some(entry);
        self.viewport = viewport;
        self.relative_pos = entry.relative_pos;

        if self.initial_rect.is_none() {
            self.capture_rect();
        }
        let Some(initial) = self.initial_rect else {
            self.visible_height = 0.0;
            return;
        };

        let vp = entry.viewport_rect;
        let rect = entry.rect_or_outside(&initial.translated(vp.x, vp.y));
        let visible = if rect.top() <= vp.top() {
            self.from_top = true;
            rect.bottom() - vp.top()
        } else if rect.bottom() >= vp.bottom() {
            self.from_top = false;
            vp.bottom() - rect.top()
        } else {
            rect.height
        };
        self.visible_height = visible.clamp(0.0, initial.height);

        if self.fully_in_view() {
            self.previously_in_view = true;
        }
    }

    /// Re-capture the inline box from the last delivery after a viewport
    /// change. An off-screen delivery has no rect, so the previous box is kept.
    pub fn remeasure(&mut self, viewport: Size) {
        let Some(entry) = self.last_position else {
            self.viewport = viewport;
            return;
        };
        if entry.position_rect.is_some() {
            self.initial_rect = None;
        }
        self.measure(entry, viewport);
    }

    fn capture_rect(&mut self) {
        let Some(entry) = self.last_position else {
            return;
        };
        if let Some(rect) = entry.position_rect {
            let vp = entry.viewport_rect;
            self.initial_rect = Some(rect.translated(-vp.x, -vp.y));
        }
    }

    /// Mutate step: decide what the latest measurement means.
    pub fn decide(&self, ctx: DockContext) -> DockDecision {
        let docked = self.state != DockingState::Inline;
        // A video as tall as the viewport, or a page that does not scroll,
        // can never hide the video.
        if !ctx.loaded || !self.can_scroll_out() {
            return if docked {
                DockDecision::Undock(UndockReason::Ineligible)
            } else {
                DockDecision::Stay
            };
        }

        match ctx.playing {
            PlayingState::PlayingManual => {}
            // Paused while docked keeps animating so undocking can finish.
            PlayingState::Paused if docked => {}
            PlayingState::Paused => return DockDecision::Stay,
            PlayingState::PlayingAuto => {
                return if docked {
                    DockDecision::Undock(UndockReason::PlaybackStopped)
                } else {
                    DockDecision::Stay
                };
            }
        }

        if docked {
            if self.fully_in_view() {
                DockDecision::Undock(UndockReason::BackInView)
            } else {
                DockDecision::Animate
            }
        } else {
            let out_of_view = self.relative_pos != RelativePosition::Inside;
            if out_of_view
                && self.previously_in_view
                && ctx.playing == PlayingState::PlayingManual
                && ctx.can_dock
            {
                DockDecision::Begin
            } else {
                DockDecision::Stay
            }
        }
    }

    /// Inline → Docking. Picks the corner from the exit edge and the
    /// (frozen) horizontal side.
    pub fn begin(&mut self, direction: PageDirection) {
        debug_assert_eq!(self.state, DockingState::Inline, "begin docking twice");
        let left = *self
            .left_side
            .get_or_insert(direction == PageDirection::Rtl);
        let top = self.relative_pos == RelativePosition::Top;
        self.corner = MinimizeCorner::from_sides(top, left);
        self.state = DockingState::Docking;
    }

    /// Current scroll-linked transform, if docking or docked
    pub fn transform(&self, config: &DockingConfig) -> Option<DockTransform> {
        if self.state == DockingState::Inline {
            return None;
        }
        let initial = self.initial_rect?;
        Some(docking_transform(
            self.corner,
            self.from_top,
            self.visible_height,
            &initial,
            self.viewport,
            config,
        ))
    }

    /// Docking → Docked once fully minimized. Returns whether it moved.
    pub fn settle_if_minimized(&mut self, config: &DockingConfig) -> bool {
        if self.state != DockingState::Docking {
            return false;
        }
        let Some(initial) = self.initial_rect else {
            return false;
        };
        if dock_scale(self.visible_height, initial.height, config) <= config.dock_scale {
            self.state = DockingState::Docked;
            return true;
        }
        false
    }

    /// A user drag moved the docked video to `corner`
    pub fn pin_corner(&mut self, corner: MinimizeCorner) {
        if self.state == DockingState::Inline || corner == MinimizeCorner::Inline {
            return;
        }
        self.corner = corner;
        self.left_side = Some(corner.is_left());
    }

    /// Back to inline
    pub fn reset(&mut self) {
        self.state = DockingState::Inline;
        self.corner = MinimizeCorner::Inline;
    }

    /// Size of the inline box at `scale`
    pub fn scaled_size(&self, scale: f64) -> Option<Size> {
        self.initial_rect
            .map(|r| Size::new(r.width * scale, r.height * scale))
    }

    /// Scaled size of the minimized video
    pub fn minimized_size(&self, config: &DockingConfig) -> Option<Size> {
        self.scaled_size(config.dock_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(400.0, 800.0);

    fn viewport_rect() -> DOMRect {
        DOMRect::from_xywh(0.0, 0.0, VIEWPORT.width, VIEWPORT.height)
    }

    fn at(y: f64) -> PositionEntry {
        PositionEntry::observe(DOMRect::from_xywh(40.0, y, 320.0, 200.0), viewport_rect())
    }

    fn manual() -> DockContext {
        DockContext {
            loaded: true,
            playing: PlayingState::PlayingManual,
            can_dock: true,
        }
    }

    #[test]
    fn test_scale_endpoints() {
        let config = DockingConfig::default();
        assert_eq!(dock_scale(0.0, 200.0, &config), 0.6);
        assert_eq!(dock_scale(200.0, 200.0, &config), 1.0);
        let mut last = 0.0;
        for h in 0..=200 {
            let s = dock_scale(f64::from(h), 200.0, &config);
            assert!(s >= last - 1e-12);
            last = s;
        }
    }

    #[test]
    fn test_corner_positions() {
        let scaled = Size::new(192.0, 120.0);
        assert_eq!(
            corner_position(MinimizeCorner::TopLeft, VIEWPORT, scaled, 20.0),
            Point::new(20.0, 20.0)
        );
        assert_eq!(
            corner_position(MinimizeCorner::BottomRight, VIEWPORT, scaled, 20.0),
            Point::new(188.0, 660.0)
        );
    }

    #[test]
    fn test_transform_interpolates_from_inline() {
        let config = DockingConfig::default();
        let initial = DOMRect::from_xywh(40.0, 0.0, 320.0, 200.0);

        let inline =
            docking_transform(MinimizeCorner::TopRight, true, 200.0, &initial, VIEWPORT, &config);
        assert_eq!(inline.scale, 1.0);
        assert_eq!(inline.translate, Point::new(40.0, 0.0));

        let minimized =
            docking_transform(MinimizeCorner::TopRight, true, 0.0, &initial, VIEWPORT, &config);
        assert_eq!(minimized.scale, 0.6);
        assert!((minimized.translate.x - (400.0 - 192.0 - 20.0)).abs() < 1e-9);
        assert!((minimized.translate.y - 20.0).abs() < 1e-9);

        let bottom =
            docking_transform(MinimizeCorner::BottomLeft, false, 200.0, &initial, VIEWPORT, &config);
        assert_eq!(bottom.translate, Point::new(40.0, 600.0));
    }

    #[test]
    fn test_start_follows_edge_not_corner() {
        let config = DockingConfig::default();
        let initial = DOMRect::from_xywh(40.0, 0.0, 320.0, 200.0);

        // Left through the top, since moved to a bottom corner
        let t = docking_transform(MinimizeCorner::BottomLeft, true, 190.0, &initial, VIEWPORT, &config);
        let target_y = VIEWPORT.height - 120.0 - 20.0;
        assert!((t.translate.y - target_y * 10.0 / 200.0).abs() < 1e-9);
        assert!(t.translate.y < 100.0);
    }

    #[test]
    fn test_visible_height() {
        let mut docking = Docking::new();
        docking.measure(at(100.0), VIEWPORT);
        assert_eq!(docking.visible_height(), 200.0);
        assert!(docking.previously_in_view());

        docking.measure(at(-50.0), VIEWPORT);
        assert_eq!(docking.visible_height(), 150.0);

        docking.measure(at(700.0), VIEWPORT);
        assert_eq!(docking.visible_height(), 100.0);

        // off-screen: no rect, synthesized just outside
        docking.measure(at(-400.0), VIEWPORT);
        assert_eq!(docking.visible_height(), 0.0);
    }

    #[test]
    fn test_docks_only_after_full_view() {
        let mut docking = Docking::new();
        // first seen partially, then scrolled off the top
        docking.measure(at(-50.0), VIEWPORT);
        docking.measure(at(-400.0), VIEWPORT);
        assert_eq!(docking.decide(manual()), DockDecision::Stay);

        docking.measure(at(100.0), VIEWPORT);
        docking.measure(at(-400.0), VIEWPORT);
        assert_eq!(docking.decide(manual()), DockDecision::Begin);
    }

    #[test]
    fn test_begin_and_settle() {
        let config = DockingConfig::default();
        let mut docking = Docking::new();
        docking.measure(at(100.0), VIEWPORT);
        docking.measure(at(-400.0), VIEWPORT);
        docking.begin(PageDirection::Ltr);
        assert_eq!(docking.state(), DockingState::Docking);
        assert_eq!(docking.corner(), MinimizeCorner::TopRight);
        // Already at the minimum scale on the first Docking frame
        assert_eq!(docking.transform(&config).map(|t| t.scale), Some(config.dock_scale));
        assert!(docking.settle_if_minimized(&config));
        assert_eq!(docking.state(), DockingState::Docked);
    }

    #[test]
    fn test_rtl_docks_left_and_side_is_frozen() {
        let mut docking = Docking::new();
        docking.measure(at(100.0), VIEWPORT);
        docking.measure(at(900.0), VIEWPORT);
        docking.begin(PageDirection::Rtl);
        assert_eq!(docking.corner(), MinimizeCorner::BottomLeft);

        docking.pin_corner(MinimizeCorner::TopRight);
        docking.reset();
        assert_eq!(docking.corner(), MinimizeCorner::Inline);

        docking.measure(at(100.0), VIEWPORT);
        docking.measure(at(-400.0), VIEWPORT);
        docking.begin(PageDirection::Rtl);
        assert_eq!(docking.corner(), MinimizeCorner::TopRight);
    }

    #[test]
    fn test_undock_when_back_in_view() {
        let mut docking = Docking::new();
        docking.measure(at(100.0), VIEWPORT);
        docking.measure(at(-400.0), VIEWPORT);
        docking.begin(PageDirection::Ltr);

        docking.measure(at(-100.0), VIEWPORT);
        assert_eq!(docking.decide(manual()), DockDecision::Animate);

        let paused = DockContext {
            playing: PlayingState::Paused,
            ..manual()
        };
        assert_eq!(docking.decide(paused), DockDecision::Animate);

        docking.measure(at(10.0), VIEWPORT);
        assert_eq!(
            docking.decide(manual()),
            DockDecision::Undock(UndockReason::BackInView)
        );
    }

    #[test]
    fn test_tall_video_never_docks() {
        let mut docking = Docking::new();
        let tall = DOMRect::from_xywh(0.0, 0.0, 400.0, 800.0);
        docking.measure(PositionEntry::observe(tall, viewport_rect()), VIEWPORT);
        docking.measure(
            PositionEntry::observe(tall.translated(0.0, -900.0), viewport_rect()),
            VIEWPORT,
        );
        assert_eq!(docking.decide(manual()), DockDecision::Stay);
    }

    #[test]
    fn test_unscrollable_page_never_docks() {
        let mut docking = Docking::new();
        docking.set_page_height(VIEWPORT.height);
        docking.measure(at(100.0), VIEWPORT);
        docking.measure(at(-400.0), VIEWPORT);
        assert!(!docking.can_scroll_out());
        assert_eq!(docking.decide(manual()), DockDecision::Stay);

        docking.set_page_height(3000.0);
        assert_eq!(docking.decide(manual()), DockDecision::Begin);
    }

    #[test]
    fn test_busy_slot_blocks_docking() {
        let mut docking = Docking::new();
        docking.measure(at(100.0), VIEWPORT);
        docking.measure(at(-400.0), VIEWPORT);
        let blocked = DockContext {
            can_dock: false,
            ..manual()
        };
        assert_eq!(docking.decide(blocked), DockDecision::Stay);
    }

    #[test]
    fn test_remeasure_recaptures_rect() {
        let mut docking = Docking::new();
        docking.measure(at(100.0), VIEWPORT);
        let wide = Size::new(1000.0, 800.0);
        docking.remeasure(wide);
        assert_eq!(docking.viewport(), wide);
        assert!(docking.initial_rect().is_some());

        docking.measure(at(-400.0), VIEWPORT);
        docking.remeasure(VIEWPORT);
        assert_eq!(
            docking.initial_rect(),
            Some(DOMRect::from_xywh(40.0, 100.0, 320.0, 200.0))
        );
        assert_eq!(docking.visible_height(), 0.0);
    }
}
