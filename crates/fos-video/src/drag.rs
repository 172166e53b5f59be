//! Drag Controller
//!
//! Lets the user move a docked video around: it follows the pointer while
//! held, coasts with friction after release, snaps into the nearest corner
//! once it slows down, and is dismissed when flung off-screen.
//!
//! The controller is ticked once per frame from a mutate phase for as long
//! as [`DragSession::needs_tick`] holds.

use std::time::Duration;

use kurbo::{Point, Size, Vec2};

use crate::config::DockingConfig;
use crate::docking::{MinimizeCorner, corner_position};
use crate::kinematics::Motion;
use crate::style::DockTransform;

/// Pointer (mouse or touch) input on the video or its mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Point),
    Move(Point),
    Up,
}

/// Result of one drag tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTick {
    /// Apply directly (no transition) to the video and the mask
    Moved(DockTransform),
    /// Animate into `corner` over `duration_ms`
    Snap {
        corner: MinimizeCorner,
        transform: DockTransform,
        duration_ms: u64,
    },
    /// Snap transition still running
    Snapping,
    /// Snap transition finished
    Snapped(MinimizeCorner),
    /// Flung off-screen: pause and undock
    Dismissed,
}

/// Corner whose quadrant contains `center`
pub fn nearest_corner(center: Point, viewport: Size) -> MinimizeCorner {
    MinimizeCorner::from_sides(
        center.y < viewport.height / 2.0,
        center.x < viewport.width / 2.0,
    )
}

/// Drag state of the docked video
#[derive(Debug, Clone)]
pub struct DragSession {
    mouse: Point,
    displacement: Vec2,
    motion: Motion,
    /// Displayed size of the video
    size: Size,
    /// Displayed scale of the video
    scale: f64,
    is_touched: bool,
    is_dragging: bool,
    is_snapping: bool,
    is_dismissed: bool,
    snap_corner: MinimizeCorner,
    snap_until: Duration,
}

impl DragSession {
    /// A session for a video shown at `transform` with `size`
    pub fn new(transform: DockTransform, size: Size) -> Self {
        Self {
            mouse: transform.translate,
            displacement: Vec2::ZERO,
            motion: Motion::at(transform.translate),
            size,
            scale: transform.scale,
            is_touched: false,
            is_dragging: false,
            is_snapping: false,
            is_dismissed: false,
            snap_corner: MinimizeCorner::Inline,
            snap_until: Duration::ZERO,
        }
    }

    pub fn position(&self) -> Point {
        self.motion.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.motion.velocity
    }

    pub fn is_touched(&self) -> bool {
        self.is_touched
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_snapping(&self) -> bool {
        self.is_snapping
    }

    pub fn is_dismissed(&self) -> bool {
        self.is_dismissed
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Follow a transform applied from outside the session (scroll-linked
    /// docking). Ignored while the session owns the position.
    pub fn place(&mut self, transform: DockTransform, size: Size, config: &DockingConfig) {
        if self.needs_tick(config) {
            return;
        }
        self.motion.settle(transform.translate);
        self.mouse = transform.translate;
        self.scale = transform.scale;
        self.size = size;
    }

    pub fn center(&self) -> Point {
        self.motion.position + Vec2::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Whether the per-frame loop has work left
    pub fn needs_tick(&self, config: &DockingConfig) -> bool {
        self.is_touched
            || self.is_dragging
            || self.is_snapping
            || !self.motion.is_stopped(config.stop_threshold)
    }

    /// Feed pointer input. Returns `true` if the tick loop should run.
    pub fn pointer(&mut self, input: PointerInput) -> bool {
        match input {
            PointerInput::Down(at) => {
                if self.is_snapping {
                    return false;
                }
                self.is_touched = true;
                self.mouse = at;
                self.displacement = at - self.motion.position;
                self.motion.velocity = Vec2::ZERO;
                true
            }
            PointerInput::Move(at) => {
                if !self.is_touched {
                    return false;
                }
                self.mouse = at;
                self.is_dragging = true;
                true
            }
            PointerInput::Up => {
                let was_touched = self.is_touched;
                self.is_touched = false;
                self.is_dragging = false;
                was_touched
            }
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, now: Duration, viewport: Size, config: &DockingConfig) -> DragTick {
        if self.is_snapping {
            if now < self.snap_until {
                return DragTick::Snapping;
            }
            self.is_snapping = false;
            return DragTick::Snapped(self.snap_corner);
        }

        let held = self.is_touched || self.is_dragging;
        if held {
            self.motion.follow(self.mouse - self.displacement);
        } else {
            self.motion.coast(config.friction);
        }

        let center = self.center();
        let on_screen = center.x >= 0.0
            && center.x <= viewport.width
            && center.y >= 0.0
            && center.y <= viewport.height;
        if held {
            self.is_dismissed = !on_screen;
        } else if !on_screen {
            self.is_dismissed = true;
        }

        if self.is_dismissed && !held {
            return DragTick::Dismissed;
        }

        if !held && self.motion.is_stopped(config.stop_threshold) {
            let corner = nearest_corner(center, viewport);
            let target = corner_position(corner, viewport, self.size, config.dock_margin);
            self.motion.settle(target);
            self.is_snapping = true;
            self.snap_corner = corner;
            self.snap_until = now + Duration::from_millis(config.snap_duration);
            return DragTick::Snap {
                corner,
                transform: DockTransform::new(target, self.scale),
                duration_ms: config.snap_duration,
            };
        }

        DragTick::Moved(DockTransform::new(self.motion.position, self.scale))
    }
}
