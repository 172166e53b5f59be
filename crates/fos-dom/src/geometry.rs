//! Geometry APIs
//!
//! DOMRect, viewport-relative placement and position observer entries.

use kurbo::Point;

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if point is inside
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Check if rects overlap with a non-empty area
    pub fn intersects(&self, other: &DOMRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Get intersection rect
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(DOMRect::from_xywh(x, y, right - x, bottom - y))
    }

    /// Fraction of this rect's area inside `root`, in `0.0..=1.0`.
    ///
    /// Empty rects report `0.0`.
    pub fn intersection_ratio(&self, root: &DOMRect) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.intersection(root)
            .map(|i| (i.area() / area).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// Where this rect sits relative to `viewport`.
    pub fn relative_to(&self, viewport: &DOMRect) -> RelativePosition {
        if self.bottom() <= viewport.top() {
            RelativePosition::Top
        } else if self.top() >= viewport.bottom() {
            RelativePosition::Bottom
        } else {
            RelativePosition::Inside
        }
    }

    /// Same size, moved by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Placement of an element relative to the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelativePosition {
    /// Intersects the viewport
    #[default]
    Inside,
    /// Entirely above the viewport
    Top,
    /// Entirely below the viewport
    Bottom,
}

/// A position observer delivery.
///
/// `position_rect` is `None` while the element is completely off-screen;
/// `relative_pos` still reports which edge it left through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionEntry {
    pub position_rect: Option<DOMRect>,
    pub viewport_rect: DOMRect,
    pub relative_pos: RelativePosition,
}

impl PositionEntry {
    /// Build the entry an observer would deliver for `rect` in `viewport`.
    pub fn observe(rect: DOMRect, viewport: DOMRect) -> Self {
        let relative_pos = rect.relative_to(&viewport);
        let position_rect = match relative_pos {
            RelativePosition::Inside => Some(rect),
            RelativePosition::Top | RelativePosition::Bottom => None,
        };
        Self {
            position_rect,
            viewport_rect: viewport,
            relative_pos,
        }
    }

    /// The observed rect, or a stand-in of `size`'s dimensions placed just
    /// outside the viewport edge named by `relative_pos`.
    pub fn rect_or_outside(&self, size: &DOMRect) -> DOMRect {
        if let Some(rect) = self.position_rect {
            return rect;
        }
        let vp = &self.viewport_rect;
        let y = match self.relative_pos {
            RelativePosition::Top => vp.top() - size.height,
            RelativePosition::Bottom => vp.bottom(),
            // No rect while inside is an observer glitch; park it below.
            RelativePosition::Inside => vp.bottom(),
        };
        DOMRect::from_xywh(size.x, y, size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_contains_point() {
        let rect = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);

        assert!(rect.contains_point(50.0, 50.0));
        assert!(!rect.contains_point(150.0, 50.0));
    }

    #[test]
    fn test_intersects() {
        let rect1 = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let rect2 = DOMRect::from_xywh(50.0, 50.0, 100.0, 100.0);
        let rect3 = DOMRect::from_xywh(200.0, 200.0, 50.0, 50.0);
        let touching = DOMRect::from_xywh(100.0, 0.0, 50.0, 50.0);

        assert!(rect1.intersects(&rect2));
        assert!(!rect1.intersects(&rect3));
        assert!(!rect1.intersects(&touching));
    }

    #[test]
    fn test_intersection_ratio() {
        let viewport = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);

        let inside = DOMRect::from_xywh(100.0, 100.0, 200.0, 100.0);
        assert_eq!(inside.intersection_ratio(&viewport), 1.0);

        let half = DOMRect::from_xywh(0.0, 550.0, 200.0, 100.0);
        assert_eq!(half.intersection_ratio(&viewport), 0.5);

        let empty = DOMRect::from_xywh(0.0, 0.0, 0.0, 0.0);
        assert_eq!(empty.intersection_ratio(&viewport), 0.0);
    }

    #[test]
    fn test_relative_position() {
        let viewport = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);

        assert_eq!(
            DOMRect::from_xywh(0.0, -300.0, 100.0, 200.0).relative_to(&viewport),
            RelativePosition::Top
        );
        assert_eq!(
            DOMRect::from_xywh(0.0, 600.0, 100.0, 200.0).relative_to(&viewport),
            RelativePosition::Bottom
        );
        assert_eq!(
            DOMRect::from_xywh(0.0, -100.0, 100.0, 200.0).relative_to(&viewport),
            RelativePosition::Inside
        );
    }

    #[test]
    fn test_rect_or_outside() {
        let viewport = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);
        let size = DOMRect::from_xywh(40.0, 0.0, 320.0, 180.0);

        let above = PositionEntry::observe(size.translated(0.0, -500.0), viewport);
        assert_eq!(above.position_rect, None);
        let rect = above.rect_or_outside(&size);
        assert_eq!(rect.bottom(), 0.0);
        assert_eq!(rect.x, 40.0);

        let below = PositionEntry::observe(size.translated(0.0, 900.0), viewport);
        assert_eq!(below.rect_or_outside(&size).top(), 600.0);
    }
}
