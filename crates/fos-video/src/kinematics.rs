//! Kinematics
//!
//! Position/velocity bookkeeping for a dragged element: direct following
//! while a pointer holds it, friction-decayed coasting after release.

use kurbo::{Point, Vec2};

/// Linear map of `value` from `[in_a, in_b]` onto `[out_a, out_b]`.
///
/// `value` is clamped to the input range first; a degenerate input range
/// maps everything to `out_b`.
pub fn map_range(value: f64, in_a: f64, in_b: f64, out_a: f64, out_b: f64) -> f64 {
    if in_a == in_b {
        return out_b;
    }
    let (lo, hi) = if in_a < in_b { (in_a, in_b) } else { (in_b, in_a) };
    let t = (value.clamp(lo, hi) - in_a) / (in_b - in_a);
    out_a * (1.0 - t) + out_b * t
}

/// Position and velocity of a moving element (px, px/frame)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    pub position: Point,
    pub previous: Point,
    pub velocity: Vec2,
}

impl Motion {
    /// At rest at `position`
    pub fn at(position: Point) -> Self {
        Self {
            position,
            previous: position,
            velocity: Vec2::ZERO,
        }
    }

    /// Jump to `target`; velocity becomes the distance covered this frame
    pub fn follow(&mut self, target: Point) {
        self.previous = self.position;
        self.position = target;
        self.velocity = self.position - self.previous;
    }

    /// Advance one frame of free motion and decay velocity
    pub fn coast(&mut self, friction: f64) {
        self.previous = self.position;
        self.position += self.velocity;
        self.velocity *= friction;
    }

    /// Both axes below `threshold`
    pub fn is_stopped(&self, threshold: f64) -> bool {
        self.velocity.x.abs() < threshold && self.velocity.y.abs() < threshold
    }

    /// Place at `position` with no velocity
    pub fn settle(&mut self, position: Point) {
        *self = Self::at(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(0.0, 0.0, 200.0, 0.6, 1.0), 0.6);
        assert_eq!(map_range(200.0, 0.0, 200.0, 0.6, 1.0), 1.0);
        assert!((map_range(100.0, 0.0, 200.0, 0.6, 1.0) - 0.8).abs() < 1e-12);
        // clamped
        assert_eq!(map_range(-50.0, 0.0, 200.0, 0.6, 1.0), 0.6);
        assert_eq!(map_range(500.0, 0.0, 200.0, 0.6, 1.0), 1.0);
        // reversed input range
        assert_eq!(map_range(200.0, 200.0, 0.0, 10.0, 20.0), 10.0);
        assert_eq!(map_range(0.0, 200.0, 0.0, 10.0, 20.0), 20.0);
        // degenerate
        assert_eq!(map_range(3.0, 5.0, 5.0, 1.0, 2.0), 2.0);
    }

    #[test]
    fn test_follow_sets_velocity() {
        let mut motion = Motion::at(Point::new(10.0, 10.0));
        motion.follow(Point::new(25.0, 5.0));
        assert_eq!(motion.velocity, Vec2::new(15.0, -5.0));
        assert_eq!(motion.previous, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_coast_decays_until_stopped() {
        let mut motion = Motion::at(Point::ZERO);
        motion.velocity = Vec2::new(40.0, -30.0);

        let mut last = motion.velocity.hypot();
        let mut ticks = 0;
        while !motion.is_stopped(3.0) {
            motion.coast(0.65);
            let speed = motion.velocity.hypot();
            assert!(speed < last, "speed must strictly decrease");
            last = speed;
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(motion.position.x > 0.0);
        assert!(motion.position.y < 0.0);
    }

    #[test]
    fn test_settle() {
        let mut motion = Motion::at(Point::ZERO);
        motion.velocity = Vec2::new(5.0, 5.0);
        motion.settle(Point::new(20.0, 20.0));
        assert!(motion.is_stopped(0.1));
        assert_eq!(motion.previous, motion.position);
    }
}
