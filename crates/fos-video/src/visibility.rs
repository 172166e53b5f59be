//! Visibility Tracking
//!
//! Turns intersection ratios into a visible/hidden flag. The ratio is read in
//! a measure phase and the flip, if any, is applied in the following mutate
//! phase.

/// Visible share, in percent, at which a video counts as visible
pub const DEFAULT_VISIBLE_PERCENT: f64 = 75.0;

/// `ratio * 100 >= percent`; a NaN ratio counts as zero.
#[inline]
pub fn is_visible_ratio(ratio: f64, percent: f64) -> bool {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio };
    ratio * 100.0 >= percent
}

/// Per-video visibility state
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    percent: f64,
    visible: bool,
    measured: Option<bool>,
}

impl VisibilityTracker {
    pub fn new(percent: f64) -> Self {
        Self {
            percent,
            visible: false,
            measured: None,
        }
    }

    /// Measure step: record the latest ratio. No effects.
    pub fn measure(&mut self, ratio: f64) {
        self.measured = Some(is_visible_ratio(ratio, self.percent));
    }

    /// Mutate step: commit the measurement.
    ///
    /// Returns the new value only when it differs from the committed one.
    pub fn commit(&mut self) -> Option<bool> {
        let measured = self.measured.take()?;
        if measured == self.visible {
            return None;
        }
        self.visible = measured;
        Some(measured)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBLE_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        assert!(is_visible_ratio(0.75, 75.0));
        assert!(is_visible_ratio(1.0, 75.0));
        assert!(!is_visible_ratio(0.7499, 75.0));
        assert!(!is_visible_ratio(f64::NAN, 75.0));
        assert!(!is_visible_ratio(0.0, 75.0));
    }

    #[test]
    fn test_ratio_sweep() {
        for i in 0..=100 {
            let ratio = f64::from(i) / 100.0;
            assert_eq!(is_visible_ratio(ratio, 75.0), ratio * 100.0 >= 75.0);
        }
    }

    #[test]
    fn test_commit_is_idempotent() {
        let mut tracker = VisibilityTracker::default();

        tracker.measure(0.9);
        assert_eq!(tracker.commit(), Some(true));

        tracker.measure(0.9);
        assert_eq!(tracker.commit(), None);
        assert!(tracker.is_visible());

        tracker.measure(0.2);
        assert_eq!(tracker.commit(), Some(false));
    }

    #[test]
    fn test_commit_without_measure() {
        let mut tracker = VisibilityTracker::default();
        assert_eq!(tracker.commit(), None);
        assert!(!tracker.is_visible());
    }
}
