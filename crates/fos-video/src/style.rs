//! Inline style overrides applied to a video element and its drag mask.

use kurbo::Point;

/// Marker present from the start of docking until the video is back inline
pub const DOCKED_CLASS: &str = "fos-video-docked";
/// Marker present while fully minimized in a corner
pub const MINIMIZED_CLASS: &str = "fos-video-minimized";
/// Marker on the drag mask while it mirrors a docked video
pub const MASK_ACTIVE_CLASS: &str = "fos-video-mask-active";

/// `translate(x, y) scale(s)` with a top-left origin, fixed positioning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockTransform {
    pub translate: Point,
    pub scale: f64,
}

impl DockTransform {
    pub fn new(translate: Point, scale: f64) -> Self {
        Self { translate, scale }
    }

    /// CSS text
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

/// Overrides on top of the element's stylesheet styles.
///
/// `ElementStyle::default()` is the untouched baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyle {
    pub transform: Option<DockTransform>,
    /// Transition length for `transform` (ms)
    pub transition_ms: Option<u64>,
    classes: Vec<&'static str>,
}

impl ElementStyle {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(&class)
    }

    pub fn add_class(&mut self, class: &'static str) {
        if !self.has_class(class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| *c != class);
    }

    pub fn classes(&self) -> &[&'static str] {
        &self.classes
    }

    /// Set the transform with no transition
    pub fn set_transform(&mut self, transform: DockTransform) {
        self.transform = Some(transform);
        self.transition_ms = None;
    }

    /// Set the transform, animated over `duration_ms`
    pub fn animate_transform(&mut self, transform: DockTransform, duration_ms: u64) {
        self.transform = Some(transform);
        self.transition_ms = Some(duration_ms);
    }

    /// Back to the baseline
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_baseline(&self) -> bool {
        *self == Self::default()
    }
}
