//! Autoplay Support
//!
//! Whether the platform lets a muted video start playing without a user
//! gesture. The answer comes from a one-shot probe: the host creates a
//! hidden muted video, tries to play it and reports whether it stayed
//! playing. The result is cached for the lifetime of the (single-threaded)
//! document process.

use std::cell::Cell;
use std::rc::Rc;

/// Resolution state of the autoplay probe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoplaySupport {
    #[default]
    Unknown,
    Supported,
    Unsupported,
}

impl AutoplaySupport {
    fn from_probe(supported: bool) -> Self {
        if supported {
            AutoplaySupport::Supported
        } else {
            AutoplaySupport::Unsupported
        }
    }
}

thread_local! {
    static SUPPORT: Cell<AutoplaySupport> = const { Cell::new(AutoplaySupport::Unknown) };
}

/// The cached probe result
pub fn cached_support() -> AutoplaySupport {
    SUPPORT.with(Cell::get)
}

/// Forget the cached probe result so the next request probes again.
#[doc(hidden)]
pub fn reset_cache_for_testing() {
    SUPPORT.with(|s| s.set(AutoplaySupport::Unknown));
}

/// Completion handle handed to a probe
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    result: Rc<Cell<Option<bool>>>,
}

impl ProbeReport {
    /// Report the probe outcome. Later calls are ignored.
    pub fn resolve(&self, supported: bool) {
        if self.result.get().is_none() {
            self.result.set(Some(supported));
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result.get().is_some()
    }

    fn get(&self) -> Option<bool> {
        self.result.get()
    }
}

/// Host-side autoplay capability probe
pub trait AutoplayProbe {
    /// Start probing; resolve `report` once the outcome is known (possibly
    /// on a later frame).
    fn start(&mut self, report: ProbeReport);
}

/// Drives the probe at most once and publishes its result to the cache
pub struct AutoplayResolver {
    probe: Option<Box<dyn AutoplayProbe>>,
    pending: Option<ProbeReport>,
}

impl AutoplayResolver {
    /// Without a probe every request resolves to `Unsupported`.
    pub fn new(probe: Option<Box<dyn AutoplayProbe>>) -> Self {
        Self {
            probe,
            pending: None,
        }
    }

    /// Current support, starting the probe on first need
    pub fn request(&mut self) -> AutoplaySupport {
        let cached = cached_support();
        if cached != AutoplaySupport::Unknown {
            return cached;
        }
        if self.pending.is_some() {
            return AutoplaySupport::Unknown;
        }
        match self.probe.as_mut() {
            Some(probe) => {
                let report = ProbeReport::default();
                self.pending = Some(report.clone());
                tracing::debug!("starting autoplay probe");
                probe.start(report);
                // Synchronous probes resolve inside `start`.
                self.poll().unwrap_or(AutoplaySupport::Unknown)
            }
            None => {
                SUPPORT.with(|s| s.set(AutoplaySupport::Unsupported));
                AutoplaySupport::Unsupported
            }
        }
    }

    /// Pick up a probe result that arrived since the last call.
    ///
    /// Returns the support level exactly once, when it resolves.
    pub fn poll(&mut self) -> Option<AutoplaySupport> {
        let supported = self.pending.as_ref()?.get()?;
        self.pending = None;
        let support = AutoplaySupport::from_probe(supported);
        SUPPORT.with(|s| s.set(support));
        tracing::debug!(?support, "autoplay probe resolved");
        Some(support)
    }

    pub fn is_probing(&self) -> bool {
        self.pending.is_some()
    }
}

impl std::fmt::Debug for AutoplayResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoplayResolver")
            .field("has_probe", &self.probe.is_some())
            .field("probing", &self.pending.is_some())
            .finish()
    }
}

/// Overlays shown on an autoplaying interactive video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplayOverlay {
    /// Animated equalizer shown while muted autoplay runs
    pub equalizer: bool,
    /// Transparent mask catching the first tap
    pub mask: bool,
}
