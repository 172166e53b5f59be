//! Frame Scheduler
//!
//! Two-phase measure/mutate batching. All layout reads of a frame happen in
//! the measure phase, all style and DOM writes in the mutate phase, so a
//! frame never reads layout after writing it.
//!
//! Tasks are plain values; the owner decides what a task means. Queuing a
//! task equal to one already pending coalesces into the pending one.
//!
//! ```text
//!   begin_frame() ──► measures ──► take_mutates() ──► mutates
//!                       │                               │
//!                       └── may queue mutates ──────────┘ (same frame)
//!                                                       └── may queue more ──► next frame
//! ```

/// Measure/mutate task queue driven once per animation frame
#[derive(Debug)]
pub struct Vsync<M, U> {
    measures: Vec<M>,
    mutates: Vec<U>,
    frame: u64,
}

impl<M: PartialEq, U: PartialEq> Vsync<M, U> {
    pub fn new() -> Self {
        Self {
            measures: Vec::new(),
            mutates: Vec::new(),
            frame: 0,
        }
    }

    /// Queue a read-only task. Returns `false` if it coalesced.
    pub fn measure(&mut self, task: M) -> bool {
        if self.measures.contains(&task) {
            return false;
        }
        self.measures.push(task);
        true
    }

    /// Queue a write task. Returns `false` if it coalesced.
    pub fn mutate(&mut self, task: U) -> bool {
        if self.mutates.contains(&task) {
            return false;
        }
        self.mutates.push(task);
        true
    }

    /// Queue a measure and the mutate that consumes its result
    pub fn run(&mut self, measure: M, mutate: U) {
        self.measure(measure);
        self.mutate(mutate);
    }

    /// Start a frame and take its measure tasks
    pub fn begin_frame(&mut self) -> Vec<M> {
        self.frame += 1;
        tracing::trace!(
            frame = self.frame,
            measures = self.measures.len(),
            mutates = self.mutates.len(),
            "vsync frame"
        );
        std::mem::take(&mut self.measures)
    }

    /// Take the mutate tasks of the current frame.
    ///
    /// Must follow [`begin_frame`](Self::begin_frame) and the measure phase.
    pub fn take_mutates(&mut self) -> Vec<U> {
        std::mem::take(&mut self.mutates)
    }

    /// Whether another frame should be requested
    pub fn has_pending(&self) -> bool {
        !self.measures.is_empty() || !self.mutates.is_empty()
    }

    /// Frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl<M: PartialEq, U: PartialEq> Default for Vsync<M, U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalescing() {
        let mut vsync: Vsync<u32, &str> = Vsync::new();
        assert!(vsync.measure(1));
        assert!(!vsync.measure(1));
        assert!(vsync.measure(2));
        assert!(vsync.mutate("tick"));
        assert!(!vsync.mutate("tick"));

        assert_eq!(vsync.begin_frame(), vec![1, 2]);
        assert_eq!(vsync.take_mutates(), vec!["tick"]);
        assert!(!vsync.has_pending());
    }

    #[test]
    fn test_mutates_queued_during_mutate_run_next_frame() {
        let mut vsync: Vsync<(), u32> = Vsync::new();
        vsync.mutate(1);

        vsync.begin_frame();
        for task in vsync.take_mutates() {
            // A self-rescheduling loop
            vsync.mutate(task + 1);
        }
        assert!(vsync.has_pending());
        assert_eq!(vsync.frame_count(), 1);

        vsync.begin_frame();
        assert_eq!(vsync.take_mutates(), vec![2]);
        assert_eq!(vsync.frame_count(), 2);
    }

    #[test]
    fn test_run_queues_both_phases() {
        let mut vsync: Vsync<&str, &str> = Vsync::new();
        vsync.run("read", "write");
        assert_eq!(vsync.begin_frame(), vec!["read"]);
        // measure phase queues a second write
        vsync.mutate("write-2");
        assert_eq!(vsync.take_mutates(), vec!["write", "write-2"]);
    }
}
