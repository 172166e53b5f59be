//! DOM Events
//!
//! Event targets with scoped listeners. Every `listen*` call hands back an
//! [`Unlisten`] guard; dropping the guard (or calling [`Unlisten::unlisten`])
//! removes the listeners it covers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Handler<E> = Rc<dyn Fn(E)>;

struct Registration<E> {
    id: u64,
    kind: E,
    handler: Handler<E>,
}

struct Registry<E> {
    next_id: u64,
    registrations: Vec<Registration<E>>,
}

impl<E> Registry<E> {
    fn remove(&mut self, ids: &[u64]) {
        self.registrations.retain(|r| !ids.contains(&r.id));
    }
}

/// An element (or document) that events are dispatched to
pub struct EventTarget<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: Copy + PartialEq + 'static> EventTarget<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 1,
                registrations: Vec::new(),
            })),
        }
    }

    /// Listen for a single event kind
    pub fn listen(&self, kind: E, handler: impl Fn(E) + 'static) -> Unlisten {
        self.listen_multiple(&[kind], handler)
    }

    /// Listen for several event kinds with one handler.
    ///
    /// The returned guard removes all of them at once.
    pub fn listen_multiple(&self, kinds: &[E], handler: impl Fn(E) + 'static) -> Unlisten {
        let handler: Handler<E> = Rc::new(handler);
        let mut ids = Vec::with_capacity(kinds.len());
        {
            let mut registry = self.registry.borrow_mut();
            for &kind in kinds {
                let id = registry.next_id;
                registry.next_id += 1;
                registry.registrations.push(Registration {
                    id,
                    kind,
                    handler: Rc::clone(&handler),
                });
                ids.push(id);
            }
        }

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Unlisten::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().remove(&ids);
            }
        })
    }

    /// Dispatch an event to every matching listener.
    ///
    /// Returns the number of handlers invoked. Handlers may add or remove
    /// listeners; changes take effect from the next dispatch.
    pub fn dispatch(&self, event: E) -> usize {
        let handlers: Vec<Handler<E>> = self
            .registry
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.kind == event)
            .map(|r| Rc::clone(&r.handler))
            .collect();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of live listener registrations
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().registrations.len()
    }
}

impl<E: Copy + PartialEq + 'static> Default for EventTarget<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventTarget<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.registry.borrow().registrations.len())
            .finish()
    }
}

/// Scoped unsubscribe capability
#[must_use = "dropping an Unlisten removes its listeners immediately"]
pub struct Unlisten {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Unlisten {
    fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// Combine several guards into one
    pub fn merge(guards: impl IntoIterator<Item = Unlisten>) -> Self {
        let guards: Vec<Unlisten> = guards.into_iter().collect();
        Self::new(move || drop(guards))
    }

    /// Remove the listeners now
    pub fn unlisten(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for Unlisten {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Unlisten {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unlisten")
            .field("active", &self.cleanup.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Play,
        Pause,
        Ended,
    }

    #[test]
    fn test_listen_and_dispatch() {
        let target = EventTarget::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        let _guard = target.listen(Kind::Play, move |_| h.set(h.get() + 1));

        assert_eq!(target.dispatch(Kind::Play), 1);
        assert_eq!(target.dispatch(Kind::Pause), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listen_multiple_single_unlisten() {
        let target = EventTarget::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&seen);
        let guard = target.listen_multiple(&[Kind::Play, Kind::Pause], move |k| {
            s.borrow_mut().push(k);
        });
        assert_eq!(target.listener_count(), 2);

        target.dispatch(Kind::Play);
        target.dispatch(Kind::Pause);
        target.dispatch(Kind::Ended);
        assert_eq!(*seen.borrow(), vec![Kind::Play, Kind::Pause]);

        guard.unlisten();
        assert_eq!(target.listener_count(), 0);
        target.dispatch(Kind::Play);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let target = EventTarget::new();
        {
            let _a = target.listen(Kind::Play, |_| {});
            let _b = target.listen(Kind::Ended, |_| {});
            assert_eq!(target.listener_count(), 2);
        }
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn test_merge() {
        let target = EventTarget::new();
        let merged = Unlisten::merge([
            target.listen(Kind::Play, |_| {}),
            target.listen(Kind::Pause, |_| {}),
        ]);
        assert_eq!(target.listener_count(), 2);
        drop(merged);
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn test_guard_outlives_target() {
        let target = EventTarget::new();
        let guard = target.listen(Kind::Play, |_| {});
        drop(target);
        drop(guard);
    }
}
