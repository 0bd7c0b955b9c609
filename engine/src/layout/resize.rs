// Resize notifications with explicit unsubscription.
//
// Listeners are held weakly: a dropped controller is skipped and pruned on the
// next notification instead of being called after disposal.
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

pub trait ResizeListener {
    fn on_resize(&mut self, content_width: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct ResizeSignal {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Weak<RefCell<dyn ResizeListener>>)>,
}

impl ResizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L: ResizeListener + 'static>(&mut self, listener: &Rc<RefCell<L>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let listener: Rc<RefCell<dyn ResizeListener>> = listener.clone();
        let weak = Rc::downgrade(&listener);
        self.listeners.push((id, weak));
        id
    }

    /// Returns false if the id was not (or no longer) registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers `content_width` synchronously to every live listener and
    /// returns how many were called.
    pub fn notify(&mut self, content_width: f64) -> usize {
        self.listeners.retain(|(_, weak)| weak.strong_count() > 0);

        let mut delivered = 0;
        for (id, weak) in &self.listeners {
            let Some(listener) = weak.upgrade() else { continue };
            let borrowed = listener.try_borrow_mut();
            match borrowed {
                Ok(mut target) => {
                    target.on_resize(content_width);
                    delivered += 1;
                }
                // Listener is mid-update further up the stack
                Err(_) => warn!(?id, "skipping re-entrant resize notification"),
            };
        }
        debug!(content_width, delivered, "resize notified");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        widths: Vec<f64>,
    }

    impl ResizeListener for Recorder {
        fn on_resize(&mut self, content_width: f64) {
            self.widths.push(content_width);
        }
    }

    #[test]
    fn test_notify_reaches_subscribers() {
        let mut signal = ResizeSignal::new();
        let a = Rc::new(RefCell::new(Recorder::default()));
        let b = Rc::new(RefCell::new(Recorder::default()));
        signal.subscribe(&a);
        signal.subscribe(&b);

        assert_eq!(signal.notify(640.0), 2);
        assert_eq!(a.borrow().widths, vec![640.0]);
        assert_eq!(b.borrow().widths, vec![640.0]);
    }

    #[test]
    fn test_subscription_does_not_own_listener() {
        let mut signal = ResizeSignal::new();
        let a = Rc::new(RefCell::new(Recorder::default()));
        signal.subscribe(&a);
        assert_eq!(Rc::strong_count(&a), 1);
        assert_eq!(Rc::weak_count(&a), 1);

        // repeated delivery releases each borrow before the next
        assert_eq!(signal.notify(300.0), 1);
        assert_eq!(signal.notify(310.0), 1);
        assert_eq!(a.borrow().widths, vec![300.0, 310.0]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut signal = ResizeSignal::new();
        let a = Rc::new(RefCell::new(Recorder::default()));
        let id = signal.subscribe(&a);

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        assert_eq!(signal.notify(640.0), 0);
        assert!(a.borrow().widths.is_empty());
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let mut signal = ResizeSignal::new();
        let a = Rc::new(RefCell::new(Recorder::default()));
        signal.subscribe(&a);
        drop(a);

        assert_eq!(signal.notify(100.0), 0);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_borrowed_listener_is_skipped() {
        let mut signal = ResizeSignal::new();
        let a = Rc::new(RefCell::new(Recorder::default()));
        signal.subscribe(&a);

        let guard = a.borrow_mut();
        assert_eq!(signal.notify(100.0), 0);
        drop(guard);
        assert!(a.borrow().widths.is_empty());
    }
}
