use std::cell::Cell;
use std::rc::Rc;

/// Disposer returned by every listener registration.
///
/// Disposing is idempotent. Clones share the same flag, so the registry and
/// the caller observe the same state. Listeners run on the host's event
/// thread, so the handle is neither `Send` nor `Sync`.
#[derive(Clone, Debug, Default)]
#[must_use = "dropping a Subscription without disposing leaves the listener attached"]
pub struct Subscription {
    disposed: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.disposed.set(true);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// Listener registry. Disposed listeners are dropped on the next emit.
pub struct Listeners<E> {
    entries: Vec<(Subscription, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("attached", &self.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let subscription = Subscription::new();
        self.entries
            .push((subscription.clone(), Box::new(listener)));
        subscription
    }

    pub fn emit(&mut self, event: &E) {
        self.entries.retain(|(sub, _)| !sub.is_disposed());
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    /// Listeners that have not been disposed.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(sub, _)| !sub.is_disposed())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispose_all(&mut self) {
        for (sub, _) in self.entries.drain(..) {
            sub.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn disposed_listener_stops_receiving() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        let sink = Rc::clone(&seen);
        let sub = listeners.subscribe(move |value: &u32| sink.borrow_mut().push(*value));

        listeners.emit(&1);
        sub.dispose();
        listeners.emit(&2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert!(listeners.is_empty());
        assert!(sub.is_disposed());
    }

    #[test]
    fn dispose_all_marks_every_handle() {
        let mut listeners: Listeners<()> = Listeners::new();
        let a = listeners.subscribe(|_| {});
        let b = listeners.subscribe(|_| {});
        assert_eq!(listeners.len(), 2);

        listeners.dispose_all();
        assert!(a.is_disposed());
        assert!(b.is_disposed());
        assert!(listeners.is_empty());
    }

    #[test]
    fn clones_share_one_flag() {
        let mut listeners: Listeners<()> = Listeners::new();
        let sub = listeners.subscribe(|_| {});
        let copy = sub.clone();

        copy.dispose();
        copy.dispose();
        assert!(sub.is_disposed());
        assert!(listeners.is_empty());
    }
}
