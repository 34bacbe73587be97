use std::fmt;

use crate::data::ModelEvent;

/// Handle returned on registration, used to unregister later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered list of callbacks owned by a single model instance.
///
/// Callbacks run synchronously, in registration order, on the thread calling
/// `notify`. A panicking callback is not caught here: whoever triggered the
/// notification sees it.
pub struct Listeners<T: ?Sized> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<T: ?Sized> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&T) + 'static,
    {
        self.add_boxed(Box::new(listener))
    }

    pub fn add_boxed(&mut self, listener: Box<dyn FnMut(&T)>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not registered (or already removed).
    pub fn remove(&mut self, id: ListenerId) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn notify(&mut self, value: &T) {
        for (_, listener) in self.entries.iter_mut() {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Capability shared by anything a view can observe through `ModelEvent`s.
pub trait Model {
    fn notify_changed(&mut self, event: &ModelEvent);
    fn add_model_listener(&mut self, listener: Box<dyn FnMut(&ModelEvent)>) -> ListenerId;
    fn remove_model_listener(&mut self, id: ListenerId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::Listeners;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn notify_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::<u32>::new();
        for tag in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            listeners.add(move |value: &u32| seen.borrow_mut().push((tag, *value)));
        }
        listeners.notify(&7);
        assert_eq!(
            *seen.borrow(),
            [("first", 7), ("second", 7), ("third", 7)]
        );
    }

    #[test]
    fn remove_only_drops_the_given_listener() {
        let calls = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::<str>::new();
        let kept = Rc::clone(&calls);
        listeners.add(move |_: &str| *kept.borrow_mut() += 1);
        let removed = Rc::clone(&calls);
        let id = listeners.add(move |_: &str| *removed.borrow_mut() += 100);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        assert_eq!(listeners.len(), 1);

        listeners.notify("ping");
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn empty_registry_is_a_no_op() {
        let mut listeners = Listeners::<u32>::default();
        assert!(listeners.is_empty());
        listeners.notify(&1);
    }
}
