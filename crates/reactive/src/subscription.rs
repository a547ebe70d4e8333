//! Listener management for properties.
//!
//! This module provides subscription IDs, the ordered listener set that a
//! property notifies, and the [`Subscription`] handle returned by `on_next`.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use weft_core::Disposable;

/// Unique identifier for a subscription within one property.
pub type SubscriptionId = u64;

/// Callback type for value notifications.
pub type ListenerCallback<T> = Rc<dyn Fn(&T)>;

/// A registered listener.
///
/// Listeners are told apart by their ID, never by their callback, so the same
/// handler may be registered several times.
pub struct Listener<T> {
    /// Unique identifier
    id: SubscriptionId,
    /// Callback to invoke on changes
    callback: ListenerCallback<T>,
    /// Whether this listener is still registered
    active: Cell<bool>,
}

impl<T> Listener<T> {
    /// Creates a new listener.
    pub fn new<F>(id: SubscriptionId, callback: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        Self {
            id,
            callback: Rc::new(callback),
            active: Cell::new(true),
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns whether this listener is still registered.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Deactivates this listener.
    #[inline]
    pub fn deactivate(&self) {
        self.active.set(false);
    }

    /// Notifies this listener of a value.
    pub fn notify(&self, value: &T) {
        if self.active.get() {
            (self.callback)(value);
        }
    }
}

/// The listeners of one property, in registration order.
pub struct ListenerSet<T> {
    listeners: Vec<Rc<Listener<T>>>,
    next_id: SubscriptionId,
}

impl<T> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListenerSet<T> {
    /// Creates an empty listener set.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers a callback and returns its ID.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        self.listeners.push(Rc::new(Listener::new(id, callback)));

        id
    }

    /// Unsubscribes by ID.
    ///
    /// The listener is deactivated as well as removed, so a dispatch pass that
    /// already holds a snapshot skips it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.listeners.iter().position(|l| l.id() == id) {
            Some(pos) => {
                let listener = self.listeners.remove(pos);
                listener.deactivate();
                true
            }
            None => false,
        }
    }

    /// Returns the current listeners, in registration order.
    ///
    /// Dispatch iterates the snapshot so listeners may subscribe or dispose
    /// while a notification is in progress.
    pub fn snapshot(&self) -> Vec<Rc<Listener<T>>> {
        self.listeners.clone()
    }

    /// Returns the number of registered listeners.
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if there are no listeners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Returns all subscription IDs.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.listeners.iter().map(|l| l.id()).collect()
    }
}

/// Something that can drop a listener by ID.
pub(crate) trait Unsubscribe {
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Handle returned by `on_next`.
///
/// Dropping a `Subscription` does **not** unsubscribe; call
/// [`dispose`](Disposable::dispose). The handle holds the property weakly.
pub struct Subscription {
    id: SubscriptionId,
    source: Weak<dyn Unsubscribe>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, source: Weak<dyn Unsubscribe>) -> Self {
        Self { id, source }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        if let Some(source) = self.source.upgrade() {
            source.unsubscribe(self.id);
        }
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.source.strong_count() > 0))
            .finish()
    }
}

/// Unsubscribe hook that borrows a shared `ListenerSet`.
impl<T> Unsubscribe for RefCell<ListenerSet<T>> {
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.borrow_mut().unsubscribe(id)
    }
}
