//! Observable value cells.
//!
//! A [`Property`] owns one value and pushes every change to its listeners
//! synchronously. Subscribing replays the current value immediately, so a
//! property behaves like a replay source of length one.
//!
//! # Change detection
//!
//! `set(v)` is a no-op when `v` equals the current value **and** hashes to the
//! hash cached at the last effective set. The hash comparison catches values
//! whose contents changed behind a shared handle (for example a `Vec` of
//! properties where one element was updated), which `==` alone cannot see.
//!
//! # Reentrancy
//!
//! Each effective set bumps a version. While a set is notifying, a listener
//! may call `set` again; that nested set runs its own complete pass first.
//! When control returns, the outer pass stops as soon as it sees the version
//! has moved on, so no listener ever receives a value older than one it has
//! already seen.

use crate::subscription::{ListenerSet, Subscription, Unsubscribe};
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use hashbrown::hash_map::DefaultHashBuilder;
use tracing::trace;

/// Bound for everything a property can hold.
pub trait PropertyValue: Clone + PartialEq + Hash + 'static {}

impl<T: Clone + PartialEq + Hash + 'static> PropertyValue for T {}

/// Read access to an observable value.
pub trait ReadOnlyProperty {
    /// The observed value type.
    type Value: PropertyValue;

    /// Returns a clone of the current value.
    fn get(&self) -> Self::Value;

    /// Registers `handler` and calls it once with the current value before
    /// returning.
    fn on_next<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Self::Value) + 'static;
}

struct Slot<T> {
    value: T,
    hash: u64,
    version: u64,
}

struct PropertyInner<T> {
    slot: RefCell<Slot<T>>,
    listeners: Rc<RefCell<ListenerSet<T>>>,
    hasher: DefaultHashBuilder,
}

/// A mutable observable value.
///
/// Cloning a `Property` creates a new handle to the **same** cell.
pub struct Property<T: PropertyValue> {
    inner: Rc<PropertyInner<T>>,
}

impl<T: PropertyValue> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: PropertyValue> Property<T> {
    /// Creates a property holding `initial`.
    pub fn new(initial: T) -> Self {
        let hasher = DefaultHashBuilder::default();
        let hash = hasher.hash_one(&initial);
        Self {
            inner: Rc::new(PropertyInner {
                slot: RefCell::new(Slot {
                    value: initial,
                    hash,
                    version: 0,
                }),
                listeners: Rc::new(RefCell::new(ListenerSet::new())),
                hasher,
            }),
        }
    }

    /// Replaces the value and notifies listeners, unless the value is
    /// unchanged under the equality-and-hash rule.
    pub fn set(&self, new_value: T) {
        let hash = self.inner.hasher.hash_one(&new_value);
        let (version, delivered) = {
            let mut slot = self.inner.slot.borrow_mut();
            if slot.hash == hash && slot.value == new_value {
                return;
            }
            let delivered = new_value.clone();
            slot.value = new_value;
            slot.hash = hash;
            slot.version += 1;
            (slot.version, delivered)
        };
        self.dispatch(version, &delivered);
    }

    fn dispatch(&self, version: u64, value: &T) {
        let listeners = self.inner.listeners.borrow().snapshot();
        let total = listeners.len();
        for (delivered, listener) in listeners.into_iter().enumerate() {
            let live = self.inner.slot.borrow().version;
            if live != version {
                // A nested set already delivered a fresher value to the rest.
                trace!(version, live, skipped = total - delivered, "stale notification pass stopped");
                return;
            }
            listener.notify(value);
        }
    }

    /// Sets the value to `f(current)`.
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = self.with(f);
        self.set(next);
    }

    /// Runs `f` with a borrow of the current value.
    ///
    /// `f` must not call `set` on this property.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.slot.borrow().value)
    }

    /// Returns the number of registered listeners.
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Returns a read-only view of this property.
    pub fn read_only(&self) -> ReadOnly<T> {
        ReadOnly(self.clone())
    }

    /// Creates a weak handle that does not keep the value alive.
    pub fn downgrade(&self) -> WeakProperty<T> {
        WeakProperty {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns true if both handles refer to the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: PropertyValue> ReadOnlyProperty for Property<T> {
    type Value = T;

    fn get(&self) -> T {
        self.inner.slot.borrow().value.clone()
    }

    fn on_next<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let handler = Rc::new(handler);
        let id = {
            let handler = Rc::clone(&handler);
            self.inner
                .listeners
                .borrow_mut()
                .subscribe(move |value: &T| handler(value))
        };
        let current = self.get();
        handler(&current);

        let source: Weak<dyn Unsubscribe> =
            Rc::downgrade(&self.inner.listeners) as Weak<dyn Unsubscribe>;
        Subscription::new(id, source)
    }
}

/// Two properties are equal when their current values are equal.
///
/// Keying a map by a `Property` therefore only works while it is not mutated.
impl<T: PropertyValue> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.with(|a| other.with(|b| a == b))
    }
}

impl<T: PropertyValue> Hash for Property<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.with(|value| value.hash(state))
    }
}

impl<T: PropertyValue + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.slot.borrow();
        f.debug_struct("Property")
            .field("value", &slot.value)
            .field("version", &slot.version)
            .finish()
    }
}

impl<T: PropertyValue + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PropertyValue> Property<Vec<T>> {
    /// Copies the list, lets `operation` edit the copy, then sets it.
    pub fn modify_list<F>(&self, operation: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        self.modify(|list| {
            let mut next = list.clone();
            operation(&mut next);
            next
        });
    }

    /// Appends an item.
    pub fn push(&self, item: T) {
        self.modify_list(|list| list.push(item));
    }

    /// Removes the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&self, index: usize) {
        self.modify_list(|list| {
            list.remove(index);
        });
    }

    /// Empties the list.
    pub fn clear(&self) {
        self.modify_list(Vec::clear);
    }
}

/// A property handle without `set`.
pub struct ReadOnly<T: PropertyValue>(Property<T>);

impl<T: PropertyValue> ReadOnly<T> {
    /// Returns the number of registered listeners.
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.0.listener_count()
    }

    /// Runs `f` with a borrow of the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }
}

impl<T: PropertyValue> Clone for ReadOnly<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: PropertyValue> From<Property<T>> for ReadOnly<T> {
    fn from(property: Property<T>) -> Self {
        Self(property)
    }
}

impl<T: PropertyValue> ReadOnlyProperty for ReadOnly<T> {
    type Value = T;

    #[inline]
    fn get(&self) -> T {
        self.0.get()
    }

    #[inline]
    fn on_next<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.0.on_next(handler)
    }
}

impl<T: PropertyValue> PartialEq for ReadOnly<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: PropertyValue> Hash for ReadOnly<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: PropertyValue + fmt::Debug> fmt::Debug for ReadOnly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnly").field(&self.0).finish()
    }
}

/// A non-owning property handle.
pub struct WeakProperty<T: PropertyValue> {
    inner: Weak<PropertyInner<T>>,
}

impl<T: PropertyValue> WeakProperty<T> {
    /// Returns the property if it is still alive.
    pub fn upgrade(&self) -> Option<Property<T>> {
        self.inner.upgrade().map(|inner| Property { inner })
    }
}

impl<T: PropertyValue> Clone for WeakProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// Wraps a value in a new [`Property`].
pub trait IntoProperty: PropertyValue + Sized {
    /// Creates a property holding `self`.
    fn into_property(self) -> Property<Self> {
        Property::new(self)
    }
}

impl<T: PropertyValue> IntoProperty for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use weft_core::Disposable;

    #[test]
    fn test_on_next_replays_current_value() {
        let property = 123.into_property();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        property.on_next(move |v| seen_clone.borrow_mut().push(*v));

        assert_eq!(*seen.borrow(), vec![123]);
    }

    #[test]
    fn test_set_same_value_is_ignored() {
        let property = 123.into_property();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        property.on_next(move |_| c.set(c.get() + 1));
        assert_eq!(count.get(), 1);

        property.set(123);
        assert_eq!(count.get(), 1);

        property.set(property.get());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_set_different_list_propagates() {
        let property = vec![1, 2, 3].into_property();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        property.on_next(move |_| c.set(c.get() + 1));

        property.set(vec![1, 2, 3]);
        assert_eq!(count.get(), 1);

        property.push(4);
        assert_eq!(count.get(), 2);
        assert_eq!(property.get(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reentrant_set_same_value_terminates() {
        let property = 123.into_property();
        let p = property.clone();
        property.on_next(move |_| p.set(300));
        assert_eq!(property.get(), 300);
    }

    #[test]
    fn test_reentrant_set_new_value() {
        let property = 123.into_property();
        let values1 = Rc::new(RefCell::new(Vec::new()));
        let values2 = Rc::new(RefCell::new(Vec::new()));

        let v1 = values1.clone();
        property.on_next(move |v| v1.borrow_mut().push(*v));
        let p = property.clone();
        property.on_next(move |_| {
            if p.get() == 200 {
                p.set(300);
            }
        });
        let v2 = values2.clone();
        property.on_next(move |v| v2.borrow_mut().push(*v));

        property.set(200);
        assert_eq!(*values1.borrow(), vec![123, 200, 300]);
        assert_eq!(*values2.borrow(), vec![123, 300]);
    }

    #[test]
    fn test_content_change_detected_through_hash() {
        let one = 1.into_property();
        let x = 2.into_property();
        let pair = (one.clone(), x.clone()).into_property();

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        pair.on_next(move |_| c.set(c.get() + 1));
        assert_eq!(count.get(), 1);

        // Not observed by the pair until it is pinged
        x.set(0);
        assert_eq!(count.get(), 1);

        pair.set(pair.get());
        assert_eq!(count.get(), 2);

        // Pinging again without a content change is a no-op
        pair.set(pair.get());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_dispose_stops_notifications() {
        let property = 1.into_property();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let subscription = property.on_next(move |_| c.set(c.get() + 1));
        assert_eq!(property.listener_count(), 1);

        subscription.dispose();
        subscription.dispose();
        assert_eq!(property.listener_count(), 0);

        property.set(2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_dispose_during_dispatch_skips_later_listener() {
        let property = 1.into_property();
        let late = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let s = slot.clone();
        property.on_next(move |v| {
            if *v == 2 {
                if let Some(sub) = s.borrow().as_ref() {
                    sub.dispose();
                }
            }
        });
        let l = late.clone();
        *slot.borrow_mut() = Some(property.on_next(move |_| l.set(l.get() + 1)));
        assert_eq!(late.get(), 1);

        property.set(2);
        assert_eq!(late.get(), 1);
        assert_eq!(property.listener_count(), 1);
    }

    #[test]
    fn test_listeners_notified_in_registration_order() {
        let property = 0.into_property();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..4 {
            let order = order.clone();
            property.on_next(move |v| {
                if *v != 0 {
                    order.borrow_mut().push(tag)
                }
            });
        }

        property.set(1);
        assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_property_equality_follows_value() {
        let a = 5.into_property();
        let b = 5.into_property();
        assert_eq!(a, b);

        b.set(6);
        assert_ne!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn test_list_helpers() {
        let list = vec!["a", "b", "c"].into_property();
        list.remove_at(1);
        assert_eq!(list.get(), vec!["a", "c"]);

        list.modify_list(|l| l.insert(0, "z"));
        assert_eq!(list.get(), vec!["z", "a", "c"]);

        list.clear();
        assert!(list.get().is_empty());
    }

    #[test]
    fn test_weak_property_upgrade() {
        let property = 9.into_property();
        let weak = property.downgrade();
        assert_eq!(weak.upgrade().map(|p| p.get()), Some(9));

        drop(property);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_read_only_view_shares_cell() {
        let property = 1.into_property();
        let view = property.read_only();
        property.set(4);
        assert_eq!(view.get(), 4);
        assert_eq!(view.listener_count(), 0);
    }
}
