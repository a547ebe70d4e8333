//! Stateful folds over a property's emissions.

use crate::property::{Property, PropertyValue, ReadOnlyProperty};
use crate::subscription::Subscription;
use core::cell::{Cell, RefCell};

/// Folds every emission of `source` into an accumulator property.
///
/// The accumulator starts at `collector(None, current)`. The replay delivered
/// on subscription is that seed and is not folded again; every later value
/// is folded as `collector(Some(previous), value)`.
pub fn collect_as_default<P, U, F>(source: &P, collector: F) -> Property<U>
where
    P: ReadOnlyProperty,
    U: PropertyValue,
    F: Fn(Option<&U>, &P::Value) -> U + 'static,
{
    let accumulated = Property::new(collector(None, &source.get()));
    let target = accumulated.clone();
    let primed = Cell::new(false);
    source.on_next(move |value| {
        if !primed.replace(true) {
            return;
        }
        let previous = target.get();
        target.set(collector(Some(&previous), value));
    });
    accumulated
}

/// Calls `operation(previous, next)` for every emission after the replay.
pub fn on_change<P, F>(source: &P, operation: F) -> Subscription
where
    P: ReadOnlyProperty,
    F: Fn(&P::Value, &P::Value) + 'static,
{
    let previous: RefCell<Option<P::Value>> = RefCell::new(None);
    source.on_next(move |value| {
        let last = previous.borrow_mut().replace(value.clone());
        if let Some(last) = last {
            operation(&last, value);
        }
    })
}

#[cfg(test)]
mod tests {
    use crate::property::{IntoProperty, ReadOnlyProperty};
    use crate::PropertyExt;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use weft_core::Disposable;

    #[test]
    fn test_collect_sum() {
        let property = 123.into_property();
        let sum = property.collect(|collected: Option<&i32>, value| collected.copied().unwrap_or(0) + value);
        assert_eq!(sum.get(), 123);

        property.set(3);
        assert_eq!(sum.get(), 126);

        property.set(4);
        assert_eq!(sum.get(), 130);
    }

    #[test]
    fn test_collect_optional_accumulator() {
        let property = 123.into_property();
        let max_even = property.collect(|collected: Option<&Option<i32>>, value: &i32| {
            let collected = collected.copied().flatten();
            if value % 2 != 0 {
                collected
            } else {
                Some(collected.map_or(*value, |c| c.max(*value)))
            }
        });
        assert_eq!(max_even.get(), None);

        property.set(3);
        assert_eq!(max_even.get(), None);

        property.set(4);
        assert_eq!(max_even.get(), Some(4));

        property.set(2);
        assert_eq!(max_even.get(), Some(4));

        property.set(10);
        assert_eq!(max_even.get(), Some(10));
    }

    #[test]
    fn test_collect_as_default_is_settable() {
        let property = 1.into_property();
        let total = property.collect_as_default(|c: Option<&i32>, v| c.copied().unwrap_or(0) + v);
        total.set(100);

        property.set(5);
        assert_eq!(total.get(), 105);
    }

    #[test]
    fn test_on_change_pairs() {
        let property = 100.into_property();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let c = changes.clone();
        let subscription = property.on_change(move |old, new| c.borrow_mut().push((*old, *new)));
        assert!(changes.borrow().is_empty());

        property.set(100);
        assert!(changes.borrow().is_empty());

        property.set(200);
        assert_eq!(*changes.borrow(), vec![(100, 200)]);

        property.set(300);
        assert_eq!(*changes.borrow(), vec![(100, 200), (200, 300)]);

        subscription.dispose();
        property.set(400);
        assert_eq!(*changes.borrow(), vec![(100, 200), (200, 300)]);
    }
}
