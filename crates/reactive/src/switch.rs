//! Switching to the currently selected inner property (`flat_map` family).
//!
//! On every emission of the outer source the previous inner subscription is
//! disposed and the newly selected inner property is subscribed, which
//! replays its value into the result right away.

use crate::property::{Property, PropertyValue, ReadOnlyProperty};
use crate::subscription::Subscription;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use weft_core::Disposable;

/// Tracks the live inner subscription of one switching property.
#[derive(Default)]
struct InnerSlot {
    subscription: RefCell<Option<Subscription>>,
    generation: Cell<u64>,
}

impl InnerSlot {
    /// Disposes the current inner subscription and starts a new generation.
    fn begin_switch(&self) -> u64 {
        let previous = self.subscription.borrow_mut().take();
        if let Some(previous) = previous {
            previous.dispose();
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    /// Keeps `subscription` unless a nested switch already replaced it.
    fn finish_switch(&self, generation: u64, subscription: Subscription) {
        if self.generation.get() == generation {
            *self.subscription.borrow_mut() = Some(subscription);
        } else {
            subscription.dispose();
        }
    }
}

/// Shared engine for the `flat_map` variants.
///
/// `select` picks the inner property for an outer value (or none) and `lift`
/// converts inner values into result values. While nothing is selected the
/// result holds `fallback`, or keeps its last value when there is none.
pub(crate) fn switch_latest<P, Q, R, S, L>(
    source: &P,
    seed: R,
    select: S,
    lift: L,
    fallback: Option<R>,
) -> Property<R>
where
    P: ReadOnlyProperty,
    Q: ReadOnlyProperty,
    R: PropertyValue,
    S: Fn(&P::Value) -> Option<Q> + 'static,
    L: Fn(&Q::Value) -> R + 'static,
{
    let result = Property::new(seed);
    let slot = Rc::new(InnerSlot::default());
    let lift = Rc::new(lift);
    let target = result.clone();

    source.on_next(move |value| {
        let generation = slot.begin_switch();
        match select(value) {
            Some(inner) => {
                let lift = Rc::clone(&lift);
                let inner_target = target.clone();
                let subscription = inner.on_next(move |v| inner_target.set(lift(v)));
                slot.finish_switch(generation, subscription);
            }
            None => {
                if let Some(fallback) = &fallback {
                    target.set(fallback.clone());
                }
            }
        }
    });

    result
}

pub(crate) fn flat_map<P, Q, F>(source: &P, transform: F) -> Property<Q::Value>
where
    P: ReadOnlyProperty,
    Q: ReadOnlyProperty,
    F: Fn(&P::Value) -> Q + 'static,
{
    let seed = transform(&source.get()).get();
    switch_latest(
        source,
        seed,
        move |value| Some(transform(value)),
        <Q::Value as Clone>::clone,
        None,
    )
}

pub(crate) fn flat_map_or_null<P, Q, F>(source: &P, transform: F) -> Property<Option<Q::Value>>
where
    P: ReadOnlyProperty,
    Q: ReadOnlyProperty,
    F: Fn(&P::Value) -> Option<Q> + 'static,
{
    let seed = transform(&source.get()).map(|inner| inner.get());
    switch_latest(
        source,
        seed,
        transform,
        |value: &Q::Value| Some(value.clone()),
        Some(None),
    )
}

pub(crate) fn flat_map_if_not_null<P, I, U, Q, F>(source: &P, transform: F) -> Property<Option<U>>
where
    P: ReadOnlyProperty<Value = Option<I>>,
    I: PropertyValue,
    U: PropertyValue,
    Q: ReadOnlyProperty<Value = Option<U>>,
    F: Fn(&I) -> Q + 'static,
{
    let seed = source.get().as_ref().and_then(|item| transform(item).get());
    switch_latest(
        source,
        seed,
        move |value: &Option<I>| value.as_ref().map(&transform),
        <Option<U> as Clone>::clone,
        Some(None),
    )
}
