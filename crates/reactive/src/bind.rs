//! Bidirectional bindings between a property and properties derived from it.
//!
//! A binding pairs a forward `transform` with a `reverse` function. Writes on
//! either side propagate to the other, and a per-binding [`SyncGuard`] keeps
//! the write-back from echoing into the side that started it.

use crate::property::{Property, PropertyValue, ReadOnlyProperty};
use alloc::rc::Rc;
use core::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SyncState {
    #[default]
    Idle,
    Propagating,
}

/// Lets only one direction of a binding run at a time.
#[derive(Debug, Default)]
struct SyncGuard {
    state: Cell<SyncState>,
}

impl SyncGuard {
    /// Runs `f` unless a propagation of this binding is already in progress.
    fn run(&self, f: impl FnOnce()) {
        if self.state.get() == SyncState::Propagating {
            return;
        }
        self.state.set(SyncState::Propagating);
        f();
        self.state.set(SyncState::Idle);
    }
}

impl<T: PropertyValue> Property<T> {
    /// Creates a property kept in sync with `self` in both directions.
    ///
    /// Changes to `self` arrive as `transform(value)`; writes to the returned
    /// property are sent back as `reverse(value)`. The returned property keeps
    /// the exact value written to it even when `transform(reverse(value))`
    /// would render it differently.
    ///
    /// `reverse` must be an inverse of `transform`; this is not checked.
    pub fn bind<U, F, R>(&self, transform: F, reverse: R) -> Property<U>
    where
        U: PropertyValue,
        F: Fn(&T) -> U + 'static,
        R: Fn(&U) -> T + 'static,
    {
        let guard = Rc::new(SyncGuard::default());
        let derived = Property::new(transform(&self.get()));

        {
            let guard = Rc::clone(&guard);
            let target = derived.clone();
            self.on_next(move |value| guard.run(|| target.set(transform(value))));
        }

        // The derived side holds its source weakly so the pair does not form a cycle.
        let source = self.downgrade();
        let primed = Cell::new(false);
        derived.on_next(move |value| {
            if !primed.replace(true) {
                return;
            }
            guard.run(|| {
                if let Some(source) = source.upgrade() {
                    source.set(reverse(value));
                }
            });
        });

        derived
    }

    /// Splits `self` into two bound parts.
    ///
    /// Each part follows `self` through its own transform. Writing either part
    /// recombines it with the other part's current value through `reverse`
    /// and sets the result on `self`.
    pub fn bind_parts<A, B, F1, F2, R>(
        &self,
        transform1: F1,
        transform2: F2,
        reverse: R,
    ) -> (Property<A>, Property<B>)
    where
        A: PropertyValue,
        B: PropertyValue,
        F1: Fn(&T) -> A + 'static,
        F2: Fn(&T) -> B + 'static,
        R: Fn(&A, &B) -> T + 'static,
    {
        let guard = Rc::new(SyncGuard::default());
        let current = self.get();
        let first = Property::new(transform1(&current));
        let second = Property::new(transform2(&current));

        {
            let guard = Rc::clone(&guard);
            let (first, second) = (first.clone(), second.clone());
            self.on_next(move |value| {
                guard.run(|| {
                    first.set(transform1(value));
                    second.set(transform2(value));
                });
            });
        }

        let reverse = Rc::new(reverse);
        {
            let guard = Rc::clone(&guard);
            let reverse = Rc::clone(&reverse);
            let source = self.downgrade();
            let sibling = second.downgrade();
            let primed = Cell::new(false);
            first.on_next(move |a| {
                if !primed.replace(true) {
                    return;
                }
                guard.run(|| {
                    if let (Some(source), Some(sibling)) = (source.upgrade(), sibling.upgrade()) {
                        let b = sibling.get();
                        source.set(reverse(a, &b));
                    }
                });
            });
        }
        {
            let source = self.downgrade();
            let sibling = first.downgrade();
            let primed = Cell::new(false);
            second.on_next(move |b| {
                if !primed.replace(true) {
                    return;
                }
                guard.run(|| {
                    if let (Some(source), Some(sibling)) = (source.upgrade(), sibling.upgrade()) {
                        let a = sibling.get();
                        source.set(reverse(&a, b));
                    }
                });
            });
        }

        (first, second)
    }
}
