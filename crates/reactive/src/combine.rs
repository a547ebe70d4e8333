//! Combining several properties into one (`map_with`, `zip`).
//!
//! Each combinator keeps a snapshot of every input's latest value, seeded at
//! construction. Any single input emission updates its slot and recomputes
//! the result synchronously, so the result is consistent as soon as the
//! input's `set` returns.

use crate::property::{Property, PropertyValue, ReadOnlyProperty};
use alloc::rc::Rc;
use core::cell::RefCell;

/// Combines two properties through `combine`.
pub fn map_with<A, B, U, F>(a: &A, b: &B, combine: F) -> Property<U>
where
    A: ReadOnlyProperty,
    B: ReadOnlyProperty,
    U: PropertyValue,
    F: Fn(&A::Value, &B::Value) -> U + 'static,
{
    let latest = Rc::new(RefCell::new((a.get(), b.get())));
    let combine = Rc::new(combine);
    let result = {
        let latest = latest.borrow();
        Property::new(combine(&latest.0, &latest.1))
    };

    {
        let (latest, combine, target) = (latest.clone(), combine.clone(), result.clone());
        a.on_next(move |value| {
            let next = {
                let mut latest = latest.borrow_mut();
                latest.0 = value.clone();
                combine(&latest.0, &latest.1)
            };
            target.set(next);
        });
    }
    {
        let target = result.clone();
        b.on_next(move |value| {
            let next = {
                let mut latest = latest.borrow_mut();
                latest.1 = value.clone();
                combine(&latest.0, &latest.1)
            };
            target.set(next);
        });
    }

    result
}

/// Combines three properties through `combine`.
pub fn map_with3<A, B, C, U, F>(a: &A, b: &B, c: &C, combine: F) -> Property<U>
where
    A: ReadOnlyProperty,
    B: ReadOnlyProperty,
    C: ReadOnlyProperty,
    U: PropertyValue,
    F: Fn(&A::Value, &B::Value, &C::Value) -> U + 'static,
{
    let latest = Rc::new(RefCell::new((a.get(), b.get(), c.get())));
    let combine = Rc::new(combine);
    let result = {
        let latest = latest.borrow();
        Property::new(combine(&latest.0, &latest.1, &latest.2))
    };

    {
        let (latest, combine, target) = (latest.clone(), combine.clone(), result.clone());
        a.on_next(move |value| {
            let next = {
                let mut latest = latest.borrow_mut();
                latest.0 = value.clone();
                combine(&latest.0, &latest.1, &latest.2)
            };
            target.set(next);
        });
    }
    {
        let (latest, combine, target) = (latest.clone(), combine.clone(), result.clone());
        b.on_next(move |value| {
            let next = {
                let mut latest = latest.borrow_mut();
                latest.1 = value.clone();
                combine(&latest.0, &latest.1, &latest.2)
            };
            target.set(next);
        });
    }
    {
        let target = result.clone();
        c.on_next(move |value| {
            let next = {
                let mut latest = latest.borrow_mut();
                latest.2 = value.clone();
                combine(&latest.0, &latest.1, &latest.2)
            };
            target.set(next);
        });
    }

    result
}

macro_rules! zip_fn {
    ($(#[$meta:meta])* $name:ident; $($input:ident: $P:ident => $idx:tt),+) => {
        $(#[$meta])*
        pub fn $name<$($P),+>($($input: &$P),+) -> Property<($($P::Value,)+)>
        where
            $($P: ReadOnlyProperty,)+
        {
            let latest = Rc::new(RefCell::new(($($input.get(),)+)));
            let result = Property::new(latest.borrow().clone());
            $(
                {
                    let latest = Rc::clone(&latest);
                    let target = result.clone();
                    $input.on_next(move |value| {
                        let next = {
                            let mut latest = latest.borrow_mut();
                            latest.$idx = value.clone();
                            latest.clone()
                        };
                        target.set(next);
                    });
                }
            )+
            result
        }
    };
}

zip_fn!(
    /// Pairs two properties.
    zip2; a: A => 0, b: B => 1
);
zip_fn!(
    /// Combines three properties into a tuple.
    zip3; a: A => 0, b: B => 1, c: C => 2
);
zip_fn!(
    /// Combines four properties into a tuple.
    zip4; a: A => 0, b: B => 1, c: C => 2, d: D => 3
);
zip_fn!(
    /// Combines five properties into a tuple.
    zip5; a: A => 0, b: B => 1, c: C => 2, d: D => 3, e: E => 4
);
zip_fn!(
    /// Combines six properties into a tuple.
    zip6; a: A => 0, b: B => 1, c: C => 2, d: D => 3, e: E => 4, f: F => 5
);
