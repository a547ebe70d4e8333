//! One-way derived properties.

use crate::property::{Property, PropertyValue, ReadOnlyProperty};
use alloc::string::String;
use tracing::debug;

/// Derives a settable property that follows `source` through `transform`.
///
/// Writes to the returned property stay local and are overwritten by the next
/// emission of `source`.
pub fn map_as_default<P, U, F>(source: &P, transform: F) -> Property<U>
where
    P: ReadOnlyProperty,
    U: PropertyValue,
    F: Fn(&P::Value) -> U + 'static,
{
    let derived = Property::new(transform(&source.get()));
    let target = derived.clone();
    source.on_next(move |value| target.set(transform(value)));
    derived
}

/// Logs every emission of `source` at debug level.
pub(crate) fn log_emissions<P, F>(source: &P, render: F)
where
    P: ReadOnlyProperty,
    F: Fn(&P::Value) -> String + 'static,
{
    source.on_next(move |value| {
        let rendered = render(value);
        debug!(value = %rendered, "property emitted");
    });
}
