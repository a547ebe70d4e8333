//! Combinator methods available on every readable property.

use crate::frame::{self, FrameScheduler};
use crate::property::{PropertyValue, ReadOnly, ReadOnlyProperty, Property};
use crate::sort::{SortOrder, SortableSequence};
use crate::subscription::Subscription;
use crate::validate::ValidationStatus;
use crate::{collect, combine, map, sort, switch, validate};
use alloc::rc::Rc;
use alloc::string::String;

/// Derivation methods for [`ReadOnlyProperty`] implementors.
///
/// Every combinator evaluates eagerly: the derived property is consistent as
/// soon as the upstream `set` returns.
pub trait PropertyExt: ReadOnlyProperty + Sized {
    /// Derives a read-only property through `transform`.
    fn map<U, F>(&self, transform: F) -> ReadOnly<U>
    where
        U: PropertyValue,
        F: Fn(&Self::Value) -> U + 'static,
    {
        map::map_as_default(self, transform).read_only()
    }

    /// Derives a settable property through `transform`.
    ///
    /// Local writes are overwritten by the next upstream emission.
    fn map_as_default<U, F>(&self, transform: F) -> Property<U>
    where
        U: PropertyValue,
        F: Fn(&Self::Value) -> U + 'static,
    {
        map::map_as_default(self, transform)
    }

    /// Negates a boolean property.
    fn not(&self) -> ReadOnly<bool>
    where
        Self: ReadOnlyProperty<Value = bool>,
    {
        self.map(|value| !value)
    }

    /// Follows whichever property `transform` selects for the current value.
    fn flat_map<Q, F>(&self, transform: F) -> ReadOnly<Q::Value>
    where
        Q: ReadOnlyProperty,
        F: Fn(&Self::Value) -> Q + 'static,
    {
        switch::flat_map(self, transform).read_only()
    }

    /// Like [`flat_map`](Self::flat_map), holding `None` while nothing is
    /// selected.
    fn flat_map_or_null<Q, F>(&self, transform: F) -> ReadOnly<Option<Q::Value>>
    where
        Q: ReadOnlyProperty,
        F: Fn(&Self::Value) -> Option<Q> + 'static,
    {
        switch::flat_map_or_null(self, transform).read_only()
    }

    /// Flat-maps an optional value, holding `None` while the value is `None`.
    fn flat_map_if_not_null<I, U, Q, F>(&self, transform: F) -> ReadOnly<Option<U>>
    where
        Self: ReadOnlyProperty<Value = Option<I>>,
        I: PropertyValue,
        U: PropertyValue,
        Q: ReadOnlyProperty<Value = Option<U>>,
        F: Fn(&I) -> Q + 'static,
    {
        switch::flat_map_if_not_null(self, transform).read_only()
    }

    fn map_with<B, U, F>(&self, other: &B, combine: F) -> ReadOnly<U>
    where
        B: ReadOnlyProperty,
        U: PropertyValue,
        F: Fn(&Self::Value, &B::Value) -> U + 'static,
    {
        combine::map_with(self, other, combine).read_only()
    }

    fn map_with3<B, C, U, F>(&self, second: &B, third: &C, combine: F) -> ReadOnly<U>
    where
        B: ReadOnlyProperty,
        C: ReadOnlyProperty,
        U: PropertyValue,
        F: Fn(&Self::Value, &B::Value, &C::Value) -> U + 'static,
    {
        combine::map_with3(self, second, third, combine).read_only()
    }

    fn zip<B>(&self, other: &B) -> ReadOnly<(Self::Value, B::Value)>
    where
        B: ReadOnlyProperty,
    {
        combine::zip2(self, other).read_only()
    }

    fn zip3<B, C>(&self, b: &B, c: &C) -> ReadOnly<(Self::Value, B::Value, C::Value)>
    where
        B: ReadOnlyProperty,
        C: ReadOnlyProperty,
    {
        combine::zip3(self, b, c).read_only()
    }

    fn zip4<B, C, D>(&self, b: &B, c: &C, d: &D) -> ReadOnly<(Self::Value, B::Value, C::Value, D::Value)>
    where
        B: ReadOnlyProperty,
        C: ReadOnlyProperty,
        D: ReadOnlyProperty,
    {
        combine::zip4(self, b, c, d).read_only()
    }

    #[allow(clippy::type_complexity)]
    fn zip5<B, C, D, E>(
        &self,
        b: &B,
        c: &C,
        d: &D,
        e: &E,
    ) -> ReadOnly<(Self::Value, B::Value, C::Value, D::Value, E::Value)>
    where
        B: ReadOnlyProperty,
        C: ReadOnlyProperty,
        D: ReadOnlyProperty,
        E: ReadOnlyProperty,
    {
        combine::zip5(self, b, c, d, e).read_only()
    }

    #[allow(clippy::type_complexity)]
    fn zip6<B, C, D, E, G>(
        &self,
        b: &B,
        c: &C,
        d: &D,
        e: &E,
        f: &G,
    ) -> ReadOnly<(Self::Value, B::Value, C::Value, D::Value, E::Value, G::Value)>
    where
        B: ReadOnlyProperty,
        C: ReadOnlyProperty,
        D: ReadOnlyProperty,
        E: ReadOnlyProperty,
        G: ReadOnlyProperty,
    {
        combine::zip6(self, b, c, d, e, f).read_only()
    }

    /// Folds emissions into an accumulator. See [`collect_as_default`](Self::collect_as_default).
    fn collect<U, F>(&self, collector: F) -> ReadOnly<U>
    where
        U: PropertyValue,
        F: Fn(Option<&U>, &Self::Value) -> U + 'static,
    {
        collect::collect_as_default(self, collector).read_only()
    }

    /// Folds emissions into a settable accumulator seeded with
    /// `collector(None, current)`.
    fn collect_as_default<U, F>(&self, collector: F) -> Property<U>
    where
        U: PropertyValue,
        F: Fn(Option<&U>, &Self::Value) -> U + 'static,
    {
        collect::collect_as_default(self, collector)
    }

    /// Calls `operation(previous, next)` for every change after subscribing.
    fn on_change<F>(&self, operation: F) -> Subscription
    where
        F: Fn(&Self::Value, &Self::Value) + 'static,
    {
        collect::on_change(self, operation)
    }

    /// Follows this property one frame late on the thread's scheduler.
    fn deferred(&self) -> ReadOnly<Self::Value> {
        frame::deferred_on(self, frame::scheduler()).read_only()
    }

    /// Follows this property one frame late on `scheduler`.
    fn deferred_on(&self, scheduler: Rc<dyn FrameScheduler>) -> ReadOnly<Self::Value> {
        frame::deferred_on(self, scheduler).read_only()
    }

    /// Keeps a sorted copy of this sequence ordered by `order`.
    fn sorted_with<O>(&self, order: &O) -> ReadOnly<Self::Value>
    where
        Self::Value: SortableSequence,
        O: ReadOnlyProperty,
        O::Value: SortOrder<<Self::Value as SortableSequence>::Item>,
    {
        sort::sorted_with(self, order).read_only()
    }

    /// Derives a validation status from `condition`.
    fn validate<F>(&self, error_message: impl Into<String>, condition: F) -> ReadOnly<ValidationStatus>
    where
        F: Fn(&Self::Value) -> bool + 'static,
    {
        validate::validate(self, error_message.into(), condition).read_only()
    }

    /// Returns whether the current status is a success.
    fn is_valid(&self) -> bool
    where
        Self: ReadOnlyProperty<Value = ValidationStatus>,
    {
        self.get().success
    }

    /// Logs every emission at debug level and returns `self`.
    fn debug<F>(&self, render: F) -> &Self
    where
        F: Fn(&Self::Value) -> String + 'static,
    {
        map::log_emissions(self, render);
        self
    }
}

impl<P: ReadOnlyProperty> PropertyExt for P {}
