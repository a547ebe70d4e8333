//! Sorting support: comparators, sort specifications, sorted views and the
//! state behind a sortable column control.

use crate::combine::map_with;
use crate::map::map_as_default;
use crate::property::{Property, PropertyValue, ReadOnlyProperty};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// A shared ordering function.
///
/// Comparators compare and hash by identity: two handles are equal only if
/// they were cloned from the same comparator.
pub struct Comparator<T>(Rc<dyn Fn(&T, &T) -> Ordering>);

impl<T: 'static> Comparator<T> {
    /// Wraps an ordering function.
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        Self(Rc::new(compare))
    }

    /// Orders by the key `key` extracts.
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'static,
    {
        Self::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// Compares two items.
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }

    /// Returns the opposite ordering.
    pub fn reversed(&self) -> Self {
        let inner = Rc::clone(&self.0);
        Self::new(move |a, b| inner(b, a))
    }
}

impl<P: ReadOnlyProperty + 'static> Comparator<P> {
    /// Orders properties by a key of their current values.
    pub fn by_property_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&P::Value) -> K + 'static,
    {
        Self::new(move |a: &P, b: &P| key(&a.get()).cmp(&key(&b.get())))
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for Comparator<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for Comparator<T> {}

impl<T> Hash for Comparator<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state)
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Comparator")
            .field(&(Rc::as_ptr(&self.0) as *const ()))
            .finish()
    }
}

/// Next sortable ID. Starts at 1.
static NEXT_SORTABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-unique sortable ID.
pub fn next_sortable_id() -> u64 {
    NEXT_SORTABLE_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

struct SortShared<T> {
    comparator: Comparator<T>,
    sortable_id: u64,
    descending: OnceCell<Comparator<T>>,
}

/// A comparator with a direction and a stable identity.
///
/// A specification and its [`reverse`](Self::reverse) share one
/// `sortable_id`, so a column control can tell whether the active sort is its
/// own regardless of direction.
pub struct SortSpecification<T> {
    shared: Rc<SortShared<T>>,
    ascending: bool,
}

impl<T: 'static> SortSpecification<T> {
    /// Creates a specification with a fresh sortable ID.
    pub fn new(comparator: Comparator<T>, ascending: bool) -> Self {
        Self {
            shared: Rc::new(SortShared {
                comparator,
                sortable_id: next_sortable_id(),
                descending: OnceCell::new(),
            }),
            ascending,
        }
    }

    /// Shorthand for an ascending specification.
    pub fn ascending(comparator: Comparator<T>) -> Self {
        Self::new(comparator, true)
    }

    /// Returns the undirected comparator.
    #[inline]
    pub fn comparator(&self) -> &Comparator<T> {
        &self.shared.comparator
    }

    #[inline]
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    #[inline]
    pub fn sortable_id(&self) -> u64 {
        self.shared.sortable_id
    }

    /// Returns the comparator with the direction applied.
    ///
    /// The descending comparator is built on first use and shared by every
    /// handle of this specification.
    pub fn full_comparator(&self) -> Comparator<T> {
        if self.ascending {
            self.shared.comparator.clone()
        } else {
            self.shared
                .descending
                .get_or_init(|| self.shared.comparator.reversed())
                .clone()
        }
    }

    /// Returns the same specification sorting in the other direction.
    pub fn reverse(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            ascending: !self.ascending,
        }
    }

    /// Returns this specification pointing in `ascending`'s direction.
    pub fn with_direction(&self, ascending: bool) -> Self {
        if ascending == self.ascending {
            self.clone()
        } else {
            self.reverse()
        }
    }
}

impl<T> Clone for SortSpecification<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            ascending: self.ascending,
        }
    }
}

impl<T> PartialEq for SortSpecification<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shared.sortable_id == other.shared.sortable_id && self.ascending == other.ascending
    }
}

impl<T> Eq for SortSpecification<T> {}

impl<T> Hash for SortSpecification<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shared.sortable_id.hash(state);
        self.ascending.hash(state);
    }
}

impl<T> fmt::Debug for SortSpecification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortSpecification")
            .field("sortable_id", &self.shared.sortable_id)
            .field("ascending", &self.ascending)
            .finish()
    }
}

/// A value that may carry an ordering for `T`.
pub trait SortOrder<T>: PropertyValue {
    /// Returns the directed comparator, or `None` to keep the original order.
    fn ordering(&self) -> Option<Comparator<T>>;
}

impl<T: 'static> SortOrder<T> for Comparator<T> {
    fn ordering(&self) -> Option<Comparator<T>> {
        Some(self.clone())
    }
}

impl<T: 'static> SortOrder<T> for Option<Comparator<T>> {
    fn ordering(&self) -> Option<Comparator<T>> {
        self.clone()
    }
}

impl<T: 'static> SortOrder<T> for SortSpecification<T> {
    fn ordering(&self) -> Option<Comparator<T>> {
        Some(self.full_comparator())
    }
}

impl<T: 'static> SortOrder<T> for Option<SortSpecification<T>> {
    fn ordering(&self) -> Option<Comparator<T>> {
        self.as_ref().map(SortSpecification::full_comparator)
    }
}

/// A sequence that can be stably sorted.
pub trait SortableSequence: PropertyValue {
    type Item;

    /// Returns a stably sorted copy.
    fn sorted_by(&self, comparator: &Comparator<Self::Item>) -> Self;
}

impl<T: PropertyValue> SortableSequence for Vec<T> {
    type Item = T;

    fn sorted_by(&self, comparator: &Comparator<T>) -> Self {
        let mut sorted = self.clone();
        sorted.sort_by(|a, b| comparator.compare(a, b));
        sorted
    }
}

impl<T: PropertyValue> SortableSequence for Option<Vec<T>> {
    type Item = T;

    fn sorted_by(&self, comparator: &Comparator<T>) -> Self {
        self.as_ref().map(|items| items.sorted_by(comparator))
    }
}

/// Keeps a sorted copy of `source` ordered by the current value of `order`.
pub fn sorted_with<P, O>(source: &P, order: &O) -> Property<P::Value>
where
    P: ReadOnlyProperty,
    P::Value: SortableSequence,
    O: ReadOnlyProperty,
    O::Value: SortOrder<<P::Value as SortableSequence>::Item>,
{
    map_with(source, order, |items, order| match order.ordering() {
        Some(comparator) => items.sorted_by(&comparator),
        None => items.clone(),
    })
}

/// Creates the state of a sortable column for `spec`.
///
/// The returned property is `None` while another column (or nothing) is
/// sorting, `Some(true)` when this column sorts ascending and `Some(false)`
/// when it sorts descending. Setting it updates `current_sort`. When
/// `sort_now` is set, the column becomes active immediately in `spec`'s own
/// direction.
pub fn sort_control<T: 'static>(
    current_sort: &Property<Option<SortSpecification<T>>>,
    spec: SortSpecification<T>,
    sort_now: bool,
) -> Property<Option<bool>> {
    let id = spec.sortable_id();
    let control = map_as_default(current_sort, move |current: &Option<SortSpecification<T>>| {
        current
            .as_ref()
            .filter(|active| active.sortable_id() == id)
            .map(SortSpecification::is_ascending)
    });

    let initial = spec.is_ascending();
    let current = current_sort.downgrade();
    control.on_next(move |state| {
        let Some(current) = current.upgrade() else {
            return;
        };
        match state {
            Some(ascending) => current.set(Some(spec.with_direction(*ascending))),
            None => {
                let active = current.with(|c| c.as_ref().map(SortSpecification::sortable_id));
                if active == Some(spec.sortable_id()) {
                    current.set(None);
                }
            }
        }
    });

    if sort_now {
        control.set(Some(initial));
    }
    control
}

/// Handles a click on a sortable column: flips an active column's direction
/// or activates an inactive one in `default_ascending` direction.
pub fn toggle_sort(control: &Property<Option<bool>>, default_ascending: bool) {
    let next = control.get().map_or(default_ascending, |ascending| !ascending);
    control.set(Some(next));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::IntoProperty;
    use crate::PropertyExt;
    use alloc::string::{String, ToString};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Person {
        name: String,
        age: u32,
    }

    fn people() -> Vec<Person> {
        [("George", 40), ("Ancient Billy", 90), ("Buddy", 7)]
            .into_iter()
            .map(|(name, age)| Person {
                name: name.to_string(),
                age,
            })
            .collect()
    }

    fn names(list: &[Person]) -> Vec<&str> {
        list.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_sorted_with_optional_comparator() {
        let list = vec![3, 1, 2].into_property();
        let comparator: Property<Option<Comparator<i32>>> = Property::new(None);
        let sorted = list.sorted_with(&comparator);
        assert_eq!(sorted.get(), vec![3, 1, 2]);

        comparator.set(Some(Comparator::new(|a: &i32, b: &i32| a.cmp(b))));
        assert_eq!(sorted.get(), vec![1, 2, 3]);

        comparator.set(Some(Comparator::new(|a: &i32, b: &i32| b.cmp(a))));
        assert_eq!(sorted.get(), vec![3, 2, 1]);

        comparator.set(None);
        assert_eq!(sorted.get(), vec![3, 1, 2]);
    }

    #[test]
    fn test_sorted_with_replaced_entry() {
        let one = 1.into_property();
        let two = 2.into_property();
        let three = 3.into_property();
        let list = vec![three.clone(), one.clone(), two.clone()].into_property();
        let comparator = Property::new(Comparator::<Property<i32>>::by_property_key(|v| *v));
        let sorted = list.sorted_with(&comparator);
        assert!(sorted.get().iter().zip([&one, &two, &three]).all(|(a, b)| a.ptr_eq(b)));

        let four = 4.into_property();
        list.set(vec![four.clone(), one.clone(), two.clone()]);
        assert!(sorted.get().iter().zip([&one, &two, &four]).all(|(a, b)| a.ptr_eq(b)));
    }

    #[test]
    fn test_sorted_with_resorts_after_content_ping() {
        let one = 1.into_property();
        let x = 2.into_property();
        let three = 3.into_property();
        let list = vec![three.clone(), one.clone(), x.clone()].into_property();
        let comparator: Property<Option<Comparator<Property<i32>>>> = Property::new(None);
        let sorted = list.sorted_with(&comparator);
        assert_eq!(sorted.get(), vec![three.clone(), one.clone(), x.clone()]);

        comparator.set(Some(Comparator::by_property_key(|v: &i32| *v)));
        assert_eq!(sorted.get(), vec![one.clone(), x.clone(), three.clone()]);

        let count = Rc::new(core::cell::Cell::new(0));
        let c = count.clone();
        sorted.on_next(move |_| c.set(c.get() + 1));

        // Changing an element's content is not seen until the list is pinged
        x.set(0);
        assert!(sorted.get()[1].ptr_eq(&x));
        assert_eq!(count.get(), 1);

        list.set(list.get());
        let resorted = sorted.get();
        assert!(resorted[0].ptr_eq(&x));
        assert!(resorted[1].ptr_eq(&one));
        assert!(resorted[2].ptr_eq(&three));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_sort_specification_reverse_shares_id() {
        let spec = SortSpecification::ascending(Comparator::by_key(|v: &i32| *v));
        let reverse = spec.reverse();
        assert_eq!(spec.sortable_id(), reverse.sortable_id());
        assert!(!reverse.is_ascending());
        assert_ne!(spec, reverse);
        assert_eq!(reverse.reverse(), spec);

        let mut values = vec![2, 3, 1];
        let descending = reverse.full_comparator();
        values.sort_by(|a, b| descending.compare(a, b));
        assert_eq!(values, vec![3, 2, 1]);
        assert_eq!(descending, reverse.full_comparator());
    }

    #[test]
    fn test_sortable_ids_are_distinct() {
        let a = SortSpecification::ascending(Comparator::by_key(|v: &i32| *v));
        let b = SortSpecification::ascending(Comparator::by_key(|v: &i32| *v));
        assert_ne!(a.sortable_id(), b.sortable_id());
        assert!(a.sortable_id() >= 1);
    }

    #[test]
    fn test_sort_control_switches_columns() {
        let current_sort: Property<Option<SortSpecification<Person>>> = Property::new(None);
        let data = people().into_property();
        let sorted = data.sorted_with(&current_sort);
        let by_name = SortSpecification::ascending(Comparator::by_key(|p: &Person| p.name.clone()));
        let by_age = SortSpecification::ascending(Comparator::by_key(|p: &Person| p.age));
        let name_sort = sort_control(&current_sort, by_name, false);
        let age_sort = sort_control(&current_sort, by_age, false);
        assert_eq!(names(&sorted.get()), ["George", "Ancient Billy", "Buddy"]);

        name_sort.set(Some(true));
        assert_eq!(names(&sorted.get()), ["Ancient Billy", "Buddy", "George"]);

        age_sort.set(Some(true));
        assert_eq!(name_sort.get(), None);
        assert_eq!(names(&sorted.get()), ["Buddy", "George", "Ancient Billy"]);

        // Already inactive
        name_sort.set(None);
        assert_eq!(names(&sorted.get()), ["Buddy", "George", "Ancient Billy"]);

        name_sort.set(Some(false));
        assert_eq!(age_sort.get(), None);
        assert_eq!(names(&sorted.get()), ["George", "Buddy", "Ancient Billy"]);

        name_sort.set(Some(true));
        assert_eq!(names(&sorted.get()), ["Ancient Billy", "Buddy", "George"]);

        name_sort.set(Some(false));
        assert_eq!(names(&sorted.get()), ["George", "Buddy", "Ancient Billy"]);

        name_sort.set(None);
        assert_eq!(current_sort.get(), None);
        assert_eq!(names(&sorted.get()), ["George", "Ancient Billy", "Buddy"]);
    }

    #[test]
    fn test_sort_control_over_properties() {
        let current_sort: Property<Option<SortSpecification<Property<Person>>>> = Property::new(None);
        let data = people()
            .into_iter()
            .map(Property::new)
            .collect::<Vec<_>>()
            .into_property();
        let sorted = data.sorted_with(&current_sort);
        let names = || {
            sorted
                .get()
                .iter()
                .map(|p| p.get().name)
                .collect::<Vec<_>>()
        };
        let name_sort = sort_control(
            &current_sort,
            SortSpecification::ascending(Comparator::<Property<Person>>::by_property_key(|p| p.name.clone())),
            false,
        );
        let age_sort = sort_control(
            &current_sort,
            SortSpecification::ascending(Comparator::<Property<Person>>::by_property_key(|p| p.age)),
            false,
        );
        assert_eq!(names(), ["George", "Ancient Billy", "Buddy"]);

        name_sort.set(Some(true));
        assert_eq!(names(), ["Ancient Billy", "Buddy", "George"]);

        age_sort.set(Some(true));
        assert_eq!(name_sort.get(), None);
        assert_eq!(names(), ["Buddy", "George", "Ancient Billy"]);

        name_sort.set(Some(false));
        assert_eq!(age_sort.get(), None);
        assert_eq!(names(), ["George", "Buddy", "Ancient Billy"]);

        name_sort.set(None);
        assert_eq!(names(), ["George", "Ancient Billy", "Buddy"]);
    }

    #[test]
    fn test_descending_spec_does_not_oscillate() {
        let current_sort: Property<Option<SortSpecification<i32>>> = Property::new(None);
        let spec = SortSpecification::new(Comparator::by_key(|v: &i32| *v), false);
        let control = sort_control(&current_sort, spec.clone(), true);

        assert_eq!(control.get(), Some(false));
        assert_eq!(current_sort.get(), Some(spec.clone()));

        control.set(Some(true));
        assert_eq!(current_sort.get(), Some(spec.reverse()));
    }

    #[test]
    fn test_toggle_sort() {
        let current_sort: Property<Option<SortSpecification<i32>>> = Property::new(None);
        let data = vec![2, 3, 1].into_property();
        let sorted = data.sorted_with(&current_sort);
        let control = sort_control(
            &current_sort,
            SortSpecification::ascending(Comparator::by_key(|v: &i32| *v)),
            false,
        );

        toggle_sort(&control, true);
        assert_eq!(control.get(), Some(true));
        assert_eq!(sorted.get(), vec![1, 2, 3]);

        toggle_sort(&control, true);
        assert_eq!(control.get(), Some(false));
        assert_eq!(sorted.get(), vec![3, 2, 1]);
    }
}
