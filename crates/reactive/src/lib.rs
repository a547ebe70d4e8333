//! Weft Reactive - observable properties and their combinators.
//!
//! A [`Property`] is a single-threaded value cell that notifies its listeners
//! synchronously whenever its value changes, and replays its current value to
//! every new listener. Derived properties are built eagerly from `on_next`
//! and `set`, with no scheduler involved except for [`PropertyExt::deferred`].
//!
//! # Core Concepts
//!
//! - `Property`: mutable observable cell with equality-and-hash change detection
//! - `ReadOnlyProperty`: read access (`get`, `on_next`) shared by properties and views
//! - `PropertyExt`: combinators (`map`, `flat_map`, `zip`, `collect`, `sorted_with`, ...)
//! - `Subscription`: handle returned by `on_next`, released with `dispose()`
//! - `SortSpecification`: comparator + direction + stable identity for sortable columns
//!
//! # Example
//!
//! ```
//! use weft_reactive::{IntoProperty, PropertyExt, ReadOnlyProperty};
//!
//! let count = 1.into_property();
//! let label = count.map(|c| format!("{} items", c));
//! assert_eq!(label.get(), "1 items");
//!
//! count.set(3);
//! assert_eq!(label.get(), "3 items");
//! ```

extern crate alloc;

mod bind;
mod collect;
mod combine;
mod ext;
pub mod frame;
mod map;
mod property;
pub mod sort;
pub mod subscription;
mod switch;
mod validate;

pub use collect::{collect_as_default, on_change};
pub use combine::{map_with, map_with3, zip2, zip3, zip4, zip5, zip6};
pub use ext::PropertyExt;
pub use frame::{FrameQueue, FrameScheduler};
pub use map::map_as_default;
pub use property::{IntoProperty, Property, PropertyValue, ReadOnly, ReadOnlyProperty, WeakProperty};
pub use sort::{sort_control, sorted_with, toggle_sort, Comparator, SortOrder, SortSpecification, SortableSequence};
pub use subscription::{Subscription, SubscriptionId};
pub use validate::ValidationStatus;

// Re-export commonly used types from dependencies
pub use weft_core::Disposable;
