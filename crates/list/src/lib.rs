//! Weft List - ordered-list reconciliation and list binding.
//!
//! This crate turns "the list should now look like this" into the positional
//! edits a UI needs:
//!
//! - `OperableList`: The edit surface (`add`, `remove_at`, `move_item`)
//! - `reconcile_to`: Edits a list in place until it equals a desired sequence
//! - `InMemoryOperableList`: A `Vec`-backed list that counts its edits
//! - `bind_list`: Keeps nodes in a `NodeContainer` in sync with a property
//! - `Effect`: Enter and exit transitions for bound nodes
//!
//! # Example
//!
//! ```rust
//! use weft_list::{InMemoryOperableList, OperableList};
//!
//! let mut list = InMemoryOperableList::new(vec![1, 6, 2, 3, 4, 5]);
//! list.reconcile_to(&[1, 2, 3, 4, 5, 6]);
//!
//! assert_eq!(list.items(), &[1, 2, 3, 4, 5, 6]);
//! assert_eq!(list.modification_count(), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod driver;
pub mod effect;
pub mod operable;
mod reconcile;

pub use driver::{
    bind_list, BoundList, DriverConfig, ItemSequence, ListBinding, MoveMode, NodeContainer, RenderFn,
};
pub use effect::{Effect, ExitCallback, NoEffect};
pub use operable::{InMemoryOperableList, OperableList};
pub use reconcile::reconcile_to;
