//! Weft Core - Shared types for the Weft reactive UI crates.
//!
//! This crate provides the foundational pieces used by both the property layer
//! and the list reconciliation layer:
//!
//! - `Disposable`: The capability to release exactly one subscription
//! - `DisposeFn` / `CompositeDisposable`: Closure-backed and grouped disposables
//! - `Error`: Error types for checked list operations
//!
//! # Example
//!
//! ```rust
//! use weft_core::{CompositeDisposable, Disposable, DisposeFn};
//!
//! let group = CompositeDisposable::new();
//! group.add(DisposeFn::new(|| {}));
//! group.add(DisposeFn::new(|| {}));
//! assert_eq!(group.len(), 2);
//!
//! group.dispose();
//! assert!(group.is_empty());
//! ```

#![no_std]

extern crate alloc;

mod disposable;
mod error;

pub use disposable::{CompositeDisposable, Disposable, DisposeFn};
pub use error::{Error, Result};
