//! The edit surface reconciliation works against.
//!
//! This module defines the `OperableList` trait and the plain in-memory
//! implementation used directly and as bookkeeping beneath bound lists.

use crate::reconcile;
use alloc::vec::Vec;
use weft_core::{Error, Result};

/// An ordered collection edited through positional operations.
///
/// Implementations back each operation with whatever the list represents
/// (plain storage, rendered nodes, ...). Out-of-range indices are a caller
/// error and may panic, as with `Vec`.
pub trait OperableList<T: PartialEq> {
    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Returns the item at `index`.
    fn get(&self, index: usize) -> &T;

    /// Inserts `item` at `index`, shifting later items right.
    fn add(&mut self, index: usize, item: T);

    /// Removes and returns the item at `index`.
    fn remove_at(&mut self, index: usize) -> T;

    /// Moves the item at `from` so that it ends up at `to`.
    fn move_item(&mut self, from: usize, to: usize);

    /// Returns true if the list is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the index of `item`, scanning from the end.
    ///
    /// With duplicates the occurrence nearest the end wins.
    fn index_of(&self, item: &T) -> Option<usize> {
        (0..self.len()).rev().find(|&index| self.get(index) == item)
    }

    /// Returns true if `item` is present.
    fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Copies the items into a vector.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        (0..self.len()).map(|index| self.get(index).clone()).collect()
    }

    /// Edits this list until it equals `desired`. See [`reconcile_to`](crate::reconcile_to).
    fn reconcile_to(&mut self, desired: &[T])
    where
        T: Clone,
        Self: Sized,
    {
        reconcile::reconcile_to(self, desired)
    }
}

/// A `Vec`-backed [`OperableList`] that counts its edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryOperableList<T> {
    items: Vec<T>,
    modification_count: usize,
}

impl<T> InMemoryOperableList<T> {
    /// Wraps `items` with a modification count of zero.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            modification_count: 0,
        }
    }

    /// Returns the items.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the list and returns its items.
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    /// Returns how many `add`/`remove_at`/`move_item` calls were made.
    #[inline]
    pub fn modification_count(&self) -> usize {
        self.modification_count
    }

    /// Checked [`add`](OperableList::add).
    pub fn try_add(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        self.modification_count += 1;
        self.items.insert(index, item);
        Ok(())
    }

    /// Checked [`remove_at`](OperableList::remove_at).
    pub fn try_remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        self.modification_count += 1;
        Ok(self.items.remove(index))
    }

    /// Checked [`move_item`](OperableList::move_item).
    pub fn try_move(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(Error::invalid_move(from, to, len));
        }
        self.modification_count += 1;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }
}

impl<T> Default for InMemoryOperableList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for InMemoryOperableList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: PartialEq> OperableList<T> for InMemoryOperableList<T> {
    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    fn get(&self, index: usize) -> &T {
        &self.items[index]
    }

    fn add(&mut self, index: usize, item: T) {
        self.modification_count += 1;
        self.items.insert(index, item);
    }

    fn remove_at(&mut self, index: usize) -> T {
        self.modification_count += 1;
        self.items.remove(index)
    }

    fn move_item(&mut self, from: usize, to: usize) {
        self.modification_count += 1;
        let item = self.items.remove(from);
        self.items.insert(to, item);
    }
}
