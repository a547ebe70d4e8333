//! Ordered-list reconciliation.
//!
//! [`reconcile_to`] edits an [`OperableList`] in place until it equals a
//! desired sequence, using only `remove_at`, `move_item` and `add`. It works in
//! four passes:
//!
//! 1. Remove every item the desired sequence does not need, last index first.
//! 2. Split the desired sequence into items already present (stable) and new
//!    items (fresh).
//! 3. Move stable items into place in a single pass, ascending or descending,
//!    whichever direction fewer items need to travel against.
//! 4. Insert the fresh items at their desired positions.
//!
//! This is a heuristic rather than a minimum edit script, but it keeps moves
//! low for the common edits: a single item moved, a few items swapped, a
//! reversal, inserts and deletes that preserve order (zero moves).
//!
//! Equal items are interchangeable. When an item occurs `k` times in the
//! desired sequence, the first `k` occurrences in the list are kept, and a
//! position already holding an equal item is never moved into.

use crate::operable::OperableList;
use alloc::vec::Vec;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

/// Edits `list` until its items equal `desired`.
pub fn reconcile_to<T, L>(list: &mut L, desired: &[T])
where
    T: PartialEq + Clone,
    L: OperableList<T> + ?Sized,
{
    let removed = prune(list, desired);
    let (stable, fresh) = partition(list, desired);

    let moved = match direction(list, desired, &stable) {
        Direction::Ascending => move_ascending(list, desired, &stable),
        Direction::Descending => move_descending(list, desired, &stable),
    };

    // Fresh indices ascend, so every earlier desired item is in place already.
    for &index in &fresh {
        list.add(index, desired[index].clone());
    }

    debug!(removed, moved, added = fresh.len(), len = desired.len(), "list reconciled");
}

fn occurrences<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().filter(|candidate| *candidate == item).count()
}

fn occurrences_in<T, L>(list: &L, item: &T) -> usize
where
    T: PartialEq,
    L: OperableList<T> + ?Sized,
{
    (0..list.len()).filter(|&index| list.get(index) == item).count()
}

/// Removes surplus items and returns how many were removed.
fn prune<T, L>(list: &mut L, desired: &[T]) -> usize
where
    T: PartialEq,
    L: OperableList<T> + ?Sized,
{
    let keep: Vec<bool> = (0..list.len())
        .map(|index| {
            let item = list.get(index);
            let rank = (0..=index).filter(|&earlier| list.get(earlier) == item).count();
            rank <= occurrences(desired, item)
        })
        .collect();

    let mut removed = 0;
    for index in (0..keep.len()).rev() {
        if !keep[index] {
            list.remove_at(index);
            removed += 1;
        }
    }
    removed
}

/// Splits desired indices into items matched by the list and new items.
fn partition<T, L>(list: &L, desired: &[T]) -> (Vec<usize>, Vec<usize>)
where
    T: PartialEq,
    L: OperableList<T> + ?Sized,
{
    let mut stable: Vec<usize> = Vec::new();
    let mut fresh = Vec::new();
    for (index, item) in desired.iter().enumerate() {
        let claimed = stable.iter().filter(|&&s| desired[s] == *item).count();
        if claimed < occurrences_in(list, item) {
            stable.push(index);
        } else {
            fresh.push(index);
        }
    }
    (stable, fresh)
}

fn direction<T, L>(list: &L, desired: &[T], stable: &[usize]) -> Direction
where
    T: PartialEq,
    L: OperableList<T> + ?Sized,
{
    let mut moving_right = 0usize;
    let mut moving_left = 0usize;
    for index in 0..list.len() {
        let item = list.get(index);
        if let Some(target) = stable.iter().position(|&s| desired[s] == *item) {
            if target > index {
                moving_right += 1;
            } else if target < index {
                moving_left += 1;
            }
        }
    }
    if moving_left <= moving_right {
        Direction::Ascending
    } else {
        Direction::Descending
    }
}

fn move_ascending<T, L>(list: &mut L, desired: &[T], stable: &[usize]) -> usize
where
    T: PartialEq,
    L: OperableList<T> + ?Sized,
{
    let mut moved = 0;
    for (position, &s) in stable.iter().enumerate() {
        let item = &desired[s];
        if list.get(position) == item {
            continue;
        }
        // Positions before `position` are final, so the last match lies after it.
        if let Some(from) = list.index_of(item) {
            if from != position {
                list.move_item(from, position);
                moved += 1;
            }
        }
    }
    moved
}

fn move_descending<T, L>(list: &mut L, desired: &[T], stable: &[usize]) -> usize
where
    T: PartialEq,
    L: OperableList<T> + ?Sized,
{
    let mut moved = 0;
    for (position, &s) in stable.iter().enumerate().rev() {
        // Positions after `position` are final; search only up to it.
        let item = &desired[s];
        let found = (0..=position).rev().find(|&index| list.get(index) == item);
        if let Some(from) = found {
            if from != position {
                list.move_item(from, position);
                moved += 1;
            }
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operable::InMemoryOperableList;
    use alloc::vec;

    fn reconcile_and_verify(original: Vec<i32>, desired: &[i32]) -> usize {
        let mut list = InMemoryOperableList::new(original);
        list.reconcile_to(desired);
        assert_eq!(list.items(), desired);
        list.modification_count()
    }

    #[test]
    fn test_identical_lists_do_nothing() {
        assert_eq!(reconcile_and_verify(vec![1, 2, 3], &[1, 2, 3]), 0);
    }

    #[test]
    fn test_add_to_end_of_short_list() {
        assert_eq!(reconcile_and_verify(vec![1], &[1, 2]), 1);
        assert_eq!(reconcile_and_verify(vec![1, 2], &[1, 2, 3]), 1);
    }

    #[test]
    fn test_move_single_item_to_end() {
        assert_eq!(reconcile_and_verify(vec![1, 6, 2, 3, 4, 5], &[1, 2, 3, 4, 5, 6]), 1);
    }

    #[test]
    fn test_move_single_item_to_beginning() {
        assert_eq!(reconcile_and_verify(vec![2, 3, 4, 5, 6, 1], &[1, 2, 3, 4, 5, 6]), 1);
    }

    #[test]
    fn test_move_single_item_earlier() {
        assert_eq!(reconcile_and_verify(vec![1, 2, 3, 5, 6, 4, 7], &[1, 2, 3, 4, 5, 6, 7]), 1);
    }

    #[test]
    fn test_move_two_items_earlier() {
        let desired = [9, 8, 7, 6, 5, 4, 3, 2, 1];
        assert_eq!(reconcile_and_verify(vec![9, 6, 5, 4, 3, 8, 7, 2, 1], &desired), 2);
    }

    #[test]
    fn test_move_two_items_earlier_swapping_their_order() {
        let desired = [9, 8, 7, 6, 5, 4, 3, 2, 1];
        assert_eq!(reconcile_and_verify(vec![9, 6, 5, 4, 3, 7, 8, 2, 1], &desired), 2);
    }

    #[test]
    fn test_move_two_items_later() {
        let desired = [9, 8, 7, 6, 5, 4, 3, 2, 1];
        assert_eq!(reconcile_and_verify(vec![3, 2, 9, 8, 7, 6, 5, 4, 1], &desired), 2);
    }

    #[test]
    fn test_delete_items() {
        let original = vec![9, 8, 7, 6, 5, 4, 3, 2, 1];
        assert_eq!(reconcile_and_verify(original.clone(), &[9, 8, 7, 5, 4, 3, 2, 1]), 1);
        assert_eq!(reconcile_and_verify(original, &[9, 8, 7, 5, 4, 2, 1]), 2);
    }

    #[test]
    fn test_add_two_items() {
        let desired = [9, 8, 7, 6, 5, 4, 3, 2, 1];
        assert_eq!(reconcile_and_verify(vec![9, 7, 6, 5, 4, 3, 1], &desired), 2);
    }

    #[test]
    fn test_add_two_items_near_end_traversing_from_right() {
        let desired = [8, 7, 6, 5, 9, 4, 3, 2, 1];
        assert_eq!(reconcile_and_verify(vec![9, 8, 7, 6, 5, 1], &desired), 4);
    }

    #[test]
    fn test_reversal() {
        let desired: Vec<i32> = (1..=10).collect();
        assert_eq!(reconcile_and_verify((1..=10).rev().collect(), &desired), 9);
    }

    #[test]
    fn test_total_replacement() {
        let desired: Vec<i32> = (11..=20).collect();
        assert_eq!(reconcile_and_verify((1..=10).collect(), &desired), 20);
    }

    #[test]
    fn test_empty_target_only_removes() {
        assert_eq!(reconcile_and_verify(vec![1, 2, 3], &[]), 3);
        assert_eq!(reconcile_and_verify(vec![], &[]), 0);
        assert_eq!(reconcile_and_verify(vec![], &[4, 5]), 2);
    }

    #[test]
    fn test_duplicates_converge() {
        assert_eq!(reconcile_and_verify(vec![1, 1, 2], &[2, 1, 1]), 1);
        assert_eq!(reconcile_and_verify(vec![1, 2, 1], &[1, 1, 2]), 1);
        assert_eq!(reconcile_and_verify(vec![3, 3, 3], &[3]), 2);
        assert_eq!(reconcile_and_verify(vec![3], &[3, 3, 3]), 2);
        reconcile_and_verify(vec![0, 2, 0, 1, 2, 2], &[2, 0, 2, 1, 1, 0, 2]);
    }

    #[test]
    fn test_equal_item_in_place_is_not_moved() {
        let mut list = InMemoryOperableList::new(vec!['a', 'x', 'x', 'y', 'b']);
        list.reconcile_to(&['y', 'a', 'x', 'x', 'b']);
        assert_eq!(list.items(), &['y', 'a', 'x', 'x', 'b']);
        assert_eq!(list.modification_count(), 1);
    }

    #[test]
    fn test_direction_choice() {
        let list = InMemoryOperableList::new(vec![2, 3, 4, 5, 6, 1]);
        let desired = [1, 2, 3, 4, 5, 6];
        let (stable, fresh) = partition(&list, &desired);
        assert!(fresh.is_empty());
        assert_eq!(direction(&list, &desired, &stable), Direction::Ascending);

        let list = InMemoryOperableList::new(vec![9, 8, 7, 6, 5, 1]);
        let desired = [8, 7, 6, 5, 9, 4, 3, 2, 1];
        let (stable, fresh) = partition(&list, &desired);
        assert_eq!(fresh, vec![5, 6, 7]);
        assert_eq!(direction(&list, &desired, &stable), Direction::Descending);
    }
}
