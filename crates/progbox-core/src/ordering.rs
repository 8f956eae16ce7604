//! Small collection helpers used for ordering and grouping records.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// Sort direction for [`sort_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Remove duplicates, keeping the first occurrence of each value in place.
pub fn unique<T>(items: Vec<T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Return a copy of `items` sorted by the extracted key.
///
/// The sort is stable: records with equal keys keep their relative order in
/// both directions.
pub fn sort_by<T, K, F>(items: &[T], key: F, direction: SortDirection) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut sorted = items.to_vec();
    match direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| key(a).cmp(&key(b))),
        SortDirection::Descending => sorted.sort_by(|a, b| key(b).cmp(&key(a))),
    }
    sorted
}

/// Group items by key. Groups are ordered by key; items keep input order.
pub fn group_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, Vec<T>>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item.clone());
    }
    groups
}

/// Move the element at `from` to position `to`, returning a new vector.
///
/// Both indices are clamped to the valid range; an empty input yields an
/// empty output.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut result = items.to_vec();
    if result.is_empty() {
        return result;
    }
    let last = result.len() - 1;
    let removed = result.remove(from.min(last));
    result.insert(to.min(last), removed);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let tags = vec!["b", "a", "b", "c", "a"];
        assert_eq!(unique(tags), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_by_directions() {
        let items = vec![(3, "c"), (1, "a"), (2, "b")];
        let asc = sort_by(&items, |i| i.0, SortDirection::Ascending);
        assert_eq!(asc, vec![(1, "a"), (2, "b"), (3, "c")]);

        let desc = sort_by(&items, |i| i.0, SortDirection::Descending);
        assert_eq!(desc, vec![(3, "c"), (2, "b"), (1, "a")]);
    }

    #[test]
    fn test_sort_by_is_stable() {
        let items = vec![(1, "first"), (0, "zero"), (1, "second")];
        let sorted = sort_by(&items, |i| i.0, SortDirection::Ascending);
        assert_eq!(sorted, vec![(0, "zero"), (1, "first"), (1, "second")]);
    }

    #[test]
    fn test_group_by() {
        let items = vec![("x", 1), ("y", 2), ("x", 3)];
        let groups = group_by(&items, |i| i.0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["x"], vec![("x", 1), ("x", 3)]);
        assert_eq!(groups["y"], vec![("y", 2)]);
    }

    #[test]
    fn test_move_item() {
        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(move_item(&items, 0, 2), vec!['b', 'c', 'a', 'd']);
        assert_eq!(move_item(&items, 3, 0), vec!['d', 'a', 'b', 'c']);
        assert_eq!(move_item(&items, 1, 1), items);
    }

    #[test]
    fn test_move_item_clamps_indices() {
        let items = vec![1, 2, 3];
        assert_eq!(move_item(&items, 0, 99), vec![2, 3, 1]);
        assert_eq!(move_item(&items, 99, 0), vec![3, 1, 2]);
        assert!(move_item::<i32>(&[], 0, 1).is_empty());
    }
}
