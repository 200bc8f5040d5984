use crate::builder::ErrorBuilder;
use crate::engine;
use crate::error::CollectionError;
use crate::shape::Shape;
use crate::source::{Retain, Source};
use std::iter::Enumerate;
use std::slice;

/// An ordered, duplicate-tolerant sequence
///
/// # Examples
///
/// ```
/// use sovran_collections::List;
///
/// let list: List<i32> = vec![1, 2, 3, 4].into();
/// assert_eq!(list.filter(|n| n % 2 == 0).into_inner(), vec![2, 4]);
/// assert_eq!(list.map(|n| n * 10).unwrap(), vec![10, 20, 30, 40]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List<T> {
    items: Vec<T>,
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    /// Runs `action` with each position and item, stopping at the first panic
    pub fn for_each<'a, F>(&'a self, action: F) -> ErrorBuilder<'a, &'a T>
    where
        F: FnMut(usize, &'a T),
    {
        engine::for_each(action, self)
    }

    /// Maps every item into a `Vec`, in order
    pub fn map<'a, U, F>(&'a self, mut callback: F) -> Result<Vec<U>, CollectionError>
    where
        F: FnMut(&'a T) -> U,
    {
        engine::map_values(self, |_, item, _| callback(item))
    }

    /// Keeps the items for which `predicate` holds, preserving order
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        engine::filter(self, predicate)
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T: 'a> Source<'a> for &'a List<T> {
    type Key = usize;
    type Value = T;
    type Element = &'a T;
    type Iter = Enumerate<slice::Iter<'a, T>>;

    const SHAPE: Shape = Shape::Sequence;

    fn entries(self) -> Self::Iter {
        self.items.iter().enumerate()
    }

    fn element(_: usize, value: &'a T) -> &'a T {
        value
    }
}

impl<'a, T: Clone + 'a> Retain<'a> for &'a List<T> {
    type Owned = List<T>;

    fn keep(owned: &mut List<T>, _: usize, value: &'a T) {
        owned.push(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut list = List::new();
        assert!(list.is_empty());
        list.push("a");
        list.push("a");
        list.extend(vec!["b"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(2), Some(&"b"));
        assert_eq!(list.get(3), None);
    }

    #[test]
    fn test_for_each_stops_at_panic() {
        let list: List<i32> = (1..=5).collect();
        let mut visited = Vec::new();
        let builder = list.for_each(|position, item| {
            visited.push(position);
            if *item == 2 {
                panic!("two is not allowed");
            }
        });
        assert_eq!(visited, vec![0, 1]);
        assert_eq!(builder.error().unwrap().to_string(), "two is not allowed");
    }

    #[test]
    fn test_map_reports_panics() {
        let list: List<i32> = vec![1, 0, 2].into();
        let err = list.map(|n| 10 / n).unwrap_err();
        assert!(err.is_callback_fault());
        assert_eq!(err.to_string(), "attempt to divide by zero");
    }
}
