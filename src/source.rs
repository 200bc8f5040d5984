//! Input-shape introspection for the transformation engine.
//!
//! A [`Source`] is a borrowed container the engine can enumerate. Sequences
//! enumerate `(index, &value)` and report `&value` as their element; maps
//! enumerate `(&key, &value)` and report the `(&key, &value)` pair. [`Retain`]
//! adds the ability to rebuild an owned container of the same shape, which is
//! what filtering needs.

use crate::shape::Shape;
use std::collections::{btree_map, hash_map, BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::iter::Enumerate;
use std::slice;

/// A borrowed container the engine can enumerate
pub trait Source<'a> {
    /// Index for sequences, `&K` for maps
    type Key: Copy;
    type Value: 'a;
    /// What predicates, actions and error formatters receive
    type Element: Copy;
    type Iter: Iterator<Item = (Self::Key, &'a Self::Value)>;

    const SHAPE: Shape;

    /// Enumerates every `(key, value)` pair once
    fn entries(self) -> Self::Iter;

    /// Builds the element view of one enumerated pair
    fn element(key: Self::Key, value: &'a Self::Value) -> Self::Element;
}

/// A source that can be filtered into an owned container of the same shape
pub trait Retain<'a>: Source<'a> {
    type Owned: Default;

    /// Copies one enumerated pair into `owned`
    fn keep(owned: &mut Self::Owned, key: Self::Key, value: &'a Self::Value);
}

impl<'a, T: 'a> Source<'a> for &'a [T] {
    type Key = usize;
    type Value = T;
    type Element = &'a T;
    type Iter = Enumerate<slice::Iter<'a, T>>;

    const SHAPE: Shape = Shape::Sequence;

    fn entries(self) -> Self::Iter {
        self.iter().enumerate()
    }

    fn element(_: usize, value: &'a T) -> &'a T {
        value
    }
}

impl<'a, T: Clone + 'a> Retain<'a> for &'a [T] {
    type Owned = Vec<T>;

    fn keep(owned: &mut Vec<T>, _: usize, value: &'a T) {
        owned.push(value.clone());
    }
}

impl<'a, T: 'a, const N: usize> Source<'a> for &'a [T; N] {
    type Key = usize;
    type Value = T;
    type Element = &'a T;
    type Iter = Enumerate<slice::Iter<'a, T>>;

    const SHAPE: Shape = Shape::Sequence;

    fn entries(self) -> Self::Iter {
        self.iter().enumerate()
    }

    fn element(_: usize, value: &'a T) -> &'a T {
        value
    }
}

impl<'a, T: Clone + 'a, const N: usize> Retain<'a> for &'a [T; N] {
    type Owned = Vec<T>;

    fn keep(owned: &mut Vec<T>, _: usize, value: &'a T) {
        owned.push(value.clone());
    }
}

impl<'a, T: 'a> Source<'a> for &'a Vec<T> {
    type Key = usize;
    type Value = T;
    type Element = &'a T;
    type Iter = Enumerate<slice::Iter<'a, T>>;

    const SHAPE: Shape = Shape::Sequence;

    fn entries(self) -> Self::Iter {
        self.iter().enumerate()
    }

    fn element(_: usize, value: &'a T) -> &'a T {
        value
    }
}

impl<'a, T: Clone + 'a> Retain<'a> for &'a Vec<T> {
    type Owned = Vec<T>;

    fn keep(owned: &mut Vec<T>, _: usize, value: &'a T) {
        owned.push(value.clone());
    }
}

impl<'a, K: 'a, V: 'a, S> Source<'a> for &'a HashMap<K, V, S> {
    type Key = &'a K;
    type Value = V;
    type Element = (&'a K, &'a V);
    type Iter = hash_map::Iter<'a, K, V>;

    const SHAPE: Shape = Shape::Associative;

    fn entries(self) -> Self::Iter {
        self.iter()
    }

    fn element(key: &'a K, value: &'a V) -> (&'a K, &'a V) {
        (key, value)
    }
}

impl<'a, K, V, S> Retain<'a> for &'a HashMap<K, V, S>
where
    K: Clone + Eq + Hash + 'a,
    V: Clone + 'a,
    S: BuildHasher + Default,
{
    type Owned = HashMap<K, V, S>;

    fn keep(owned: &mut Self::Owned, key: &'a K, value: &'a V) {
        owned.insert(key.clone(), value.clone());
    }
}

impl<'a, K: 'a, V: 'a> Source<'a> for &'a BTreeMap<K, V> {
    type Key = &'a K;
    type Value = V;
    type Element = (&'a K, &'a V);
    type Iter = btree_map::Iter<'a, K, V>;

    const SHAPE: Shape = Shape::Associative;

    fn entries(self) -> Self::Iter {
        self.iter()
    }

    fn element(key: &'a K, value: &'a V) -> (&'a K, &'a V) {
        (key, value)
    }
}

impl<'a, K, V> Retain<'a> for &'a BTreeMap<K, V>
where
    K: Clone + Ord + 'a,
    V: Clone + 'a,
{
    type Owned = BTreeMap<K, V>;

    fn keep(owned: &mut Self::Owned, key: &'a K, value: &'a V) {
        owned.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_of<'a, S: Source<'a>>(_: S) -> Shape {
        S::SHAPE
    }

    fn collect<'a, S: Retain<'a>>(source: S) -> S::Owned {
        let mut owned = S::Owned::default();
        for (key, value) in source.entries() {
            S::keep(&mut owned, key, value);
        }
        owned
    }

    #[test]
    fn test_sequence_sources_enumerate_by_index() {
        let items = vec!["a", "b", "c"];
        let seen: Vec<(usize, &&str)> = (&items).entries().collect();
        assert_eq!(seen, vec![(0, &"a"), (1, &"b"), (2, &"c")]);

        let array = [10, 20];
        let seen: Vec<(usize, &i32)> = (&array).entries().collect();
        assert_eq!(seen, vec![(0, &10), (1, &20)]);

        assert_eq!(shape_of(&items), Shape::Sequence);
        assert_eq!(shape_of(&items[..]), Shape::Sequence);
        assert_eq!(shape_of(&array), Shape::Sequence);
    }

    #[test]
    fn test_map_sources_enumerate_by_key() {
        let mut map = HashMap::new();
        map.insert("one", 1);
        map.insert("two", 2);

        let mut seen: Vec<(&str, i32)> = (&map).entries().map(|(k, v)| (*k, *v)).collect();
        seen.sort();
        assert_eq!(seen, vec![("one", 1), ("two", 2)]);
        assert_eq!(shape_of(&map), Shape::Associative);

        let tree: BTreeMap<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
        let element = <&BTreeMap<i32, &str>>::element(&1, &"a");
        assert_eq!(element, (&1, &"a"));
        assert_eq!(shape_of(&tree), Shape::Associative);
    }

    #[test]
    fn test_retain_rebuilds_same_shape() {
        let items = vec![1, 2, 3];
        assert_eq!(collect(&items), vec![1, 2, 3]);

        let tree: BTreeMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(collect(&tree), tree);

        let map: HashMap<&str, i32> = [("x", 1)].into_iter().collect();
        assert_eq!(collect(&map), map);
    }
}
