use crate::builder::ErrorBuilder;
use crate::engine;
use crate::error::CollectionError;
use crate::shape::{Emitted, Mapped, Shape};
use crate::source::{Retain, Source};
use std::collections::{hash_map, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// An associative container with unique keys
///
/// `Dict` wraps a `HashMap` and plugs it into the transformation engine, so
/// maps, filters and for-each passes can be run directly on it. Iteration
/// order is unspecified; only the order-insensitive accessors (`keys`,
/// `values`) and the engine operations read it.
///
/// # Examples
///
/// ```
/// use sovran_collections::{CollectionError, Dict};
///
/// let dict = Dict::from_zip(vec!["a", "b", "c"], vec![1, 2, 3])?;
///
/// // Keep the odd values
/// let odd = dict.filter_all(|_, value| value % 2 == 1);
/// assert_eq!(odd.len(), 2);
///
/// // Read a value without cloning it
/// let doubled = dict.with(&"b", |value| value * 2)?;
/// assert_eq!(doubled, 4);
/// # Ok::<(), CollectionError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dict<K, V>
where
    K: Eq + Hash,
{
    items: HashMap<K, V>,
}

impl<K, V> Dict<K, V>
where
    K: Eq + Hash,
{
    /// Creates a new, empty Dict
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Creates a Dict holding a single entry
    pub fn from_pair(key: K, value: V) -> Self {
        let mut dict = Self::new();
        dict.set(key, value);
        dict
    }

    /// Creates a Dict from `(key, value)` tuples; later duplicates win
    pub fn from_tuples<I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        tuples.into_iter().collect()
    }

    /// Creates a Dict pairing `keys[i]` with `values[i]`
    ///
    /// The longer input is truncated to the shorter one.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Construction` if inserting a key panics.
    pub fn from_zip<I, J>(keys: I, values: J) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = K>,
        J: IntoIterator<Item = V>,
    {
        engine::zip(keys, values).map(Self::from)
    }

    /// Stores a value, replacing any previous value for the key
    pub fn set(&mut self, key: K, value: V) {
        self.items.insert(key, value);
    }

    /// Retrieves a clone of a value
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist
    pub fn get(&self, key: &K) -> Result<V, CollectionError>
    where
        K: Debug,
        V: Clone,
    {
        self.with(key, V::clone)
    }

    /// Removes a value
    ///
    /// Returns `true` if the key was present and removed, `false` if not present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.items.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    /// Returns a vector of all keys, in unspecified order
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.items.keys().cloned().collect()
    }

    /// Returns a vector of all values, in unspecified order
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.items.values().cloned().collect()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.items.iter()
    }

    /// Runs a closure with read access to a value
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist
    pub fn with<F, R>(&self, key: &K, f: F) -> Result<R, CollectionError>
    where
        K: Debug,
        F: FnOnce(&V) -> R,
    {
        let value = self
            .items
            .get(key)
            .ok_or_else(|| CollectionError::KeyNotFound(format!("{:?}", key)))?;
        Ok(f(value))
    }

    /// Runs a closure with write access to a value
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist
    pub fn with_mut<F, R>(&mut self, key: &K, f: F) -> Result<R, CollectionError>
    where
        K: Debug,
        F: FnOnce(&mut V) -> R,
    {
        let value = self
            .items
            .get_mut(key)
            .ok_or_else(|| CollectionError::KeyNotFound(format!("{:?}", key)))?;
        Ok(f(value))
    }

    /// Runs `action` with each key, value and zero-based index
    ///
    /// Stops at the first panic; the returned builder carries the captured
    /// error and the offending entry.
    pub fn for_each<'a, F>(&'a self, mut action: F) -> ErrorBuilder<'a, (&'a K, &'a V)>
    where
        F: FnMut(&'a K, &'a V, usize),
    {
        engine::for_each(|index, (key, value)| action(key, value, index), self)
    }

    /// Maps every entry; see [`map`](crate::map) for how the result shape is chosen
    pub fn map<'a, K2, V2, F>(&'a self, callback: F) -> Result<Mapped<K2, V2>, CollectionError>
    where
        K2: Eq + Hash,
        F: FnMut(&'a K, &'a V, usize) -> Emitted<K2, V2>,
    {
        engine::map(self, callback)
    }

    /// Keeps the entries for which `predicate` holds
    pub fn filter_all<F>(&self, mut predicate: F) -> Self
    where
        K: Clone,
        V: Clone,
        F: FnMut(&K, &V) -> bool,
    {
        engine::filter(self, |(key, value)| predicate(key, value))
    }

    pub fn into_inner(self) -> HashMap<K, V> {
        self.items
    }
}

impl<K, V> Default for Dict<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<HashMap<K, V>> for Dict<K, V>
where
    K: Eq + Hash,
{
    fn from(items: HashMap<K, V>) -> Self {
        Self { items }
    }
}

impl<K, V> FromIterator<(K, V)> for Dict<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for Dict<K, V>
where
    K: Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a Dict<K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, K, V> Source<'a> for &'a Dict<K, V>
where
    K: Eq + Hash + 'a,
    V: 'a,
{
    type Key = &'a K;
    type Value = V;
    type Element = (&'a K, &'a V);
    type Iter = hash_map::Iter<'a, K, V>;

    const SHAPE: Shape = Shape::Associative;

    fn entries(self) -> Self::Iter {
        self.items.iter()
    }

    fn element(key: &'a K, value: &'a V) -> (&'a K, &'a V) {
        (key, value)
    }
}

impl<'a, K, V> Retain<'a> for &'a Dict<K, V>
where
    K: Clone + Eq + Hash + 'a,
    V: Clone + 'a,
{
    type Owned = Dict<K, V>;

    fn keep(owned: &mut Dict<K, V>, key: &'a K, value: &'a V) {
        owned.set(key.clone(), value.clone());
    }
}
