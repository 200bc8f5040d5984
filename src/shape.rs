use crate::error::CollectionError;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// The two container shapes the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Ordered, duplicate-tolerant elements
    Sequence,
    /// Unique keys mapped to values
    Associative,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Shape::Sequence => write!(f, "sequence"),
            Shape::Associative => write!(f, "associative"),
        }
    }
}

/// What a `map` callback produced for one element
///
/// The first successful callback decides the shape of the whole result:
/// `Item` makes it a sequence, `Entry` makes it a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted<K, V> {
    /// A single value, appended to a sequence result
    Item(V),
    /// A key and value, inserted into a map result
    Entry(K, V),
}

impl<K, V> Emitted<K, V> {
    pub fn item(value: V) -> Self {
        Emitted::Item(value)
    }

    pub fn entry(key: K, value: V) -> Self {
        Emitted::Entry(key, value)
    }

    pub fn shape(&self) -> Shape {
        match self {
            Emitted::Item(_) => Shape::Sequence,
            Emitted::Entry(..) => Shape::Associative,
        }
    }
}

impl<K, V> From<(K, V)> for Emitted<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Emitted::Entry(key, value)
    }
}

/// The result of a `map` call, shaped by what its callback emitted
///
/// Sequence-only results still carry a key type; `Mapped<(), V>` is the usual
/// choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapped<K, V>
where
    K: Eq + Hash,
{
    Sequence(Vec<V>),
    Associative(HashMap<K, V>),
}

impl<K, V> Mapped<K, V>
where
    K: Eq + Hash,
{
    /// An empty result of the given shape
    pub fn empty(shape: Shape) -> Self {
        match shape {
            Shape::Sequence => Mapped::Sequence(Vec::new()),
            Shape::Associative => Mapped::Associative(HashMap::new()),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Mapped::Sequence(_) => Shape::Sequence,
            Mapped::Associative(_) => Shape::Associative,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Mapped::Sequence(items) => items.len(),
            Mapped::Associative(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_sequence(&self) -> Option<&[V]> {
        match self {
            Mapped::Sequence(items) => Some(items),
            Mapped::Associative(_) => None,
        }
    }

    pub fn as_associative(&self) -> Option<&HashMap<K, V>> {
        match self {
            Mapped::Sequence(_) => None,
            Mapped::Associative(entries) => Some(entries),
        }
    }

    pub fn into_sequence(self) -> Option<Vec<V>> {
        match self {
            Mapped::Sequence(items) => Some(items),
            Mapped::Associative(_) => None,
        }
    }

    pub fn into_associative(self) -> Option<HashMap<K, V>> {
        match self {
            Mapped::Sequence(_) => None,
            Mapped::Associative(entries) => Some(entries),
        }
    }

    /// Accumulates one emitted value into the committed shape
    pub(crate) fn accept(
        &mut self,
        emitted: Emitted<K, V>,
        position: usize,
    ) -> Result<(), CollectionError> {
        match (&mut *self, emitted) {
            (Mapped::Sequence(items), Emitted::Item(value)) => items.push(value),
            (Mapped::Associative(entries), Emitted::Entry(key, value)) => {
                entries.insert(key, value);
            }
            (committed, found) => {
                return Err(CollectionError::ShapeMismatch {
                    position,
                    expected: committed.shape(),
                    found: found.shape(),
                })
            }
        }
        Ok(())
    }
}

impl<K, V> Default for Mapped<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Mapped::Sequence(Vec::new())
    }
}
