//! The transformation operations.
//!
//! Every callback runs through [`capture`], so a panic inside user code stops
//! the enumeration and comes back as a [`CollectionError`] instead of unwinding
//! through the caller. Elements after the failing one are never visited, and a
//! destination's contents after a failure are unspecified.

use crate::builder::ErrorBuilder;
use crate::error::CollectionError;
use crate::fault::capture;
use crate::shape::{Emitted, Mapped};
use crate::source::{Retain, Source};
use std::collections::HashMap;
use std::hash::Hash;
use std::iter;

/// Enumerates `source`, stopping at the first step that fails
fn drive<'a, S, F>(source: S, mut step: F) -> ErrorBuilder<'a, S::Element>
where
    S: Source<'a>,
    F: FnMut(S::Key, &'a S::Value, usize) -> Result<(), CollectionError>,
{
    for (position, (key, value)) in source.entries().enumerate() {
        if let Err(error) = step(key, value, position) {
            tracing::debug!(position, shape = %S::SHAPE, %error, "aborting enumeration");
            return ErrorBuilder::failed(S::element(key, value), error);
        }
    }
    ErrorBuilder::succeeded()
}

fn construction(position: usize, error: CollectionError) -> CollectionError {
    CollectionError::Construction {
        position,
        reason: error.to_string(),
    }
}

/// Maps every element of `source` into `dest`, inferring the result shape
///
/// `callback` receives the key (the index, for sequences), the value and the
/// zero-based position. The first successful call decides the shape of `dest`:
/// [`Emitted::Item`] makes it [`Mapped::Sequence`], [`Emitted::Entry`] makes it
/// [`Mapped::Associative`] (later duplicate keys overwrite earlier ones). A
/// later call that emits the other shape fails with
/// [`CollectionError::ShapeMismatch`].
///
/// `dest` is reset before enumeration starts. The returned builder reports the
/// first failure together with the offending element.
pub fn map_into<'a, S, K, V, F>(
    source: S,
    mut callback: F,
    dest: &mut Mapped<K, V>,
) -> ErrorBuilder<'a, S::Element>
where
    S: Source<'a>,
    K: Eq + Hash,
    F: FnMut(S::Key, &'a S::Value, usize) -> Emitted<K, V>,
{
    *dest = Mapped::default();
    let mut committed = false;
    drive(source, |key, value, position| {
        let emitted = capture(|| callback(key, value, position))?;
        if !committed {
            committed = true;
            *dest = Mapped::empty(emitted.shape());
            tracing::trace!(shape = %emitted.shape(), "committed result shape");
        }
        dest.accept(emitted, position)
    })
}

/// Maps every element of `source`, inferring the result shape
///
/// See [`map_into`] for the shape rules. An empty source produces an empty
/// [`Mapped::Sequence`]. A callback that only emits [`Emitted::Item`] never
/// names a key, so the key type is usually written as `()`; [`map_values`]
/// skips `Mapped` altogether.
///
/// # Examples
///
/// ```
/// use sovran_collections::{map, CollectionError, Emitted, Mapped};
/// use std::collections::HashMap;
///
/// # fn main() -> Result<(), CollectionError> {
/// let ages: HashMap<&str, u32> = [("alice", 30), ("bob", 41)].into_iter().collect();
///
/// // Emitting entries produces a map
/// let next_year: Mapped<&str, u32> = map(&ages, |name, age, _| Emitted::Entry(*name, age + 1))?;
/// assert_eq!(next_year.as_associative().and_then(|m| m.get("bob")), Some(&42));
///
/// // Emitting plain items produces a sequence
/// let names: Mapped<(), String> = map(&ages, |name, _, _| Emitted::Item(name.to_uppercase()))?;
/// assert_eq!(names.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn map<'a, S, K, V, F>(source: S, callback: F) -> Result<Mapped<K, V>, CollectionError>
where
    S: Source<'a>,
    K: Eq + Hash,
    F: FnMut(S::Key, &'a S::Value, usize) -> Emitted<K, V>,
{
    let mut dest = Mapped::default();
    match map_into(source, callback, &mut dest).error() {
        Some(error) => Err(error),
        None => Ok(dest),
    }
}

/// Maps every element of `source` into a sequence, in enumeration order
///
/// # Examples
///
/// ```
/// use sovran_collections::map_values;
///
/// let doubled = map_values(&[1, 2, 3, 4], |_, n, _| n * 2).unwrap();
/// assert_eq!(doubled, vec![2, 4, 6, 8]);
/// ```
pub fn map_values<'a, S, U, F>(source: S, mut callback: F) -> Result<Vec<U>, CollectionError>
where
    S: Source<'a>,
    F: FnMut(S::Key, &'a S::Value, usize) -> U,
{
    let mut values = Vec::new();
    let builder = drive(source, |key, value, position| {
        values.push(capture(|| callback(key, value, position))?);
        Ok(())
    });
    match builder.error() {
        Some(error) => Err(error),
        None => Ok(values),
    }
}

/// Keeps the elements of `source` for which `predicate` holds
///
/// The result has the same shape as the source, and sequences keep their
/// relative order. The predicate is trusted not to panic; use
/// [`filter_into`] when it might.
///
/// # Examples
///
/// ```
/// use sovran_collections::filter;
///
/// let evens = filter(&vec![1, 2, 3, 4], |n: &i32| n % 2 == 0);
/// assert_eq!(evens, vec![2, 4]);
/// ```
pub fn filter<'a, S, P>(source: S, mut predicate: P) -> S::Owned
where
    S: Retain<'a>,
    P: FnMut(S::Element) -> bool,
{
    let mut kept = S::Owned::default();
    for (key, value) in source.entries() {
        if predicate(S::element(key, value)) {
            S::keep(&mut kept, key, value);
        }
    }
    kept
}

/// Like [`filter`], but writes into `dest` and captures predicate panics
///
/// `dest` is reset before enumeration starts.
pub fn filter_into<'a, S, P>(
    source: S,
    mut predicate: P,
    dest: &mut S::Owned,
) -> ErrorBuilder<'a, S::Element>
where
    S: Retain<'a>,
    P: FnMut(S::Element) -> bool,
{
    *dest = S::Owned::default();
    drive(source, |key, value, _| {
        if capture(|| predicate(S::element(key, value)))? {
            S::keep(dest, key, value);
        }
        Ok(())
    })
}

/// Runs `action` on every element of `source` for its side effects
///
/// `action` receives the zero-based position and the element: `&T` for
/// sequences, `(&K, &V)` for maps. Enumeration stops at the first panic.
///
/// # Examples
///
/// ```
/// use sovran_collections::for_each;
///
/// let mut seen = Vec::new();
/// let builder = for_each(|position, name: &&str| seen.push((position, *name)), &["a", "b"]);
/// assert!(builder.error().is_none());
/// assert_eq!(seen, vec![(0, "a"), (1, "b")]);
/// ```
pub fn for_each<'a, S, F>(mut action: F, source: S) -> ErrorBuilder<'a, S::Element>
where
    S: Source<'a>,
    F: FnMut(usize, S::Element),
{
    drive(source, |key, value, position| {
        capture(|| action(position, S::element(key, value)))
    })
}

/// Builds a map pairing `keys[i]` with `values[i]`
///
/// Pairing stops at the end of the shorter input; the surplus of the longer one
/// is dropped without error. A panic while inserting (for example from a
/// user `Hash` or `Eq` impl) is reported as [`CollectionError::Construction`].
///
/// # Examples
///
/// ```
/// use sovran_collections::zip;
///
/// let map = zip(["a", "b", "c"], [1, 2, 3]).unwrap();
/// assert_eq!(map.len(), 3);
/// assert_eq!(map["b"], 2);
/// ```
pub fn zip<K, V, I, J>(keys: I, values: J) -> Result<HashMap<K, V>, CollectionError>
where
    I: IntoIterator<Item = K>,
    J: IntoIterator<Item = V>,
    K: Eq + Hash,
{
    let mut dest = HashMap::new();
    for (position, (key, value)) in keys.into_iter().zip(values).enumerate() {
        capture(|| {
            dest.insert(key, value);
        })
        .map_err(|error| construction(position, error))?;
    }
    Ok(dest)
}

/// Extends `dest` with clones of the zipped `(key, value)` pairs
///
/// Truncates to the shorter input like [`zip`]. On a construction fault the
/// builder's offending element is the `(&key, &value)` pair being inserted.
pub fn zip_into<'a, K, V, D>(
    keys: &'a [K],
    values: &'a [V],
    dest: &mut D,
) -> ErrorBuilder<'a, (&'a K, &'a V)>
where
    K: Clone,
    V: Clone,
    D: Extend<(K, V)>,
{
    if keys.len() != values.len() {
        tracing::trace!(
            keys = keys.len(),
            values = values.len(),
            "zip truncates to the shorter input"
        );
    }
    for (position, pair) in keys.iter().zip(values).enumerate() {
        let (key, value) = pair;
        if let Err(error) = capture(|| dest.extend(iter::once((key.clone(), value.clone())))) {
            return ErrorBuilder::failed(pair, construction(position, error));
        }
    }
    ErrorBuilder::succeeded()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    #[test]
    fn test_drive_stops_at_first_failure() {
        let source = vec![10, 20, 30, 40];
        let mut visited = Vec::new();
        let builder = drive(&source, |_, value, position| {
            visited.push(position);
            if *value == 30 {
                Err(CollectionError::Panicked("stop".to_string()))
            } else {
                Ok(())
            }
        });
        assert_eq!(visited, vec![0, 1, 2]);
        let err = builder
            .with_error_message(|item: &i32| format!("failed on {}", item))
            .error()
            .unwrap();
        assert_eq!(err.to_string(), "failed on 30");
    }

    #[test]
    fn test_map_into_resets_destination() {
        let mut dest: Mapped<&str, i32> = Mapped::Associative(HashMap::new());
        let builder = map_into(&[1, 2], |_, n, _| Emitted::Item(*n), &mut dest);
        assert!(builder.error().is_none());
        assert_eq!(dest, Mapped::Sequence(vec![1, 2]));

        let empty: [i32; 0] = [];
        let builder = map_into(&empty, |_, n, _| Emitted::Entry("k", *n), &mut dest);
        assert!(builder.error().is_none());
        assert_eq!(dest.shape(), Shape::Sequence);
        assert!(dest.is_empty());
    }

    #[test]
    fn test_shape_mismatch_reports_offending_element() {
        let source = vec![1, 2, 3];
        let mut dest: Mapped<i32, i32> = Mapped::default();
        let builder = map_into(
            &source,
            |_, n, _| {
                if *n < 2 {
                    Emitted::Item(*n)
                } else {
                    Emitted::Entry(*n, *n)
                }
            },
            &mut dest,
        );
        let err = builder.error().unwrap();
        assert!(err.is_shape_mismatch());
        let custom = builder
            .with_error_message(|n: &i32| format!("item {} changed shape", n))
            .error()
            .unwrap();
        assert_eq!(custom.to_string(), "item 2 changed shape");
    }

    #[test]
    fn test_zip_construction_fault() {
        use std::hash::Hasher;

        #[derive(Debug, Clone, PartialEq, Eq)]
        struct Fragile(u8);

        impl Hash for Fragile {
            fn hash<H: Hasher>(&self, state: &mut H) {
                if self.0 == 2 {
                    panic!("cannot hash {}", self.0);
                }
                self.0.hash(state);
            }
        }

        let err = zip(vec![Fragile(1), Fragile(2)], vec!["a", "b"]).unwrap_err();
        assert!(err.is_construction_fault());
        assert_eq!(
            err.to_string(),
            "failed to build result at position 1: cannot hash 2"
        );

        let keys = [Fragile(1), Fragile(2)];
        let values = ["a", "b"];
        let mut dest: HashMap<Fragile, &str> = HashMap::new();
        let err = zip_into(&keys, &values, &mut dest)
            .with_error_message(|(key, value): (&Fragile, &&str)| {
                format!("{:?} -> {}", key, value)
            })
            .error()
            .unwrap();
        assert_eq!(err.to_string(), "Fragile(2) -> b");
    }
}
