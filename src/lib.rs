//! # sovran-collections
//!
//! Functional-style transformations over sequences and maps, with panic-safe callbacks.
//!
//! `sovran-collections` provides `map`, `filter`, `for_each` and `zip` over slices,
//! arrays, `Vec`, `HashMap`, `BTreeMap` and its own [`List`] and [`Dict`] containers.
//! Every callback runs inside a protected call: if user code panics, the operation
//! stops at that element and hands back an ordinary error value instead of unwinding
//! through the caller.
//!
//! ## Key Features
//!
//! - **Shape-agnostic**: the same operations work on sequences and maps through the [`Source`] trait
//! - **Shape inference**: [`map`] returns a sequence or a map depending on what the callback emits
//! - **Panic capture**: panics in callbacks become [`CollectionError`] values
//! - **Deferred error messages**: [`ErrorBuilder::with_error_message`] rewrites the error using the element that failed
//! - **Fail fast**: no element after the failing one is ever visited
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_collections::{filter, map_values, zip, CollectionError};
//!
//! fn main() -> Result<(), CollectionError> {
//!     let numbers = vec![1, 2, 3, 4];
//!
//!     // Map a sequence into a new sequence
//!     let doubled = map_values(&numbers, |_, n, _| n * 2)?;
//!     assert_eq!(doubled, vec![2, 4, 6, 8]);
//!
//!     // Filter keeps the input's shape
//!     let evens = filter(&numbers, |n: &i32| n % 2 == 0);
//!     assert_eq!(evens, vec![2, 4]);
//!
//!     // Zip two sequences into a map
//!     let scores = zip(vec!["a", "b", "c"], vec![1, 2, 3])?;
//!     assert_eq!(scores["c"], 3);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Letting the Callback Choose the Result Shape
//!
//! ```rust
//! use sovran_collections::{map, CollectionError, Emitted, Mapped};
//! use std::collections::HashMap;
//!
//! fn main() -> Result<(), CollectionError> {
//!     let mut stock = HashMap::new();
//!     stock.insert("apples", 3);
//!     stock.insert("pears", 0);
//!
//!     // Returning entries builds a map
//!     let restocked: Mapped<&str, i32> = map(&stock, |name, count, _| {
//!         Emitted::Entry(*name, count + 10)
//!     })?;
//!     assert_eq!(restocked.as_associative().map(|m| m["pears"]), Some(10));
//!
//!     // Returning plain items builds a sequence
//!     let counts: Mapped<(), i32> = map(&stock, |_, count, _| Emitted::Item(*count))?;
//!     let mut counts = counts.into_sequence().unwrap_or_default();
//!     counts.sort();
//!     assert_eq!(counts, vec![0, 3]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_collections::{for_each, CollectionError};
//!
//! struct User {
//!     name: String,
//!     mails: Vec<String>,
//! }
//!
//! let users = vec![
//!     User { name: "John".to_string(), mails: vec![] },
//!     User { name: "Sarah".to_string(), mails: vec!["sarah@example.com".to_string()] },
//! ];
//!
//! let builder = for_each(|_, user: &User| println!("{} <{}>", user.name, user.mails[0]), &users);
//!
//! // The raw error is the panic message
//! match builder.error() {
//!     Some(CollectionError::Panicked(message)) => println!("Callback panicked: {}", message),
//!     Some(e) => println!("Other error: {}", e),
//!     None => println!("All users printed"),
//! }
//!
//! // Or rewrite it using the user that failed
//! let builder = builder.with_error_message(|user: &User| format!("{} has no mail", user.name));
//! assert_eq!(builder.error().unwrap().to_string(), "John has no mail");
//! ```

mod builder;
mod dict;
mod engine;
mod error;
mod fault;
mod list;
mod shape;
mod source;

pub use builder::ErrorBuilder;
pub use dict::Dict;
pub use engine::{filter, filter_into, for_each, map, map_into, map_values, zip, zip_into};
pub use error::{CollectionError, SharedError};
pub use fault::{capture, FaultKind};
pub use list::List;
pub use shape::{Emitted, Mapped, Shape};
pub use source::{Retain, Source};
