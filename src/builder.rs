use crate::error::{CollectionError, SharedError};
use std::error::Error as StdError;
use std::fmt;

type Formatter<'a, E> = Box<dyn Fn(E) -> CollectionError + 'a>;

/// The outcome of a transformation, with deferred error customisation
///
/// Every destination-writing operation returns an `ErrorBuilder`. It remembers
/// the error captured for the first failing element, together with that
/// element, so the caller can turn the raw error into a domain-specific one
/// before reading it.
///
/// # Examples
///
/// ```
/// use sovran_collections::{map_into, Emitted, Mapped};
///
/// let source = vec![1, 2, 3, 4];
/// let mut dest: Mapped<(), i32> = Mapped::default();
///
/// let builder = map_into(
///     &source,
///     |_, n: &i32, _| {
///         if *n == 3 {
///             panic!("unexpected value");
///         }
///         Emitted::Item(n * 2)
///     },
///     &mut dest,
/// );
///
/// assert_eq!(builder.error().unwrap().to_string(), "unexpected value");
///
/// let err = builder
///     .with_error_message(|item: &i32| format!("custom error for item {}", item))
///     .error();
/// assert_eq!(err.unwrap().to_string(), "custom error for item 3");
/// ```
#[must_use = "an ErrorBuilder carries the operation's error; call `error()` to inspect it"]
pub struct ErrorBuilder<'a, E> {
    fault: Option<(E, CollectionError)>,
    formatter: Option<Formatter<'a, E>>,
}

impl<'a, E: Copy> ErrorBuilder<'a, E> {
    pub(crate) fn succeeded() -> Self {
        Self {
            fault: None,
            formatter: None,
        }
    }

    pub(crate) fn failed(element: E, error: CollectionError) -> Self {
        Self {
            fault: Some((element, error)),
            formatter: None,
        }
    }

    /// Registers a formatter that replaces the captured error
    ///
    /// The formatter receives the element whose processing failed and may
    /// return anything convertible into a boxed error, such as a `String`, a
    /// `&str`, or an error type. It only runs when [`error`](Self::error) is
    /// called and a fault was captured. Registering a second formatter replaces
    /// the first.
    pub fn with_error_message<F, R>(mut self, formatter: F) -> Self
    where
        F: Fn(E) -> R + 'a,
        R: Into<Box<dyn StdError + Send + Sync>>,
    {
        self.formatter = Some(Box::new(move |element: E| {
            CollectionError::Custom(SharedError::from(formatter(element).into()))
        }));
        self
    }

    /// Returns the operation's error, if any
    ///
    /// `None` means every element was processed. Otherwise the registered
    /// formatter's output is returned, or the raw captured error when no
    /// formatter was registered. Calling this repeatedly yields the same error.
    pub fn error(&self) -> Option<CollectionError> {
        let (element, raw) = self.fault.as_ref()?;
        match &self.formatter {
            Some(formatter) => Some(formatter(*element)),
            None => Some(raw.clone()),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ErrorBuilder<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErrorBuilder")
            .field("fault", &self.fault)
            .field("has_formatter", &self.formatter.is_some())
            .finish()
    }
}
